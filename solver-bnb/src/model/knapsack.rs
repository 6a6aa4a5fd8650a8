//! 0/1 knapsack instances.

use solver_lp::{Constraint, LinearProgram, Relation};

use super::IlpProblem;
use crate::error::{BnbError, BnbResult};

/// A 0/1 knapsack: pick items maximizing value within a weight capacity.
///
/// Items may be forced into (`required`) or out of (`excluded`) the
/// selection.
#[derive(Debug, Clone, Default)]
pub struct Knapsack {
    /// Item values.
    pub values: Vec<f64>,

    /// Item weights.
    pub weights: Vec<f64>,

    /// Weight capacity.
    pub capacity: f64,

    /// Items that must be selected.
    pub required: Vec<usize>,

    /// Items that must not be selected.
    pub excluded: Vec<usize>,
}

impl Knapsack {
    /// Create an instance without forced items.
    pub fn new(values: Vec<f64>, weights: Vec<f64>, capacity: f64) -> Self {
        Self {
            values,
            weights,
            capacity,
            required: Vec::new(),
            excluded: Vec::new(),
        }
    }

    /// Force an item into the selection.
    pub fn require(mut self, item: usize) -> Self {
        self.required.push(item);
        self
    }

    /// Force an item out of the selection.
    pub fn exclude(mut self, item: usize) -> Self {
        self.excluded.push(item);
        self
    }

    /// Number of items.
    pub fn num_items(&self) -> usize {
        self.values.len()
    }

    /// Check dimensions, signs and forced-item consistency.
    pub fn validate(&self) -> BnbResult<()> {
        let n = self.num_items();
        if n == 0 {
            return Err(BnbError::InvalidProblem("knapsack has no items".into()));
        }
        if self.weights.len() != n {
            return Err(BnbError::InvalidProblem(format!(
                "{} values but {} weights",
                n,
                self.weights.len()
            )));
        }
        if self.weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(BnbError::InvalidProblem(
                "weights must be finite and non-negative".into(),
            ));
        }
        if !self.capacity.is_finite() || self.capacity < 0.0 {
            return Err(BnbError::InvalidProblem(format!(
                "invalid capacity {}",
                self.capacity
            )));
        }
        for &i in self.required.iter().chain(&self.excluded) {
            if i >= n {
                return Err(BnbError::InvalidProblem(format!(
                    "item {} out of range ({} items)",
                    i, n
                )));
            }
        }
        if let Some(i) = self.required.iter().find(|i| self.excluded.contains(i)) {
            return Err(BnbError::InvalidProblem(format!(
                "item {} is both required and excluded",
                i
            )));
        }
        Ok(())
    }

    /// Binary program: max v·x s.t. w·x <= capacity, forced items fixed.
    pub fn to_problem(&self) -> BnbResult<IlpProblem> {
        self.validate()?;
        let n = self.num_items();

        let mut lp = LinearProgram::maximize(self.values.clone())
            .with_constraint(Constraint::le(self.weights.clone(), self.capacity));
        for &i in &self.required {
            lp = lp.with_constraint(Constraint::unit(n, i, Relation::Ge, 1.0));
        }
        for &i in &self.excluded {
            lp = lp.with_constraint(Constraint::unit(n, i, Relation::Le, 0.0));
        }

        let all: Vec<usize> = (0..n).collect();
        IlpProblem::new(lp, Vec::new())?.with_binary(&all)
    }

    /// Items selected by a solution vector.
    pub fn selected_items(&self, x: &[f64]) -> Vec<usize> {
        x.iter()
            .enumerate()
            .filter(|(_, v)| **v > 0.5)
            .map(|(i, _)| i)
            .collect()
    }
}
