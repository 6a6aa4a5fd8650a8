//! Integer program representation.

use std::fmt;

use solver_lp::{Constraint, LinearProgram, Relation};

use crate::error::{BnbError, BnbResult};

/// Integrality structure of a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IlpKind {
    /// Every variable is integer.
    Pure,

    /// Some variables are continuous.
    Mixed,

    /// Every variable is binary.
    Binary,
}

impl fmt::Display for IlpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IlpKind::Pure => write!(f, "pure integer"),
            IlpKind::Mixed => write!(f, "mixed integer"),
            IlpKind::Binary => write!(f, "binary"),
        }
    }
}

/// Linear program plus integrality requirements.
///
/// All variables are implicitly non-negative. Binary variables are integer
/// variables with an implicit `x <= 1` row added to every relaxation.
#[derive(Debug, Clone)]
pub struct IlpProblem {
    /// Objective and rows.
    pub lp: LinearProgram,

    /// Indices of integer variables (includes binary).
    pub integer_vars: Vec<usize>,

    /// Indices of binary variables (subset of integer_vars).
    pub binary_vars: Vec<usize>,
}

impl IlpProblem {
    /// Create a problem with the given integer variables.
    pub fn new(lp: LinearProgram, integer_vars: Vec<usize>) -> BnbResult<Self> {
        let mut integer_vars = integer_vars;
        integer_vars.sort_unstable();
        integer_vars.dedup();

        let prob = Self {
            lp,
            integer_vars,
            binary_vars: Vec::new(),
        };
        prob.validate()?;
        Ok(prob)
    }

    /// Create a problem where every variable is integer.
    pub fn pure(lp: LinearProgram) -> BnbResult<Self> {
        let n = lp.num_vars();
        Self::new(lp, (0..n).collect())
    }

    /// Declare variables binary. They become integer as well.
    pub fn with_binary(mut self, vars: &[usize]) -> BnbResult<Self> {
        self.binary_vars.extend_from_slice(vars);
        self.binary_vars.sort_unstable();
        self.binary_vars.dedup();
        self.integer_vars.extend_from_slice(vars);
        self.integer_vars.sort_unstable();
        self.integer_vars.dedup();
        self.validate()?;
        Ok(self)
    }

    /// Check dimensions and index ranges.
    pub fn validate(&self) -> BnbResult<()> {
        self.lp
            .validate()
            .map_err(|e| BnbError::InvalidProblem(e.to_string()))?;

        let n = self.num_vars();
        if let Some(&i) = self.integer_vars.iter().find(|&&i| i >= n) {
            return Err(BnbError::InvalidProblem(format!(
                "integer variable {} out of range (problem has {} variables)",
                i, n
            )));
        }
        if let Some(&i) = self
            .binary_vars
            .iter()
            .find(|i| !self.integer_vars.contains(i))
        {
            return Err(BnbError::InvalidProblem(format!(
                "binary variable {} is not declared integer",
                i
            )));
        }
        Ok(())
    }

    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.lp.num_vars()
    }

    /// Number of constraints (excluding implicit binary rows).
    pub fn num_constraints(&self) -> usize {
        self.lp.num_constraints()
    }

    /// Number of integer variables (including binary).
    pub fn num_integers(&self) -> usize {
        self.integer_vars.len()
    }

    /// Integrality structure.
    pub fn kind(&self) -> IlpKind {
        let n = self.num_vars();
        if self.binary_vars.len() == n {
            IlpKind::Binary
        } else if self.integer_vars.len() == n {
            IlpKind::Pure
        } else {
            IlpKind::Mixed
        }
    }

    /// Relaxation at the root: the rows plus `x <= 1` for binary variables.
    pub fn relaxation(&self) -> LinearProgram {
        let n = self.num_vars();
        let mut lp = self.lp.clone();
        for &i in &self.binary_vars {
            lp.constraints.push(Constraint::unit(n, i, Relation::Le, 1.0));
        }
        lp
    }

    /// Check if a solution is integer-feasible within tolerance.
    pub fn is_integer_feasible(&self, x: &[f64], tol: f64) -> bool {
        self.integer_vars
            .iter()
            .all(|&i| x.get(i).is_some_and(|&v| fractionality(v) <= tol))
    }

    /// Check rows, non-negativity, binary bounds and integrality.
    pub fn is_feasible(&self, x: &[f64], tol: f64) -> bool {
        x.len() == self.num_vars()
            && x.iter().all(|&v| v >= -tol)
            && self.binary_vars.iter().all(|&i| x[i] <= 1.0 + tol)
            && self.lp.is_satisfied_by(x, tol)
            && self.is_integer_feasible(x, tol)
    }

    /// Get fractional integer variables as `(index, value, fractionality)`.
    pub fn get_fractional_vars(&self, x: &[f64], tol: f64) -> Vec<(usize, f64, f64)> {
        let mut result = Vec::new();
        for &i in &self.integer_vars {
            let Some(&val) = x.get(i) else { continue };
            let frac = fractionality(val);
            if frac > tol {
                result.push((i, val, frac));
            }
        }
        result
    }
}

/// Distance to the nearest integer.
pub fn fractionality(val: f64) -> f64 {
    // f64::round rounds half away from zero
    (val - val.round()).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use solver_lp::Constraint;

    fn two_var_lp() -> LinearProgram {
        LinearProgram::maximize(vec![1.0, 1.0]).with_constraint(Constraint::le(vec![2.0, 2.0], 5.0))
    }

    #[test]
    fn test_kind() {
        let pure = IlpProblem::pure(two_var_lp()).unwrap();
        assert_eq!(pure.kind(), IlpKind::Pure);

        let mixed = IlpProblem::new(two_var_lp(), vec![1]).unwrap();
        assert_eq!(mixed.kind(), IlpKind::Mixed);

        let binary = IlpProblem::new(two_var_lp(), vec![])
            .unwrap()
            .with_binary(&[0, 1])
            .unwrap();
        assert_eq!(binary.kind(), IlpKind::Binary);
        assert_eq!(binary.integer_vars, vec![0, 1]);
    }

    #[test]
    fn test_out_of_range_integer_var() {
        let err = IlpProblem::new(two_var_lp(), vec![0, 2]).unwrap_err();
        assert!(matches!(err, BnbError::InvalidProblem(_)));
    }

    #[test]
    fn test_empty_lp_rejected() {
        let lp = LinearProgram::maximize(vec![1.0]);
        assert!(IlpProblem::pure(lp).is_err());
    }

    #[test]
    fn test_relaxation_adds_binary_rows() {
        let prob = IlpProblem::new(two_var_lp(), vec![]).unwrap().with_binary(&[1]).unwrap();
        let relax = prob.relaxation();
        assert_eq!(relax.num_constraints(), 2);
        assert_eq!(relax.constraints[1].coefs, vec![0.0, 1.0]);
        assert_eq!(relax.constraints[1].rhs, 1.0);
        // Original rows untouched
        assert_eq!(prob.num_constraints(), 1);
    }

    #[test]
    fn test_fractional_vars() {
        let prob = IlpProblem::new(two_var_lp(), vec![0, 1]).unwrap();
        let frac = prob.get_fractional_vars(&[2.5, 3.0000001], 1e-6);
        assert_eq!(frac.len(), 1);
        assert_eq!(frac[0].0, 0);
        assert!((frac[0].2 - 0.5).abs() < 1e-12);

        assert!(prob.is_integer_feasible(&[2.0, 0.9999999], 1e-6));
        assert!(!prob.is_integer_feasible(&[2.0, 0.5], 1e-6));
    }

    #[test]
    fn test_fractionality() {
        assert!((fractionality(2.3) - 0.3).abs() < 1e-12);
        assert!((fractionality(2.7) - 0.3).abs() < 1e-12);
        assert!((fractionality(-1.25) - 0.25).abs() < 1e-12);
        assert_eq!(fractionality(4.0), 0.0);
    }

    #[test]
    fn test_is_feasible() {
        let prob = IlpProblem::pure(two_var_lp()).unwrap();
        assert!(prob.is_feasible(&[1.0, 1.0], 1e-9));
        assert!(!prob.is_feasible(&[2.0, 1.0], 1e-9)); // 6 > 5
        assert!(!prob.is_feasible(&[-1.0, 0.0], 1e-9));
        assert!(!prob.is_feasible(&[0.5, 0.0], 1e-9));
    }
}
