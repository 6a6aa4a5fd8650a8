//! Relaxation oracles: the problem-specific half of branch-and-bound.
//!
//! The engine only sees restrictions, candidates and bounds. An oracle
//! evaluates the relaxation of a region (the root plus a list of
//! restrictions), decides whether its candidate is integral, and otherwise
//! proposes the restrictions that split the region.

mod lp;
mod tour;

pub use lp::LpOracle;
pub use tour::{TourOracle, Visit};

use std::fmt;

use solver_lp::Sense;

use crate::error::BnbResult;

/// Result of solving a relaxation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaxationOutcome {
    /// The relaxation has an optimal solution.
    Feasible,

    /// No point satisfies the restrictions.
    Infeasible,

    /// The relaxation objective is unbounded.
    Unbounded,
}

/// Evaluation of one region.
#[derive(Debug, Clone)]
pub struct Evaluation<C> {
    /// Feasibility of the relaxation.
    pub outcome: RelaxationOutcome,

    /// Bound on every integral completion in the region.
    pub bound: f64,

    /// Relaxation objective value (equal to `bound` for LP relaxations).
    pub objective: f64,

    /// Relaxation solution (None unless feasible).
    pub candidate: Option<C>,

    /// Simplex pivots spent (0 for combinatorial bounds).
    pub lp_iterations: usize,
}

impl<C> Evaluation<C> {
    /// Feasible evaluation.
    pub fn feasible(bound: f64, objective: f64, candidate: C, lp_iterations: usize) -> Self {
        Self {
            outcome: RelaxationOutcome::Feasible,
            bound,
            objective,
            candidate: Some(candidate),
            lp_iterations,
        }
    }

    /// Infeasible evaluation.
    pub fn infeasible(sense: Sense, lp_iterations: usize) -> Self {
        Self {
            outcome: RelaxationOutcome::Infeasible,
            bound: sense.worst(),
            objective: sense.worst(),
            candidate: None,
            lp_iterations,
        }
    }

    /// Unbounded evaluation.
    pub fn unbounded(sense: Sense, lp_iterations: usize) -> Self {
        let best = -sense.worst();
        Self {
            outcome: RelaxationOutcome::Unbounded,
            bound: best,
            objective: best,
            candidate: None,
            lp_iterations,
        }
    }
}

/// Verdict on a feasible candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Inspection<R> {
    /// The candidate is a solution of the original problem.
    Integral {
        /// Its true objective value.
        objective: f64,
    },

    /// Split the region: one child per restriction, in order.
    Branch(Vec<R>),
}

/// Problem-specific relaxation and branching.
pub trait RelaxationOracle {
    /// Restriction added along one tree edge.
    type Restriction: Clone + fmt::Debug;

    /// Relaxation solution.
    type Candidate: Clone + fmt::Debug;

    /// Objective direction.
    fn sense(&self) -> Sense;

    /// Solve the relaxation of the region defined by `restrictions`.
    fn evaluate(&self, restrictions: &[Self::Restriction]) -> BnbResult<Evaluation<Self::Candidate>>;

    /// Decide whether a feasible candidate is integral, or how to branch.
    fn inspect(
        &self,
        restrictions: &[Self::Restriction],
        candidate: &Self::Candidate,
        objective: f64,
    ) -> Inspection<Self::Restriction>;

    /// Human-readable form of a restriction.
    fn describe(&self, restriction: &Self::Restriction) -> String;
}
