//! Branching variable selection.

use super::BoundRestriction;
use crate::model::IlpProblem;
use crate::settings::BranchingRule;

/// A branching decision.
#[derive(Debug, Clone)]
pub struct BranchDecision {
    /// Variable to branch on.
    pub var: usize,

    /// Current (fractional) value.
    pub value: f64,

    /// Restriction for the "down" branch (x <= floor(value)).
    pub down_branch: BoundRestriction,

    /// Restriction for the "up" branch (x >= ceil(value)).
    pub up_branch: BoundRestriction,

    /// Fractionality of the chosen variable.
    pub score: f64,
}

/// Branching variable selector.
#[derive(Debug, Clone)]
pub struct BranchingSelector {
    rule: BranchingRule,
}

impl BranchingSelector {
    /// Create a new branching selector.
    pub fn new(rule: BranchingRule) -> Self {
        Self { rule }
    }

    /// Select a branching variable.
    ///
    /// Returns None if the solution is integer-feasible.
    pub fn select(&self, x: &[f64], prob: &IlpProblem, tol: f64) -> Option<BranchDecision> {
        // Integer variables are kept sorted, so this is index order
        let fractional = prob.get_fractional_vars(x, tol);

        let (var, value, frac) = match self.rule {
            BranchingRule::FirstFractional => fractional.first().copied()?,
            BranchingRule::MostFractional => {
                // Closest to 0.5, lowest index on ties
                fractional
                    .iter()
                    .copied()
                    .reduce(|best, cand| if cand.2 > best.2 { cand } else { best })?
            }
        };

        Some(BranchDecision {
            var,
            value,
            down_branch: BoundRestriction::down_branch(var, value),
            up_branch: BoundRestriction::up_branch(var, value),
            score: frac,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solver_lp::{Constraint, LinearProgram};

    fn problem(n: usize) -> IlpProblem {
        let lp = LinearProgram::maximize(vec![1.0; n]).with_constraint(Constraint::le(vec![1.0; n], 10.0));
        IlpProblem::pure(lp).unwrap()
    }

    #[test]
    fn test_integral_point_has_no_decision() {
        let sel = BranchingSelector::new(BranchingRule::FirstFractional);
        assert!(sel.select(&[1.0, 2.0, 0.0], &problem(3), 1e-6).is_none());
        assert!(sel.select(&[1.0, 2.0000001, 0.0], &problem(3), 1e-6).is_none());
    }

    #[test]
    fn test_first_fractional() {
        let sel = BranchingSelector::new(BranchingRule::FirstFractional);
        let d = sel.select(&[1.0, 2.1, 0.5], &problem(3), 1e-6).unwrap();
        assert_eq!(d.var, 1);
        assert_eq!(d.down_branch.value, 2.0);
        assert_eq!(d.up_branch.value, 3.0);
    }

    #[test]
    fn test_most_fractional() {
        let sel = BranchingSelector::new(BranchingRule::MostFractional);
        let d = sel.select(&[1.0, 2.1, 0.5, 3.5], &problem(4), 1e-6).unwrap();
        assert_eq!(d.var, 2);
        assert!((d.score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_continuous_vars_ignored() {
        let lp = LinearProgram::maximize(vec![1.0, 1.0]).with_constraint(Constraint::le(vec![1.0, 1.0], 3.0));
        let prob = IlpProblem::new(lp, vec![1]).unwrap();
        let sel = BranchingSelector::new(BranchingRule::FirstFractional);
        assert!(sel.select(&[0.5, 2.0], &prob, 1e-6).is_none());
        assert_eq!(sel.select(&[0.5, 2.5], &prob, 1e-6).unwrap().var, 1);
    }
}
