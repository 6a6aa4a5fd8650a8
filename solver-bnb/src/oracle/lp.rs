//! LP-relaxation oracle for integer programs.

use solver_lp::{LinearProgram, LpStatus, Sense, SimplexSettings};

use super::{Evaluation, Inspection, RelaxationOracle};
use crate::error::BnbResult;
use crate::model::IlpProblem;
use crate::search::{BoundRestriction, BranchingSelector};
use crate::settings::BnbSettings;

/// Solves the continuous relaxation of an [`IlpProblem`] with extra bound
/// rows, and branches on a fractional integer variable.
pub struct LpOracle<'a> {
    problem: &'a IlpProblem,

    /// Root relaxation (rows plus binary upper bounds).
    base: LinearProgram,

    selector: BranchingSelector,
    int_feas_tol: f64,
    lp_settings: SimplexSettings,
}

impl<'a> LpOracle<'a> {
    /// Create an oracle for `problem`.
    pub fn new(problem: &'a IlpProblem, settings: &BnbSettings) -> Self {
        Self {
            problem,
            base: problem.relaxation(),
            selector: BranchingSelector::new(settings.branching_rule),
            int_feas_tol: settings.int_feas_tol,
            lp_settings: settings.lp_settings.clone(),
        }
    }

    /// Relaxation of the region defined by `restrictions`.
    pub fn restricted_lp(&self, restrictions: &[BoundRestriction]) -> LinearProgram {
        let n = self.problem.num_vars();
        let mut lp = self.base.clone();
        lp.constraints
            .extend(restrictions.iter().map(|r| r.to_constraint(n)));
        lp
    }
}

impl RelaxationOracle for LpOracle<'_> {
    type Restriction = BoundRestriction;
    type Candidate = Vec<f64>;

    fn sense(&self) -> Sense {
        self.problem.lp.sense
    }

    fn evaluate(&self, restrictions: &[BoundRestriction]) -> BnbResult<Evaluation<Vec<f64>>> {
        let lp = self.restricted_lp(restrictions);
        let sol = solver_lp::solve(&lp, &self.lp_settings)?;
        let sense = self.sense();

        let eval = match sol.status {
            LpStatus::Optimal => {
                Evaluation::feasible(sol.obj_val, sol.obj_val, sol.x, sol.iterations)
            }
            LpStatus::Infeasible => Evaluation::infeasible(sense, sol.iterations),
            LpStatus::Unbounded => Evaluation::unbounded(sense, sol.iterations),
            LpStatus::IterationLimit => {
                log::warn!(
                    "Relaxation hit the iteration limit after {} pivots ({} restrictions); treating region as infeasible",
                    sol.iterations,
                    restrictions.len()
                );
                Evaluation::infeasible(sense, sol.iterations)
            }
        };
        Ok(eval)
    }

    fn inspect(
        &self,
        _restrictions: &[BoundRestriction],
        candidate: &Vec<f64>,
        objective: f64,
    ) -> Inspection<BoundRestriction> {
        match self.selector.select(candidate, self.problem, self.int_feas_tol) {
            None => Inspection::Integral { objective },
            Some(decision) => {
                log::debug!(
                    "Branching on x{} = {:.6} (fractionality {:.3})",
                    decision.var + 1,
                    decision.value,
                    decision.score
                );
                Inspection::Branch(vec![decision.down_branch, decision.up_branch])
            }
        }
    }

    fn describe(&self, restriction: &BoundRestriction) -> String {
        restriction.to_string()
    }
}
