//! Big-M simplex iteration and solution extraction.

use std::fmt;

use crate::error::LpResult;
use crate::problem::LinearProgram;
use crate::settings::SimplexSettings;
use crate::tableau::{ColumnKind, Pivot, Tableau, TableauSnapshot};

/// Outcome of a simplex solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpStatus {
    /// Optimal solution found.
    Optimal,

    /// No point satisfies every row.
    Infeasible,

    /// The objective can be improved without limit.
    Unbounded,

    /// The pivot cap was reached before optimality; the tableau is not trusted.
    IterationLimit,
}

impl fmt::Display for LpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LpStatus::Optimal => write!(f, "Optimal"),
            LpStatus::Infeasible => write!(f, "Infeasible"),
            LpStatus::Unbounded => write!(f, "Unbounded"),
            LpStatus::IterationLimit => write!(f, "Iteration Limit"),
        }
    }
}

/// Recorded tableau states of one solve.
#[derive(Debug, Clone, Default)]
pub struct SimplexTrace {
    /// Column roles, shared by every snapshot.
    pub columns: Vec<ColumnKind>,

    /// Initial tableau followed by one snapshot per pivot.
    pub snapshots: Vec<TableauSnapshot>,
}

/// Simplex result.
#[derive(Debug, Clone)]
pub struct LpSolution {
    /// Solve status.
    pub status: LpStatus,

    /// Structural solution (empty unless `status` is Optimal).
    pub x: Vec<f64>,

    /// Objective value recomputed from the original coefficients.
    pub obj_val: f64,

    /// Number of pivots performed.
    pub iterations: usize,

    /// Tableau snapshots, when requested through `SimplexSettings::record_trace`.
    pub trace: Option<SimplexTrace>,
}

impl LpSolution {
    fn terminal(status: LpStatus, iterations: usize, trace: Option<SimplexTrace>) -> Self {
        Self {
            status,
            x: Vec::new(),
            obj_val: f64::NAN,
            iterations,
            trace,
        }
    }

    /// Returns true if an optimal solution was found.
    pub fn is_optimal(&self) -> bool {
        self.status == LpStatus::Optimal
    }
}

/// Solve a linear program with the Big-M simplex method.
///
/// A fresh tableau is built for every call and dropped on return.
pub fn solve(lp: &LinearProgram, settings: &SimplexSettings) -> LpResult<LpSolution> {
    lp.validate()?;

    let mut tableau = Tableau::new(lp, settings);
    let mut trace = settings.record_trace.then(|| SimplexTrace {
        columns: tableau.columns().to_vec(),
        snapshots: vec![tableau.snapshot(0, None)],
    });

    let mut iterations = 0;
    loop {
        let Some(col) = tableau.entering_column(settings.pivot_tol) else {
            break;
        };

        if iterations >= settings.max_iter {
            log::warn!(
                "simplex stopped after {} pivots without reaching optimality",
                iterations
            );
            return Ok(LpSolution::terminal(LpStatus::IterationLimit, iterations, trace));
        }

        let Some(row) = tableau.leaving_row(col, settings.pivot_tol) else {
            log::debug!("column {} has no positive entry: unbounded", col);
            return Ok(LpSolution::terminal(LpStatus::Unbounded, iterations, trace));
        };

        let pivot = Pivot { row, col };
        tableau.pivot(pivot);
        iterations += 1;

        if let Some(trace) = trace.as_mut() {
            trace.snapshots.push(tableau.snapshot(iterations, Some(pivot)));
        }
    }

    if tableau.has_artificial_residue(settings.artificial_tol) {
        log::debug!("artificial variable left in basis: infeasible");
        let largest = lp.objective.iter().fold(0.0_f64, |m, c| m.max(c.abs()));
        if largest >= settings.big_m {
            log::warn!(
                "objective coefficient {} is not below big_m {}; infeasible verdict may be spurious",
                largest,
                settings.big_m
            );
        }
        return Ok(LpSolution::terminal(LpStatus::Infeasible, iterations, trace));
    }

    let x = tableau.structural_solution();
    if !lp.is_satisfied_by(&x, settings.feas_tol) {
        log::debug!("extracted point violates the original rows: infeasible");
        return Ok(LpSolution::terminal(LpStatus::Infeasible, iterations, trace));
    }

    let obj_val = lp.objective_value(&x);
    log::debug!("simplex optimal after {} pivots: obj={:.6}", iterations, obj_val);

    Ok(LpSolution {
        status: LpStatus::Optimal,
        x,
        obj_val,
        iterations,
        trace,
    })
}
