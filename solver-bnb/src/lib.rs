//! Best-first branch-and-bound for integer linear programs and the
//! travelling-salesman problem.
//!
//! The search engine ([`BranchAndBound`]) is generic over a
//! [`RelaxationOracle`] that bounds a region of the search space:
//!
//! - [`LpOracle`] solves the continuous relaxation of an [`IlpProblem`]
//!   with the Big-M simplex from `solver-lp` and branches on a fractional
//!   integer variable (`x ≤ ⌊v⌋` / `x ≥ ⌈v⌉`).
//! - [`TourOracle`] bounds every tour extending a visitation prefix of a
//!   [`TspProblem`] and branches on the next city.
//!
//! Every node created is kept in a [`NodeRegistry`] with its status, so a
//! finished search can be inspected or rendered as a tree.
//!
//! # Example
//!
//! ```
//! use solver_bnb::{solve_ilp, BnbSettings, IlpProblem, SearchStatus};
//! use solver_lp::{Constraint, LinearProgram};
//!
//! // max x  s.t.  2x <= 5,  x integer
//! let lp = LinearProgram::maximize(vec![1.0]).with_constraint(Constraint::le(vec![2.0], 5.0));
//! let problem = IlpProblem::pure(lp).unwrap();
//!
//! let result = solve_ilp(&problem, &BnbSettings::default()).unwrap();
//! assert_eq!(result.status, SearchStatus::Optimal);
//! assert_eq!(result.objective, Some(2.0));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod model;
pub mod oracle;
pub mod search;
pub mod settings;

pub use error::{BnbError, BnbResult};
pub use model::{
    IlpKind, IlpProblem, IncumbentTracker, Knapsack, PooledSolution, SearchResult, SearchStatus,
    TspProblem,
};
pub use oracle::{Evaluation, Inspection, LpOracle, RelaxationOracle, RelaxationOutcome, TourOracle, Visit};
pub use search::{
    BoundRestriction, BranchAndBound, NodeId, NodeRecorder, NodeRegistry, NodeStatus, SearchMonitor,
    SearchNode, TreeStats,
};
pub use settings::{BnbSettings, BranchingRule, NodeSelection};

/// Result of an integer-program search.
pub type IlpSolution = SearchResult<BoundRestriction, Vec<f64>>;

/// Result of a TSP search. The solution is a closed tour starting and
/// ending at the start city.
pub type TourSolution = SearchResult<Visit, Vec<usize>>;

/// Solve an integer program.
pub fn solve_ilp(problem: &IlpProblem, settings: &BnbSettings) -> BnbResult<IlpSolution> {
    solve_ilp_with_monitor(problem, settings, &mut ())
}

/// Solve an integer program, reporting to `monitor`.
pub fn solve_ilp_with_monitor<M>(
    problem: &IlpProblem,
    settings: &BnbSettings,
    monitor: &mut M,
) -> BnbResult<IlpSolution>
where
    M: SearchMonitor<BoundRestriction, Vec<f64>> + ?Sized,
{
    problem.validate()?;
    if settings.verbose {
        log::info!(
            "Solving {} program: {} variables, {} constraints, {} integer",
            problem.kind(),
            problem.num_vars(),
            problem.num_constraints(),
            problem.num_integers()
        );
    }
    BranchAndBound::new(LpOracle::new(problem, settings), settings.clone()).run(monitor)
}

/// Find a minimum-cost tour.
pub fn solve_tsp(problem: &TspProblem, settings: &BnbSettings) -> BnbResult<TourSolution> {
    solve_tsp_with_monitor(problem, settings, &mut ())
}

/// Find a minimum-cost tour, reporting to `monitor`.
pub fn solve_tsp_with_monitor<M>(
    problem: &TspProblem,
    settings: &BnbSettings,
    monitor: &mut M,
) -> BnbResult<TourSolution>
where
    M: SearchMonitor<Visit, Vec<usize>> + ?Sized,
{
    if settings.verbose {
        log::info!(
            "Solving TSP: {} cities, start at {}",
            problem.num_cities(),
            problem.city_name(problem.start())
        );
    }
    BranchAndBound::new(TourOracle::new(problem), settings.clone()).run(monitor)
}
