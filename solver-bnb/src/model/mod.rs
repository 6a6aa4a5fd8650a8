//! Problem and solution types for branch-and-bound.

mod knapsack;
mod problem;
mod solution;
mod tsp;

pub use knapsack::Knapsack;
pub use problem::{fractionality, IlpKind, IlpProblem};
pub use solution::{IncumbentTracker, PooledSolution, SearchResult, SearchStatus};
pub use tsp::TspProblem;
