//! Error types for the branch-and-bound solver.

use solver_lp::LpError;
use thiserror::Error;

/// Errors that stop a solve before or outside the search.
///
/// Infeasibility, unboundedness and search limits are not errors; they
/// are reported through [`crate::SearchStatus`].
#[derive(Error, Debug)]
pub enum BnbError {
    /// Problem validation failed
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    /// The relaxation solver rejected its input
    #[error("Relaxation failed: {0}")]
    Relaxation(#[from] LpError),

    /// Internal solver error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type for branch-and-bound operations.
pub type BnbResult<T> = Result<T, BnbError>;
