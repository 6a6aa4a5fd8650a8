//! Dense simplex solver for the continuous relaxations used by branch-and-bound.
//!
//! Supports `≤`, `≥` and `=` rows through slack, surplus and artificial
//! variables, with artificial columns driven out of the basis by a Big-M
//! penalty. Both maximization and minimization are handled directly.
//!
//! # Example
//!
//! ```
//! use solver_lp::{solve, Constraint, LinearProgram, LpStatus, SimplexSettings};
//!
//! // max 3x + 5y  s.t.  x <= 4,  2y <= 12,  3x + 2y <= 18
//! let lp = LinearProgram::maximize(vec![3.0, 5.0])
//!     .with_constraint(Constraint::le(vec![1.0, 0.0], 4.0))
//!     .with_constraint(Constraint::le(vec![0.0, 2.0], 12.0))
//!     .with_constraint(Constraint::le(vec![3.0, 2.0], 18.0));
//!
//! let sol = solve(&lp, &SimplexSettings::default()).unwrap();
//! assert_eq!(sol.status, LpStatus::Optimal);
//! assert!((sol.obj_val - 36.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod problem;
pub mod settings;
pub mod simplex;
pub mod tableau;

pub use error::{LpError, LpResult};
pub use problem::{Constraint, LinearProgram, Relation, Sense};
pub use settings::SimplexSettings;
pub use simplex::{solve, LpSolution, LpStatus, SimplexTrace};
pub use tableau::{ColumnKind, Pivot, Tableau, TableauSnapshot};
