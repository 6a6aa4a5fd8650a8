//! Configuration settings for the simplex solver.

/// Simplex solver settings.
#[derive(Debug, Clone)]
pub struct SimplexSettings {
    /// Penalty placed on every artificial column of the objective row.
    pub big_m: f64,

    /// Entering-column and ratio-test tolerance.
    /// Reduced costs and pivot-column entries within this of zero are ignored.
    pub pivot_tol: f64,

    /// A basic artificial variable above this value marks the problem infeasible.
    pub artificial_tol: f64,

    /// Tolerance for re-checking the extracted solution against the original rows.
    pub feas_tol: f64,

    /// Maximum number of pivots before the solve is abandoned.
    pub max_iter: usize,

    /// Keep a snapshot of the tableau before the first pivot and after each pivot.
    pub record_trace: bool,
}

impl Default for SimplexSettings {
    fn default() -> Self {
        // Allow environment variable override for the pivot cap
        let max_iter = std::env::var("SOLVER_LP_MAX_ITER")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(100);

        Self {
            big_m: 10_000.0,
            pivot_tol: 1e-10,
            artificial_tol: 1e-6,
            feas_tol: 1e-6,
            max_iter,
            record_trace: false,
        }
    }
}

impl SimplexSettings {
    /// Create settings that record a tableau snapshot for every pivot.
    pub fn traced() -> Self {
        Self {
            record_trace: true,
            ..Self::default()
        }
    }

    /// Set the Big-M penalty.
    pub fn with_big_m(mut self, big_m: f64) -> Self {
        self.big_m = big_m;
        self
    }

    /// Set the pivot cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }
}
