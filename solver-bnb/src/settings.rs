//! Configuration settings for the branch-and-bound search.

use solver_lp::SimplexSettings;

/// Branching variable selection rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchingRule {
    /// First fractional variable in declared integer-variable order.
    #[default]
    FirstFractional,

    /// Variable with fractional part closest to 0.5 (first one on ties).
    MostFractional,
}

/// Node selection strategy for the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeSelection {
    /// Best bound first; ties go to the lowest node id.
    #[default]
    BestBound,

    /// Deepest node first, then best bound, then lowest node id.
    DepthFirst,
}

/// Branch-and-bound settings.
#[derive(Debug, Clone)]
pub struct BnbSettings {
    // === Tolerances ===
    /// Integer feasibility tolerance.
    /// A variable is considered integer if |x - round(x)| <= int_feas_tol.
    pub int_feas_tol: f64,

    /// Slack used when deciding whether one objective value is strictly
    /// better than another.
    pub prune_tol: f64,

    // === Termination criteria ===
    /// Maximum number of frontier pops.
    pub max_nodes: u64,

    /// Time limit in milliseconds (None = unlimited).
    pub time_limit_ms: Option<u64>,

    // === Search strategy ===
    /// Branching variable selection rule.
    pub branching_rule: BranchingRule,

    /// Node selection strategy.
    pub node_selection: NodeSelection,

    /// Number of best integral solutions to keep (1 = incumbent only).
    pub solution_pool_size: usize,

    // === Relaxation ===
    /// Settings for the simplex relaxation solver.
    pub lp_settings: SimplexSettings,

    // === Output ===
    /// Log progress information.
    pub verbose: bool,

    /// Log frequency (every N pops).
    pub log_freq: u64,
}

impl Default for BnbSettings {
    fn default() -> Self {
        Self {
            // Tolerances
            int_feas_tol: 1e-6,
            prune_tol: 1e-9,

            // Termination
            max_nodes: 1_000_000,
            time_limit_ms: None,

            // Search
            branching_rule: BranchingRule::default(),
            node_selection: NodeSelection::default(),
            solution_pool_size: 1,

            // Relaxation
            lp_settings: SimplexSettings::default(),

            // Output
            verbose: false,
            log_freq: 100,
        }
    }
}

impl BnbSettings {
    /// Create settings with verbose output enabled.
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            log_freq: 1,
            ..Self::default()
        }
    }

    /// Set time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit_ms = Some((seconds * 1000.0) as u64);
        self
    }

    /// Set maximum number of frontier pops.
    pub fn with_max_nodes(mut self, nodes: u64) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Keep the `size` best integral solutions.
    pub fn with_solution_pool(mut self, size: usize) -> Self {
        self.solution_pool_size = size.max(1);
        self
    }

    /// Set the branching rule.
    pub fn with_branching_rule(mut self, rule: BranchingRule) -> Self {
        self.branching_rule = rule;
        self
    }

    /// Set the node selection strategy.
    pub fn with_node_selection(mut self, selection: NodeSelection) -> Self {
        self.node_selection = selection;
        self
    }

    /// Replace the relaxation solver settings.
    pub fn with_lp_settings(mut self, lp_settings: SimplexSettings) -> Self {
        self.lp_settings = lp_settings;
        self
    }
}
