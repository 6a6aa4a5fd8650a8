//! Search results and incumbent tracking.

use solver_lp::Sense;

use crate::search::{NodeId, NodeRegistry, TreeStats};

/// Status of a branch-and-bound search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Frontier exhausted; the incumbent is optimal.
    Optimal,

    /// Frontier exhausted without any integral solution.
    Infeasible,

    /// A relaxation was unbounded; the search was aborted.
    Unbounded,

    /// Node limit reached, best solution returned.
    NodeLimit,

    /// Time limit reached, best solution returned.
    TimeLimit,

    /// Stopped by the monitor, best solution returned.
    Interrupted,
}

impl SearchStatus {
    /// Returns true if optimality was proven.
    pub fn is_optimal(&self) -> bool {
        matches!(self, SearchStatus::Optimal)
    }

    /// Returns true if the search stopped before the frontier was exhausted.
    pub fn is_limit(&self) -> bool {
        matches!(
            self,
            SearchStatus::NodeLimit | SearchStatus::TimeLimit | SearchStatus::Interrupted
        )
    }
}

/// An integral solution kept in the pool.
#[derive(Debug, Clone)]
pub struct PooledSolution<C> {
    /// The solution (variable values, or a closed tour).
    pub candidate: C,

    /// Its objective value.
    pub objective: f64,

    /// Node that produced it.
    pub node: NodeId,

    /// Node ids from the root to `node`.
    pub path: Vec<NodeId>,
}

/// Tracks the best known integral solutions.
///
/// Holds up to `capacity` solutions ordered best first. With capacity 1
/// this is a plain incumbent.
#[derive(Debug, Clone)]
pub struct IncumbentTracker<C> {
    sense: Sense,
    capacity: usize,
    tol: f64,
    pool: Vec<PooledSolution<C>>,

    /// Number of times the best solution was improved.
    pub update_count: u64,
}

impl<C> IncumbentTracker<C> {
    /// Create an empty tracker.
    pub fn new(sense: Sense, capacity: usize, tol: f64) -> Self {
        Self {
            sense,
            capacity: capacity.max(1),
            tol,
            pool: Vec::new(),
            update_count: 0,
        }
    }

    /// Check if we have an incumbent.
    pub fn has_incumbent(&self) -> bool {
        !self.pool.is_empty()
    }

    /// Best solution found so far.
    pub fn best(&self) -> Option<&PooledSolution<C>> {
        self.pool.first()
    }

    /// Objective of the best solution (None before the first one).
    pub fn obj_val(&self) -> Option<f64> {
        self.best().map(|s| s.objective)
    }

    /// Value a bound must strictly beat to be worth exploring.
    ///
    /// The worst value for the sense while the pool has room, otherwise
    /// the worst pooled objective.
    pub fn threshold(&self) -> f64 {
        if self.pool.len() < self.capacity {
            self.sense.worst()
        } else {
            self.pool.last().map_or(self.sense.worst(), |s| s.objective)
        }
    }

    /// Check whether a region with this bound can still contribute.
    pub fn can_improve(&self, bound: f64) -> bool {
        if self.pool.len() < self.capacity {
            return !bound.is_nan();
        }
        self.sense.is_better(bound, self.threshold(), self.tol)
    }

    /// Offer an integral solution.
    ///
    /// Returns true if it became the new best solution.
    pub fn offer(&mut self, candidate: C, objective: f64, node: NodeId, path: Vec<NodeId>) -> bool {
        if !self.can_improve(objective) {
            return false;
        }

        // Later solutions go behind equally good earlier ones
        let pos = self
            .pool
            .iter()
            .position(|s| self.sense.is_better(objective, s.objective, self.tol))
            .unwrap_or(self.pool.len());

        self.pool.insert(
            pos,
            PooledSolution {
                candidate,
                objective,
                node,
                path,
            },
        );
        self.pool.truncate(self.capacity);

        if pos == 0 {
            self.update_count += 1;
            true
        } else {
            false
        }
    }

    /// Pooled solutions, best first.
    pub fn solutions(&self) -> &[PooledSolution<C>] {
        &self.pool
    }

    /// Consume the tracker, returning the pool.
    pub fn into_pool(self) -> Vec<PooledSolution<C>> {
        self.pool
    }
}

/// Outcome of a branch-and-bound search.
#[derive(Debug, Clone)]
pub struct SearchResult<R, C> {
    /// Search status.
    pub status: SearchStatus,

    /// Best solution (None when none was found or the search was unbounded).
    pub solution: Option<C>,

    /// Objective value of `solution`.
    pub objective: Option<f64>,

    /// Nodes evaluated by the oracle.
    pub nodes_explored: u64,

    /// Main-loop iterations (frontier pops).
    pub iterations: u64,

    /// Every node created, with parent/child links.
    pub registry: NodeRegistry<R, C>,

    /// Best solutions found, best first.
    pub pool: Vec<PooledSolution<C>>,

    /// Search statistics.
    pub stats: TreeStats,
}

impl<R, C> SearchResult<R, C> {
    /// Returns true if a solution is available.
    pub fn has_solution(&self) -> bool {
        self.solution.is_some()
    }

    /// Node ids from the root to the node holding the best solution.
    pub fn optimal_path(&self) -> Vec<NodeId> {
        self.registry.optimal_path()
    }
}
