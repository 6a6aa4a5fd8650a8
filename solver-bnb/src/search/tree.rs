//! Branch-and-bound tree controller.

use std::time::Instant;

use super::{Frontier, NodeId, NodeRegistry, NodeStatus, SearchMonitor, SearchNode};
use crate::error::{BnbError, BnbResult};
use crate::model::{IncumbentTracker, SearchResult, SearchStatus};
use crate::oracle::{Inspection, RelaxationOracle, RelaxationOutcome};
use crate::settings::BnbSettings;

type TreeResult<O> = SearchResult<<O as RelaxationOracle>::Restriction, <O as RelaxationOracle>::Candidate>;

/// Best-first branch-and-bound over any [`RelaxationOracle`].
///
/// Every node is evaluated once when it is created. Infeasible nodes and
/// nodes whose bound cannot beat the pruning threshold are recorded but
/// never queued; the dominance check is repeated when a node is popped
/// because the incumbent may have improved in between.
pub struct BranchAndBound<O: RelaxationOracle> {
    /// Problem-specific relaxation.
    oracle: O,

    /// Evaluated nodes waiting to be expanded.
    queue: Frontier,

    /// Every node created so far.
    registry: NodeRegistry<O::Restriction, O::Candidate>,

    /// Incumbent solution tracker.
    pub incumbent: IncumbentTracker<O::Candidate>,

    /// Frontier pops.
    iterations: u64,

    /// Nodes pruned by bound.
    nodes_pruned: u64,

    /// Nodes with an infeasible relaxation.
    nodes_infeasible: u64,

    /// Nodes that produced an integral solution.
    integer_nodes: u64,

    /// Simplex pivots spent by the oracle.
    lp_iterations: u64,

    /// Start time.
    start_time: Option<Instant>,

    /// Settings.
    settings: BnbSettings,
}

impl<O: RelaxationOracle> BranchAndBound<O> {
    /// Create a new B&B controller.
    pub fn new(oracle: O, settings: BnbSettings) -> Self {
        let sense = oracle.sense();
        Self {
            queue: Frontier::new(settings.node_selection, sense),
            registry: NodeRegistry::new(),
            incumbent: IncumbentTracker::new(sense, settings.solution_pool_size, settings.prune_tol),
            iterations: 0,
            nodes_pruned: 0,
            nodes_infeasible: 0,
            integer_nodes: 0,
            lp_iterations: 0,
            start_time: None,
            oracle,
            settings,
        }
    }

    /// Run the search to completion or until a limit is hit.
    pub fn run<M>(mut self, monitor: &mut M) -> BnbResult<TreeResult<O>>
    where
        M: SearchMonitor<O::Restriction, O::Candidate> + ?Sized,
    {
        self.start_time = Some(Instant::now());
        let sense = self.oracle.sense();

        if self.settings.verbose {
            log::info!(
                "Branch-and-bound: {} with {:?} selection, pool size {}",
                sense,
                self.settings.node_selection,
                self.settings.solution_pool_size
            );
        }

        // Provisional bound until the root is evaluated
        let root = SearchNode::root(-sense.worst());
        if self.add_node(root, monitor)? == NodeStatus::Unbounded {
            return Ok(self.finalize(SearchStatus::Unbounded));
        }

        let status = loop {
            if let Some(status) = self.check_termination(monitor) {
                break status;
            }
            let Some(id) = self.queue.pop() else {
                return Err(BnbError::InternalError("frontier emptied unexpectedly".into()));
            };
            self.iterations += 1;

            if self.expand(id, monitor)? {
                break SearchStatus::Unbounded;
            }
            self.log_progress();
        };

        Ok(self.finalize(status))
    }

    /// Evaluate a new node, register it and queue it if it is still promising.
    fn add_node<M>(&mut self, mut node: SearchNode<O::Restriction, O::Candidate>, monitor: &mut M) -> BnbResult<NodeStatus>
    where
        M: SearchMonitor<O::Restriction, O::Candidate> + ?Sized,
    {
        let eval = self.oracle.evaluate(&node.restrictions)?;
        self.lp_iterations += eval.lp_iterations as u64;
        node.bound = eval.bound;

        node.status = match eval.outcome {
            RelaxationOutcome::Feasible => {
                node.objective = Some(eval.objective);
                node.solution = eval.candidate;
                if self.incumbent.can_improve(eval.bound) {
                    NodeStatus::Active
                } else {
                    self.nodes_pruned += 1;
                    NodeStatus::Pruned
                }
            }
            RelaxationOutcome::Infeasible => {
                self.nodes_infeasible += 1;
                NodeStatus::Infeasible
            }
            RelaxationOutcome::Unbounded => {
                log::warn!("Relaxation unbounded at depth {}; aborting search", node.depth);
                NodeStatus::Unbounded
            }
        };

        let (status, bound, depth) = (node.status, node.bound, node.depth);
        let id = self.registry.insert(node);
        log::debug!("Node {} created at depth {}: {} (bound {:.6})", id, depth, status, bound);

        if status == NodeStatus::Active {
            self.queue.push(id, bound, depth);
        } else {
            monitor.node_settled(&self.registry[id]);
        }
        Ok(status)
    }

    /// Process a popped node. Returns true if the search must abort
    /// because a child relaxation was unbounded.
    fn expand<M>(&mut self, id: NodeId, monitor: &mut M) -> BnbResult<bool>
    where
        M: SearchMonitor<O::Restriction, O::Candidate> + ?Sized,
    {
        let node = &self.registry[id];
        if !self.incumbent.can_improve(node.bound) {
            self.nodes_pruned += 1;
            self.settle(id, NodeStatus::Pruned, monitor);
            return Ok(false);
        }

        let Some(candidate) = node.solution.as_ref() else {
            return Err(BnbError::InternalError(format!(
                "queued node {} has no relaxation solution",
                id
            )));
        };
        let objective = node.objective.unwrap_or(node.bound);
        let inspection = self.oracle.inspect(&node.restrictions, candidate, objective);

        match inspection {
            Inspection::Integral { objective } => {
                self.record_solution(id, objective, monitor);
            }
            Inspection::Branch(restrictions) if restrictions.is_empty() => {
                // Nowhere left to go from this region
                self.nodes_infeasible += 1;
                self.settle(id, NodeStatus::Infeasible, monitor);
            }
            Inspection::Branch(restrictions) => {
                self.settle(id, NodeStatus::Branched, monitor);
                for restriction in restrictions {
                    let label = self.oracle.describe(&restriction);
                    let child = self.registry[id].child(restriction, label);
                    if self.add_node(child, monitor)? == NodeStatus::Unbounded {
                        return Ok(true);
                    }
                }
            }
        }
        Ok(false)
    }

    fn record_solution<M>(&mut self, id: NodeId, objective: f64, monitor: &mut M)
    where
        M: SearchMonitor<O::Restriction, O::Candidate> + ?Sized,
    {
        self.integer_nodes += 1;
        let path = self.registry.path_to_root(id);
        let depth = path.len().saturating_sub(1);

        if let Some(candidate) = self.registry[id].solution.clone() {
            if self.incumbent.offer(candidate, objective, id, path) {
                self.registry.mark_optimal_path(id);
                if self.settings.verbose {
                    log::info!(
                        "New incumbent: obj={:.6} at node {} (depth {})",
                        objective,
                        id,
                        depth
                    );
                }
            }
        }
        self.settle(id, NodeStatus::Integer, monitor);
    }

    fn settle<M>(&mut self, id: NodeId, status: NodeStatus, monitor: &mut M)
    where
        M: SearchMonitor<O::Restriction, O::Candidate> + ?Sized,
    {
        if let Some(node) = self.registry.get_mut(id) {
            node.status = status;
        }
        log::debug!("Node {} settled: {}", id, status);
        monitor.node_settled(&self.registry[id]);
    }

    /// Get elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.start_time
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }

    /// Check if time limit is exceeded.
    pub fn time_limit_exceeded(&self) -> bool {
        if let Some(limit) = self.settings.time_limit_ms {
            self.elapsed_ms() >= limit
        } else {
            false
        }
    }

    /// Check termination conditions.
    ///
    /// Returns Some(status) if we should terminate, None otherwise.
    fn check_termination<M>(&self, monitor: &mut M) -> Option<SearchStatus>
    where
        M: SearchMonitor<O::Restriction, O::Candidate> + ?Sized,
    {
        // Queue empty
        if self.queue.is_empty() {
            return Some(if self.incumbent.has_incumbent() {
                SearchStatus::Optimal
            } else {
                SearchStatus::Infeasible
            });
        }

        if monitor.should_stop(&self.stats()) {
            log::warn!("search interrupted after {} pops", self.iterations);
            return Some(SearchStatus::Interrupted);
        }

        // Time limit
        if self.time_limit_exceeded() {
            log::warn!(
                "time limit reached after {} ms with {} nodes open",
                self.elapsed_ms(),
                self.queue.len()
            );
            return Some(SearchStatus::TimeLimit);
        }

        // Node limit
        if self.iterations >= self.settings.max_nodes {
            log::warn!(
                "node limit of {} reached with {} nodes open",
                self.settings.max_nodes,
                self.queue.len()
            );
            return Some(SearchStatus::NodeLimit);
        }

        None
    }

    /// Finalize the solve and return the result.
    fn finalize(self, status: SearchStatus) -> TreeResult<O> {
        let stats = self.stats();

        let (solution, objective, pool) = if status == SearchStatus::Unbounded {
            (None, None, Vec::new())
        } else {
            let best = self.incumbent.best();
            (
                best.map(|s| s.candidate.clone()),
                best.map(|s| s.objective),
                self.incumbent.into_pool(),
            )
        };

        if self.settings.verbose {
            log::info!(
                "Search finished: {:?} | Objective: {:?} | Nodes: {} | Pops: {} | Time: {:.1}s",
                status,
                objective,
                stats.nodes_created,
                stats.iterations,
                stats.elapsed_ms as f64 / 1000.0,
            );
        }

        SearchResult {
            status,
            solution,
            objective,
            nodes_explored: self.registry.len() as u64,
            iterations: self.iterations,
            registry: self.registry,
            pool,
            stats,
        }
    }

    /// Log progress (if verbose).
    fn log_progress(&self) {
        if !self.settings.verbose {
            return;
        }

        if self.iterations % self.settings.log_freq.max(1) != 0 {
            return;
        }

        log::info!(
            "Pops: {} | Nodes: {} ({} open) | Bound: {:?} | Incumbent: {:?} | Time: {:.1}s",
            self.iterations,
            self.registry.len(),
            self.queue.len(),
            self.queue.best_bound(),
            self.incumbent.obj_val(),
            self.elapsed_ms() as f64 / 1000.0,
        );
    }

    /// Get statistics for display.
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            nodes_created: self.registry.len() as u64,
            iterations: self.iterations,
            nodes_pruned: self.nodes_pruned,
            nodes_infeasible: self.nodes_infeasible,
            integer_nodes: self.integer_nodes,
            nodes_open: self.queue.len() as u64,
            incumbent_updates: self.incumbent.update_count,
            lp_iterations: self.lp_iterations,
            best_bound: self.queue.best_bound(),
            incumbent_obj: self.incumbent.obj_val(),
            elapsed_ms: self.elapsed_ms(),
        }
    }
}

/// Statistics from the B&B tree.
#[derive(Debug, Clone, Default)]
pub struct TreeStats {
    /// Nodes created and evaluated.
    pub nodes_created: u64,

    /// Frontier pops.
    pub iterations: u64,

    /// Nodes pruned by bound (at creation or at pop).
    pub nodes_pruned: u64,

    /// Nodes whose region holds no solution.
    pub nodes_infeasible: u64,

    /// Nodes that produced an integral solution.
    pub integer_nodes: u64,

    /// Nodes waiting on the frontier.
    pub nodes_open: u64,

    /// Improvements of the best solution.
    pub incumbent_updates: u64,

    /// Simplex pivots across all relaxations.
    pub lp_iterations: u64,

    /// Best bound among open nodes.
    pub best_bound: Option<f64>,

    /// Objective of the best solution.
    pub incumbent_obj: Option<f64>,

    /// Wall time since the search started.
    pub elapsed_ms: u64,
}

impl TreeStats {
    /// Relative gap between the incumbent and the best open bound.
    pub fn gap(&self) -> Option<f64> {
        let (primal, dual) = (self.incumbent_obj?, self.best_bound?);
        let denom = primal.abs().max(1e-10);
        Some((primal - dual).abs() / denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::Evaluation;
    use crate::search::NodeRecorder;
    use solver_lp::Sense;

    /// Two levels of left/right choices with fixed bounds; leaves are integral.
    struct ScriptedOracle {
        unbounded_at: Option<Vec<bool>>,
    }

    impl ScriptedOracle {
        fn bound(path: &[bool]) -> f64 {
            match path {
                [] => 10.0,
                [false] => 8.0,
                [true] => 9.0,
                [false, false] => 7.0,
                [false, true] => 4.0,
                [true, false] => 5.0,
                _ => 6.0,
            }
        }
    }

    impl RelaxationOracle for ScriptedOracle {
        type Restriction = bool;
        type Candidate = Vec<bool>;

        fn sense(&self) -> Sense {
            Sense::Maximize
        }

        fn evaluate(&self, restrictions: &[bool]) -> BnbResult<Evaluation<Vec<bool>>> {
            if self.unbounded_at.as_deref() == Some(restrictions) {
                return Ok(Evaluation::unbounded(Sense::Maximize, 0));
            }
            let b = Self::bound(restrictions);
            Ok(Evaluation::feasible(b, b, restrictions.to_vec(), 1))
        }

        fn inspect(&self, restrictions: &[bool], _candidate: &Vec<bool>, objective: f64) -> Inspection<bool> {
            if restrictions.len() == 2 {
                Inspection::Integral { objective }
            } else {
                Inspection::Branch(vec![false, true])
            }
        }

        fn describe(&self, restriction: &bool) -> String {
            if *restriction { "right".into() } else { "left".into() }
        }
    }

    fn scripted() -> ScriptedOracle {
        ScriptedOracle { unbounded_at: None }
    }

    /// Keeps every warning emitted while the tests run.
    struct WarnCapture;

    static WARNINGS: std::sync::Mutex<Vec<String>> = std::sync::Mutex::new(Vec::new());
    static CAPTURE: WarnCapture = WarnCapture;

    impl log::Log for WarnCapture {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                WARNINGS.lock().unwrap().push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    fn capture_warnings() {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Warn);
    }

    fn warned(text: &str) -> bool {
        WARNINGS.lock().unwrap().iter().any(|w| w == text)
    }

    #[test]
    fn test_best_first_order_and_pop_pruning() {
        let mut recorder: NodeRecorder<bool, Vec<bool>> = NodeRecorder::new();
        let result = BranchAndBound::new(scripted(), BnbSettings::default())
            .run(&mut recorder)
            .unwrap();

        assert_eq!(result.status, SearchStatus::Optimal);
        assert_eq!(result.objective, Some(7.0));
        assert_eq!(result.solution, Some(vec![false, false]));

        // root, [F], [T], [T,F], [T,T], [F,F], [F,T]
        assert_eq!(result.nodes_explored, 7);
        assert_eq!(result.iterations, 7);
        assert_eq!(result.stats.lp_iterations, 7);
        assert_eq!(result.optimal_path(), vec![0, 1, 5]);

        let reg = &result.registry;
        assert_eq!(reg[0].status, NodeStatus::Branched);
        assert_eq!(reg[2].status, NodeStatus::Branched);
        assert_eq!(reg[5].status, NodeStatus::Integer);
        assert_eq!(reg[3].status, NodeStatus::Pruned);
        assert_eq!(reg[4].status, NodeStatus::Pruned);
        assert_eq!(reg[6].status, NodeStatus::Pruned);
        assert_eq!(reg[3].label.as_deref(), Some("left"));

        // Settled in pop order: 0, 2, 1, 5, then pruned 4, 3, 6
        let order: Vec<_> = recorder.events.iter().map(|n| n.id).collect();
        assert_eq!(order, vec![0, 2, 1, 5, 4, 3, 6]);
    }

    #[test]
    fn test_children_pruned_at_creation() {
        // Depth-first reaches leaf [T,T] = 6 before expanding [F]; its
        // children 7 and 4 are then created against incumbent 6.
        let settings = BnbSettings::default().with_node_selection(crate::settings::NodeSelection::DepthFirst);
        let result = BranchAndBound::new(scripted(), settings).run(&mut ()).unwrap();

        assert_eq!(result.objective, Some(7.0));
        let reg = &result.registry;
        let pruned_leaf = reg.iter().find(|n| n.restrictions == vec![false, true]).unwrap();
        assert_eq!(pruned_leaf.status, NodeStatus::Pruned);
        assert_eq!(result.stats.incumbent_updates, 2);
    }

    #[test]
    fn test_solution_pool() {
        let settings = BnbSettings::default().with_solution_pool(2);
        let result = BranchAndBound::new(scripted(), settings).run(&mut ()).unwrap();

        let objs: Vec<f64> = result.pool.iter().map(|s| s.objective).collect();
        assert_eq!(objs, vec![7.0, 6.0]);
        assert_eq!(result.pool[1].path, vec![0, 2, 4]);
        assert_eq!(result.optimal_path(), vec![0, 1, 5]);
    }

    #[test]
    fn test_unbounded_aborts() {
        let oracle = ScriptedOracle {
            unbounded_at: Some(vec![true]),
        };
        let result = BranchAndBound::new(oracle, BnbSettings::default()).run(&mut ()).unwrap();

        assert_eq!(result.status, SearchStatus::Unbounded);
        assert!(result.solution.is_none());
        assert!(result.objective.is_none());
        assert_eq!(result.registry[2].status, NodeStatus::Unbounded);
    }

    #[test]
    fn test_node_limit() {
        capture_warnings();
        let settings = BnbSettings::default().with_max_nodes(2);
        let result = BranchAndBound::new(scripted(), settings).run(&mut ()).unwrap();

        assert_eq!(result.status, SearchStatus::NodeLimit);
        assert_eq!(result.iterations, 2);
        assert!(result.solution.is_none());
        assert_eq!(result.stats.nodes_open, 3);
        assert!(warned("node limit of 2 reached with 3 nodes open"));
    }

    #[test]
    fn test_interrupted_keeps_incumbent() {
        capture_warnings();
        let mut recorder: NodeRecorder<bool, Vec<bool>> = NodeRecorder::stopping_after(4);
        let result = BranchAndBound::new(scripted(), BnbSettings::default())
            .run(&mut recorder)
            .unwrap();

        assert_eq!(result.status, SearchStatus::Interrupted);
        assert_eq!(result.objective, Some(7.0));
        assert_eq!(result.iterations, 4);
        assert!(warned("search interrupted after 4 pops"));
    }

    #[test]
    fn test_gap() {
        let stats = TreeStats {
            best_bound: Some(12.0),
            incumbent_obj: Some(10.0),
            ..TreeStats::default()
        };
        assert!((stats.gap().unwrap() - 0.2).abs() < 1e-12);
        assert!(TreeStats::default().gap().is_none());
    }
}
