//! Hooks for observing and interrupting a running search.

use super::{SearchNode, TreeStats};

/// Observer of a branch-and-bound search.
///
/// Both hooks default to no-ops, and `()` is the silent monitor.
pub trait SearchMonitor<R, C> {
    /// Called before every frontier pop. Returning true stops the search
    /// with status `Interrupted`.
    fn should_stop(&mut self, _stats: &TreeStats) -> bool {
        false
    }

    /// Called whenever a node's status is decided (including when a
    /// queued node is later branched, pruned or found integral).
    fn node_settled(&mut self, _node: &SearchNode<R, C>) {}
}

impl<R, C> SearchMonitor<R, C> for () {}

/// Records a copy of every settled node, in order.
#[derive(Debug, Clone)]
pub struct NodeRecorder<R, C> {
    /// Recorded snapshots.
    pub events: Vec<SearchNode<R, C>>,

    /// Stop once this many pops have happened (None = never).
    pub stop_after: Option<u64>,
}

impl<R, C> Default for NodeRecorder<R, C> {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            stop_after: None,
        }
    }
}

impl<R, C> NodeRecorder<R, C> {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interrupt the search after `pops` frontier pops.
    pub fn stopping_after(pops: u64) -> Self {
        Self {
            events: Vec::new(),
            stop_after: Some(pops),
        }
    }
}

impl<R: Clone, C: Clone> SearchMonitor<R, C> for NodeRecorder<R, C> {
    fn should_stop(&mut self, stats: &TreeStats) -> bool {
        self.stop_after.is_some_and(|n| stats.iterations >= n)
    }

    fn node_settled(&mut self, node: &SearchNode<R, C>) {
        self.events.push(node.clone());
    }
}
