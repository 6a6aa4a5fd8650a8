//! Frontier of evaluated, unsettled nodes.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use solver_lp::Sense;

use super::NodeId;
use crate::settings::NodeSelection;

/// Entry in the frontier with priority.
#[derive(Debug, Clone, Copy)]
struct QueuedNode {
    id: NodeId,
    bound: f64,
    priority: f64, // Higher = selected first
    tiebreak: f64,
}

impl PartialEq for QueuedNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedNode {}

impl PartialOrd for QueuedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher priority first, then the earlier-created node
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| self.tiebreak.total_cmp(&other.tiebreak))
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Priority queue for B&B nodes.
///
/// Under best-bound selection the most promising bound wins (largest for
/// maximization, smallest for minimization); ties go to the lowest id.
pub struct Frontier {
    /// Node selection strategy.
    strategy: NodeSelection,

    /// Objective direction.
    sense: Sense,

    /// Priority queue (max-heap by priority).
    heap: BinaryHeap<QueuedNode>,

    /// Count of nodes added.
    nodes_added: u64,

    /// Count of nodes popped.
    nodes_popped: u64,
}

impl Frontier {
    /// Create an empty frontier.
    pub fn new(strategy: NodeSelection, sense: Sense) -> Self {
        Self {
            strategy,
            sense,
            heap: BinaryHeap::new(),
            nodes_added: 0,
            nodes_popped: 0,
        }
    }

    /// Add an evaluated node.
    pub fn push(&mut self, id: NodeId, bound: f64, depth: usize) {
        let (priority, tiebreak) = self.compute_priority(bound, depth);
        self.heap.push(QueuedNode {
            id,
            bound,
            priority,
            tiebreak,
        });
        self.nodes_added += 1;
    }

    /// Remove the next node to process.
    pub fn pop(&mut self) -> Option<NodeId> {
        let queued = self.heap.pop()?;
        self.nodes_popped += 1;
        Some(queued.id)
    }

    /// Next node without removing it.
    pub fn peek(&self) -> Option<NodeId> {
        self.heap.peek().map(|q| q.id)
    }

    /// Most promising bound among queued nodes (None when empty).
    pub fn best_bound(&self) -> Option<f64> {
        let sense = self.sense;
        self.heap
            .iter()
            .map(|q| q.bound)
            .max_by(|a, b| sense.signed(*a).total_cmp(&sense.signed(*b)))
    }

    /// Check if the frontier is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of queued nodes.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Total number of nodes added.
    pub fn total_added(&self) -> u64 {
        self.nodes_added
    }

    /// Total number of nodes popped.
    pub fn total_popped(&self) -> u64 {
        self.nodes_popped
    }

    fn compute_priority(&self, bound: f64, depth: usize) -> (f64, f64) {
        match self.strategy {
            NodeSelection::BestBound => (self.sense.signed(bound), 0.0),
            // Deepest first, better bound among equal depth
            NodeSelection::DepthFirst => (depth as f64, self.sense.signed(bound)),
        }
    }
}
