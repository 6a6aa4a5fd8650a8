//! Branch-and-bound search tree management.

mod branching;
mod monitor;
mod node;
mod queue;
mod registry;
mod tree;

pub use branching::{BranchDecision, BranchingSelector};
pub use monitor::{NodeRecorder, SearchMonitor};
pub use node::{BoundRestriction, NodeId, NodeStatus, SearchNode};
pub use queue::Frontier;
pub use registry::NodeRegistry;
pub use tree::{BranchAndBound, TreeStats};
