//! Search node representation.

use std::fmt;

use solver_lp::{Constraint, Relation};

/// Node identifier: index into the registry, assigned in creation order.
pub type NodeId = usize;

/// Status of a search node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    /// Node is evaluated and waiting on the frontier.
    Active,

    /// Node was branched (children created).
    Branched,

    /// Node produced an integral solution (complete tour for TSP).
    Integer,

    /// Node bound cannot beat the incumbent.
    Pruned,

    /// Node relaxation is infeasible.
    Infeasible,

    /// Node relaxation is unbounded; the search stops here.
    Unbounded,
}

impl NodeStatus {
    /// Returns true once the node will not be expanded any further.
    pub fn is_settled(&self) -> bool {
        !matches!(self, NodeStatus::Active)
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeStatus::Active => write!(f, "ACTIVE"),
            NodeStatus::Branched => write!(f, "BRANCHED"),
            NodeStatus::Integer => write!(f, "INTEGER"),
            NodeStatus::Pruned => write!(f, "PRUNED"),
            NodeStatus::Infeasible => write!(f, "INFEASIBLE"),
            NodeStatus::Unbounded => write!(f, "UNBOUNDED"),
        }
    }
}

/// A single-variable restriction added by ILP branching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundRestriction {
    /// Variable index.
    pub var: usize,

    /// `Le` for an upper bound, `Ge` for a lower bound.
    pub relation: Relation,

    /// Integral bound value.
    pub value: f64,
}

impl BoundRestriction {
    /// Create a "down" branch: x <= floor(value).
    pub fn down_branch(var: usize, value: f64) -> Self {
        Self {
            var,
            relation: Relation::Le,
            value: value.floor(),
        }
    }

    /// Create an "up" branch: x >= ceil(value).
    pub fn up_branch(var: usize, value: f64) -> Self {
        Self {
            var,
            relation: Relation::Ge,
            value: value.ceil(),
        }
    }

    /// Check whether a value of the restricted variable satisfies this restriction.
    pub fn admits(&self, x: f64) -> bool {
        match self.relation {
            Relation::Le => x <= self.value,
            Relation::Ge => x >= self.value,
            Relation::Eq => x == self.value,
        }
    }

    /// Constraint row over `n` variables.
    pub fn to_constraint(&self, n: usize) -> Constraint {
        Constraint::unit(n, self.var, self.relation, self.value)
    }
}

impl fmt::Display for BoundRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{} {} {}", self.var + 1, self.relation, self.value)
    }
}

/// A node in the B&B search tree.
///
/// `R` is the restriction type accumulated along the path from the root,
/// `C` the candidate produced by the relaxation.
#[derive(Debug, Clone)]
pub struct SearchNode<R, C> {
    /// Unique node identifier.
    pub id: NodeId,

    /// Parent node ID (None for root).
    pub parent_id: Option<NodeId>,

    /// Depth in the tree (0 for root).
    pub depth: usize,

    /// Restrictions accumulated from the root to this node.
    pub restrictions: Vec<R>,

    /// Human-readable description of the restriction that created this node.
    pub label: Option<String>,

    /// Relaxation candidate (None when infeasible).
    pub solution: Option<C>,

    /// Relaxation objective value (None when infeasible).
    pub objective: Option<f64>,

    /// Bound on every integral completion inside this node's region.
    pub bound: f64,

    /// Node processing status.
    pub status: NodeStatus,

    /// Children, in creation order.
    pub children: Vec<NodeId>,

    /// Member of the root-to-best-solution path.
    pub is_optimal: bool,
}

impl<R: Clone, C> SearchNode<R, C> {
    /// Create the root node.
    pub fn root(bound: f64) -> Self {
        Self {
            id: 0,
            parent_id: None,
            depth: 0,
            restrictions: Vec::new(),
            label: None,
            solution: None,
            objective: None,
            bound,
            status: NodeStatus::Active,
            children: Vec::new(),
            is_optimal: false,
        }
    }

    /// Create a child node from one more restriction.
    ///
    /// The child's id is assigned by the registry.
    pub fn child(&self, restriction: R, label: String) -> Self {
        let mut restrictions = self.restrictions.clone();
        restrictions.push(restriction);

        Self {
            id: 0,
            parent_id: Some(self.id),
            depth: self.depth + 1,
            restrictions,
            label: Some(label),
            solution: None,
            objective: None,
            bound: self.bound, // Inherit parent's bound until evaluated
            status: NodeStatus::Active,
            children: Vec::new(),
            is_optimal: false,
        }
    }
}

impl<R, C> SearchNode<R, C> {
    /// Returns true if this is the root.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// The most recent restriction (None for root).
    pub fn last_restriction(&self) -> Option<&R> {
        self.restrictions.last()
    }
}
