//! Arena of every node created during a search.

use std::ops::Index;

use super::{NodeId, NodeStatus, SearchNode};

/// Owns all nodes; ids are indices into the arena.
///
/// Parent and child links are stored as ids, so the tree can be walked in
/// either direction without shared ownership.
#[derive(Debug, Clone)]
pub struct NodeRegistry<R, C> {
    nodes: Vec<SearchNode<R, C>>,
}

impl<R, C> Default for NodeRegistry<R, C> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<R, C> NodeRegistry<R, C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node, assigning the next id and linking it under its parent.
    pub fn insert(&mut self, mut node: SearchNode<R, C>) -> NodeId {
        let id = self.nodes.len();
        node.id = id;
        if let Some(parent) = node.parent_id.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.push(id);
        }
        self.nodes.push(node);
        id
    }

    /// Look up a node.
    pub fn get(&self, id: NodeId) -> Option<&SearchNode<R, C>> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut SearchNode<R, C>> {
        self.nodes.get_mut(id)
    }

    /// The root node, if any node was created.
    pub fn root(&self) -> Option<&SearchNode<R, C>> {
        self.nodes.first()
    }

    /// Number of nodes created.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no node was created.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &SearchNode<R, C>> {
        self.nodes.iter()
    }

    /// Ids from the root down to `id` (empty for an unknown id).
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.nodes.get(id);
        while let Some(node) = current {
            path.push(node.id);
            current = node.parent_id.and_then(|p| self.nodes.get(p));
        }
        path.reverse();
        path
    }

    /// Flag exactly the nodes on the root-to-`id` path as optimal.
    pub fn mark_optimal_path(&mut self, id: NodeId) {
        for node in &mut self.nodes {
            node.is_optimal = false;
        }
        for p in self.path_to_root(id) {
            self.nodes[p].is_optimal = true;
        }
    }

    /// Ids of nodes flagged optimal, root first.
    pub fn optimal_path(&self) -> Vec<NodeId> {
        let mut path: Vec<_> = self.nodes.iter().filter(|n| n.is_optimal).collect();
        path.sort_by_key(|n| n.depth);
        path.into_iter().map(|n| n.id).collect()
    }

    /// Number of nodes with the given status.
    pub fn count_status(&self, status: NodeStatus) -> usize {
        self.nodes.iter().filter(|n| n.status == status).count()
    }
}

impl<R, C> Index<NodeId> for NodeRegistry<R, C> {
    type Output = SearchNode<R, C>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id]
    }
}
