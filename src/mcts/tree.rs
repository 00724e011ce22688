//! Arena-based ISMCTS tree.
//!
//! Uses a flat `Vec<IsmctsNode>` with index-based references, so the
//! parent/child links never form ownership cycles.

use serde::{Deserialize, Serialize};

use super::node::{IsmctsNode, NodeId};
use crate::core::PlayerId;

/// Arena-based ISMCTS tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchTree<M> {
    /// All nodes in the tree.
    nodes: Vec<IsmctsNode<M>>,

    /// The root node ID (always 0 after initialization).
    root: NodeId,
}

impl<M> Default for SearchTree<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> SearchTree<M> {
    /// Create a new tree with a root node.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a tree with custom initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(IsmctsNode::root());
        Self {
            nodes,
            root: NodeId::new(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &IsmctsNode<M> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut IsmctsNode<M> {
        &mut self.nodes[id.0 as usize]
    }

    /// Add a child under `parent`, returning its ID.
    pub fn add_child(&mut self, parent: NodeId, mv: M, mover: PlayerId) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        let depth = self.get(parent).depth + 1;
        self.nodes.push(IsmctsNode::new(mv, parent, mover, depth));
        self.get_mut(parent).children.push(id);
        id
    }

    /// Children of `id` in creation order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Clear the tree and reset with a new root.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.nodes.push(IsmctsNode::root());
        self.root = NodeId::new(0);
    }

    /// Get the root node.
    #[must_use]
    pub fn root_node(&self) -> &IsmctsNode<M> {
        self.get(self.root)
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &IsmctsNode<M>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let max_depth = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        let leaf_count = self.nodes.iter().filter(|n| n.children.is_empty()).count();
        let root_children = self.root_node().children.len();

        TreeStats {
            node_count: self.nodes.len(),
            max_depth,
            leaf_count,
            root_children,
        }
    }
}

impl<M: PartialEq> SearchTree<M> {
    /// Moves in `legal` that have no child under `id` yet.
    #[must_use]
    pub fn untried_moves<'a>(&self, id: NodeId, legal: &'a [M]) -> Vec<&'a M> {
        let children = self.children(id);
        legal
            .iter()
            .filter(|mv| !children.iter().any(|&c| self.get(c).mv.as_ref() == Some(*mv)))
            .collect()
    }

    /// Children of `id` whose move is in `legal`.
    #[must_use]
    pub fn legal_children(&self, id: NodeId, legal: &[M]) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.get(c).mv.as_ref().is_some_and(|mv| legal.contains(mv)))
            .collect()
    }
}

/// Statistics about the ISMCTS tree.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Maximum depth reached.
    pub max_depth: u16,

    /// Nodes without children.
    pub leaf_count: usize,

    /// Moves tried at the root.
    pub root_children: usize,
}

impl TreeStats {
    /// Get the branching factor (average children per inner node).
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        let inner = self.node_count - self.leaf_count;
        if inner == 0 {
            0.0
        } else {
            (self.node_count - 1) as f64 / inner as f64
        }
    }
}
