//! ISMCTS node structure.
//!
//! Nodes live in an arena and refer to each other by `NodeId`. A parent owns
//! its children through the index list; the child's `parent` index is only
//! followed during backpropagation.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Index into the `SearchTree` node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A node in the ISMCTS tree.
///
/// Statistics are stored from the point of view of `mover`, the player who
/// made the move leading here. The root has neither a move nor a mover.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IsmctsNode<M> {
    /// Move that produced this node (`None` at the root).
    pub mv: Option<M>,

    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Expanded children in creation order.
    pub children: Vec<NodeId>,

    /// Player who made `mv`.
    pub mover: Option<PlayerId>,

    /// Depth in tree (root = 0).
    pub depth: u16,

    /// Times this node was on a backpropagation path.
    pub visits: u32,

    /// Sum of terminal results for `mover`.
    pub reward: f64,

    /// Times this node's move was legal when its parent was selected from.
    /// Starts at 1 so the exploration term is defined on the first visit.
    pub considerations: u32,
}

impl<M> IsmctsNode<M> {
    /// Create a child node.
    pub fn new(mv: M, parent: NodeId, mover: PlayerId, depth: u16) -> Self {
        Self {
            mv: Some(mv),
            parent,
            children: Vec::new(),
            mover: Some(mover),
            depth,
            visits: 0,
            reward: 0.0,
            considerations: 1,
        }
    }

    /// Create a root node.
    pub fn root() -> Self {
        Self {
            mv: None,
            parent: NodeId::NONE,
            children: Vec::new(),
            mover: None,
            depth: 0,
            visits: 0,
            reward: 0.0,
            considerations: 1,
        }
    }

    /// Mean result for the mover.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.reward / self.visits as f64
        }
    }

    /// Record one backpropagated result.
    pub fn update(&mut self, result: Option<f64>) {
        self.visits += 1;
        if let Some(result) = result {
            self.reward += result;
        }
    }
}
