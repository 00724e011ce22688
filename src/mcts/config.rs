//! ISMCTS configuration parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// ISMCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// UCB1 exploration constant (default: 0.7).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Wall-clock budget for one search.
    pub think_time: Duration,

    /// Optional hard cap on iterations. A search stops at whichever of
    /// `think_time` and this cap comes first.
    pub max_iterations: Option<u32>,

    /// Maximum nodes to allocate in the tree.
    /// Prevents memory exhaustion on long searches.
    pub max_nodes: usize,

    /// Moves a single rollout may take before it is treated as runaway.
    pub max_rollout_moves: u32,

    /// Random seed for determinizations and rollouts.
    /// Same seed and iteration cap produce the same search.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration_constant: 0.7,
            think_time: Duration::from_secs(1),
            max_iterations: None,
            max_nodes: 200_000,
            max_rollout_moves: 10_000,
            seed: 42,
        }
    }
}

impl SearchConfig {
    /// Create a new config with custom exploration constant.
    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Create a new config with custom thinking time.
    #[must_use]
    pub fn with_think_time(mut self, think_time: Duration) -> Self {
        self.think_time = think_time;
        self
    }

    /// Create a new config with an iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Create a new config with custom node cap.
    #[must_use]
    pub fn with_max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Create a new config with a custom rollout length cap.
    #[must_use]
    pub fn with_max_rollout_moves(mut self, moves: u32) -> Self {
        self.max_rollout_moves = moves;
        self
    }

    /// Create a new config with custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
