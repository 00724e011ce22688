//! Information-Set Monte Carlo Tree Search.
//!
//! ## Overview
//!
//! The computer cannot see its opponent's hand, so every iteration searches
//! a different determinization: a complete state sampled to match what the
//! searching player knows. All samples share one tree. Key features:
//!
//! - **Per-sample legality**: children are filtered by what is legal in the
//!   current sample at every step of the descent
//! - **Availability counts**: UCB1 uses how often a move was available,
//!   not how often its parent was visited
//! - **Robust child**: the final choice is the most-visited root move
//! - **Time budget**: searches run for a wall-clock thinking time
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use rummy_ismcts::core::{GameConfig, GameState};
//! use rummy_ismcts::mcts::{IsmctsSearch, SearchConfig};
//! use rummy_ismcts::rules::RummyRules;
//!
//! let state = GameState::deal(&GameConfig::default());
//! let config = SearchConfig::default()
//!     .with_think_time(Duration::from_millis(200))
//!     .with_max_iterations(100);
//! let mut search = IsmctsSearch::new(RummyRules, config);
//!
//! if let Ok(Some(mv)) = search.search(&state) {
//!     println!("Best move: {mv}");
//! }
//! for (mv, visits) in search.root_visits() {
//!     println!("{mv}: {visits}");
//! }
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use config::SearchConfig;
pub use node::{IsmctsNode, NodeId};
pub use policy::{RandomSimulation, SelectionPolicy, SimulationPolicy, Ucb1};
pub use search::IsmctsSearch;
pub use stats::SearchStats;
pub use tree::{SearchTree, TreeStats};
