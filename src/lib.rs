//! # rummy-ismcts
//!
//! Two-player Rummy with wild cards and a computer opponent that plays by
//! Information-Set Monte Carlo Tree Search.
//!
//! ## Design Principles
//!
//! 1. **Rules as a state machine**: every turn runs DRAW, MELD, LAY_OFF,
//!    DISCARD. `get_moves` lists what is legal, `do_move` applies it.
//!
//! 2. **Hidden information is sampled, not peeked at**: the search only ever
//!    sees determinized clones built from what the computer could know.
//!
//! 3. **Configuration over globals**: `GameConfig` and `SearchConfig` are
//!    passed in explicitly.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: deck and pile are `im` vectors, so the
//!   thousands of clones a search makes share structure.
//!
//! - **Arena Tree**: search nodes are addressed by index; parents own their
//!   children and children point back by index.
//!
//! - **One Background Worker**: searches run on their own thread and answer
//!   over a one-shot channel polled by the foreground.
//!
//! ## Modules
//!
//! - `core`: Cards, players, moves, game state, RNG, configuration, errors
//! - `rules`: Meld validation, candidate finders, the turn state machine
//! - `determinize`: Sampling a complete state from one player's view
//! - `mcts`: Information-Set Monte Carlo Tree Search
//! - `scheduler`: Background search worker
//! - `session`: Foreground control loop for a presentation layer

pub mod core;
pub mod determinize;
pub mod mcts;
pub mod rules;
pub mod scheduler;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Card, CardId, EngineResult, GameConfig, GameError, GameResult, GameRng, GameState, MeldCards,
    Move, Phase, PlayerId, PlayerMap, Rank, Suit, TableSetup,
};

pub use crate::rules::{
    do_move, find_layoffs, find_melds, get_moves, get_result, is_valid_run, is_valid_set,
    joker_swap_possible, layoff_possible, progress_state, swap_joker, Meld, MeldKind,
    RulesEngine, RummyRules,
};

pub use crate::determinize::clone_and_randomize;

pub use crate::mcts::{
    IsmctsNode, IsmctsSearch, NodeId, RandomSimulation, SearchConfig, SearchStats, SearchTree,
    SelectionPolicy, SimulationPolicy, TreeStats, Ucb1,
};

pub use crate::scheduler::SearchScheduler;
pub use crate::session::RummySession;
