//! Core game types: cards, players, moves, state, RNG, configuration, errors.
//!
//! Everything here is plain data. Legality and state transitions live in
//! `rules`.

pub mod action;
pub mod card;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{MeldCards, Move};
pub use card::{full_deck, score_of, sort_by_rank, sort_by_suit, Card, CardId, Rank, Suit};
pub use config::GameConfig;
pub use error::{EngineResult, GameError};
pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::GameRng;
pub use state::{GameResult, GameState, Phase, TableSetup};
