//! Rummy rules.
//!
//! - `meld`: run/set validation, lay-off and wild-card swap checks
//! - `finder`: candidate melds, lay-offs and swaps for a hand
//! - `engine`: the turn state machine and the `RulesEngine` trait the search
//!   drives it through

pub mod engine;
pub mod finder;
pub mod meld;

pub use engine::{do_move, get_moves, get_result, progress_state, RulesEngine, RummyRules};
pub use finder::{find_layoffs, find_melds, find_swaps};
pub use meld::{
    classify, is_valid_run, is_valid_set, joker_swap_possible, layoff_possible, swap_joker, End,
    Meld, MeldKind, MAX_MELD, MIN_MELD,
};
