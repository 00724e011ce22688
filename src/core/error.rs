//! Engine error taxonomy.

use thiserror::Error;

use super::action::Move;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The submitted move is not among the legal moves. State is unchanged.
    #[error("illegal move: {mv}")]
    IllegalMove { mv: Move },

    /// Internal inconsistency. Fatal to the current round.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The background search ended without publishing a move.
    #[error("search worker stopped without a result")]
    SearchUnavailable,
}

impl GameError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        GameError::InvariantViolation(message.into())
    }
}

pub type EngineResult<T> = Result<T, GameError>;
