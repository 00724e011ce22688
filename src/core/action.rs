//! Move representation.
//!
//! Moves reference cards by `CardId` and melds by their index in the table's
//! meld list, so a move generated against one determinization can be
//! re-checked for legality against another.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::CardId;

/// Cards making up a new meld, in table order. Melds hold at most four cards.
pub type MeldCards = SmallVec<[CardId; 4]>;

/// A complete game move.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Take the top card of the face-down deck.
    DrawDeck,
    /// Take the top card of the face-up pile.
    DrawPile,
    /// Put a new meld on the table from hand.
    Meld(MeldCards),
    /// Add one hand card to an existing meld.
    LayOff { meld: usize, card: CardId },
    /// Replace a fixed wild card in a meld with the natural it stands for.
    SwapWild { meld: usize, card: CardId },
    /// Put one hand card on the pile, ending the turn.
    Discard(CardId),
    /// Finish the current meld or lay-off phase.
    Pass,
}

impl Move {
    /// Build a meld move from card ids.
    #[must_use]
    pub fn meld(cards: &[CardId]) -> Self {
        Move::Meld(SmallVec::from_slice(cards))
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Move::Pass)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::DrawDeck => write!(f, "draw from deck"),
            Move::DrawPile => write!(f, "draw from pile"),
            Move::Meld(cards) => {
                write!(f, "meld [")?;
                for (i, c) in cards.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", c.0)?;
                }
                write!(f, "]")
            }
            Move::LayOff { meld, card } => write!(f, "lay off {} on meld {}", card.0, meld),
            Move::SwapWild { meld, card } => write!(f, "swap {} into meld {}", card.0, meld),
            Move::Discard(card) => write!(f, "discard {}", card.0),
            Move::Pass => write!(f, "pass"),
        }
    }
}
