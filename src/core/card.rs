//! Playing cards.
//!
//! A `Card` is a value type, but every physical card carries a stable
//! `CardId`. Two wild cards compare equal by face yet stay distinguishable by
//! id, which is what moves and identity-sensitive bookkeeping key on.

use serde::{Deserialize, Serialize};

/// Number of natural (non-wild) cards in the deck.
pub const NATURAL_CARDS: usize = 52;

/// Number of wild cards added when wild cards are enabled.
pub const WILD_CARDS: usize = 2;

/// Stable per-instance card identifier.
///
/// Naturals are `0..52` (suit-major), wild cards are `52` and `53`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u8);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card suit. Wild cards have no suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Spades,
    Hearts,
    Diamonds,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Spades, Suit::Hearts, Suit::Diamonds];

    fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
        }
    }
}

/// Card rank: 2..=14 for naturals (14 is the ace), 15 for the wild card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rank(pub u8);

impl Rank {
    pub const TWO: Rank = Rank(2);
    pub const TEN: Rank = Rank(10);
    pub const JACK: Rank = Rank(11);
    pub const QUEEN: Rank = Rank(12);
    pub const KING: Rank = Rank(13);
    pub const ACE: Rank = Rank(14);
    pub const WILD: Rank = Rank(15);

    /// Penalty value of a card of this rank left in hand.
    #[must_use]
    pub const fn score(self) -> u32 {
        match self.0 {
            2..=10 => self.0 as u32,
            11..=13 => 10,
            14 => 11,
            _ => 15,
        }
    }

    /// All natural ranks, two through ace.
    pub fn naturals() -> impl Iterator<Item = Rank> {
        (Self::TWO.0..=Self::ACE.0).map(Rank)
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            2..=10 => write!(f, "{}", self.0),
            11 => write!(f, "J"),
            12 => write!(f, "Q"),
            13 => write!(f, "K"),
            14 => write!(f, "A"),
            _ => write!(f, "W"),
        }
    }
}

/// A physical card together with its table flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    /// `None` for wild cards.
    pub suit: Option<Suit>,
    pub rank: Rank,
    /// Locked into a meld by a previous turn.
    pub fixed: bool,
    /// Visible to the opponent while in hand (taken face-up).
    pub known: bool,
}

impl Card {
    /// A natural card. The id is derived from suit and rank.
    #[must_use]
    pub fn natural(suit: Suit, rank: Rank) -> Self {
        debug_assert!((Rank::TWO..=Rank::ACE).contains(&rank));
        let id = suit as u8 * 13 + (rank.0 - Rank::TWO.0);
        Self {
            id: CardId(id),
            suit: Some(suit),
            rank,
            fixed: false,
            known: false,
        }
    }

    /// One of the two wild cards (`copy` is 0 or 1).
    #[must_use]
    pub fn wild(copy: u8) -> Self {
        debug_assert!((copy as usize) < WILD_CARDS);
        Self {
            id: CardId(NATURAL_CARDS as u8 + copy),
            suit: None,
            rank: Rank::WILD,
            fixed: false,
            known: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_wild(&self) -> bool {
        self.rank == Rank::WILD
    }

    /// Penalty value of this card.
    #[inline]
    #[must_use]
    pub fn score(&self) -> u32 {
        self.rank.score()
    }

    /// Clear table flags, as when a card goes back into the deck.
    pub fn reset_flags(&mut self) {
        self.fixed = false;
        self.known = false;
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.suit {
            Some(suit) => write!(f, "{}{}", self.rank, suit.symbol()),
            None => write!(f, "{}", self.rank),
        }
    }
}

/// Build an unshuffled deck: 52 naturals, plus two wild cards if enabled.
#[must_use]
pub fn full_deck(wild_cards: bool) -> Vec<Card> {
    let mut cards: Vec<Card> = Suit::ALL
        .iter()
        .flat_map(|&suit| Rank::naturals().map(move |rank| Card::natural(suit, rank)))
        .collect();
    if wild_cards {
        cards.extend((0..WILD_CARDS as u8).map(Card::wild));
    }
    cards
}

/// Total score of a group of cards.
#[must_use]
pub fn score_of(cards: &[Card]) -> u32 {
    cards.iter().map(Card::score).sum()
}

/// Sort for display: by rank, then suit.
pub fn sort_by_rank(cards: &mut [Card]) {
    cards.sort_by_key(|c| (c.rank, c.suit));
}

/// Sort for display: by suit, then rank. Wild cards go first.
pub fn sort_by_suit(cards: &mut [Card]) {
    cards.sort_by_key(|c| (c.suit, c.rank));
}
