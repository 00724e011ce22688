//! Melds and their validation.
//!
//! A run is three or four cards of one suit with consecutive ranks; a set is
//! three or four cards of one rank in different suits. Wild cards fill gaps
//! in both. The ace plays low (A-2-3) or high (Q-K-A) depending on where it
//! sits; that choice is computed from the meld's layout every time and never
//! written back into the card.

use serde::{Deserialize, Serialize};

use crate::core::{Card, Rank, Suit};

/// Smallest legal meld.
pub const MIN_MELD: usize = 3;

/// Largest legal meld.
pub const MAX_MELD: usize = 4;

/// Effective value of an ace at the bottom of a run.
const LOW_ACE: i16 = 1;

/// Meld classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeldKind {
    Run,
    Set,
}

/// Which end of a run a card joins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum End {
    Front,
    Back,
}

/// An ordered group of cards on the table.
///
/// The classification and wild-card count are cached and refreshed on every
/// mutation. An empty meld is the placeholder slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    cards: Vec<Card>,
    kind: Option<MeldKind>,
    wilds: u8,
}

impl Meld {
    /// An empty placeholder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a meld from cards in table order.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        let mut meld = Self {
            cards,
            kind: None,
            wilds: 0,
        };
        meld.refresh();
        meld
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// `None` when the cards form neither a run nor a set.
    #[must_use]
    pub fn kind(&self) -> Option<MeldKind> {
        self.kind
    }

    #[must_use]
    pub fn wild_count(&self) -> usize {
        self.wilds as usize
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.kind.is_some()
    }

    /// Suit of a run (derived from its naturals), `None` for sets.
    #[must_use]
    pub fn suit(&self) -> Option<Suit> {
        match self.kind {
            Some(MeldKind::Run) => self.cards.iter().find_map(|c| c.suit),
            _ => None,
        }
    }

    /// Mark every card as locked in by a finished turn.
    pub fn fix_cards(&mut self) {
        for card in &mut self.cards {
            card.fixed = true;
        }
    }

    pub(crate) fn place(&mut self, card: Card, end: End) {
        match end {
            End::Front => self.cards.insert(0, card),
            End::Back => self.cards.push(card),
        }
        self.refresh();
    }

    pub(crate) fn replace(&mut self, slot: usize, card: Card) -> Card {
        let old = std::mem::replace(&mut self.cards[slot], card);
        self.refresh();
        old
    }

    fn refresh(&mut self) {
        self.wilds = self.cards.iter().filter(|c| c.is_wild()).count() as u8;
        self.kind = classify(&self.cards);
    }
}

/// Classify cards as a run or a set. Runs win when both would fit.
#[must_use]
pub fn classify(cards: &[Card]) -> Option<MeldKind> {
    if is_valid_run(cards) {
        Some(MeldKind::Run)
    } else if is_valid_set(cards) {
        Some(MeldKind::Set)
    } else {
        None
    }
}

fn fits(cards: &[Card], kind: MeldKind) -> bool {
    match kind {
        MeldKind::Run => is_valid_run(cards),
        MeldKind::Set => is_valid_set(cards),
    }
}

/// Length, wild-count and wild-adjacency rules shared by runs and sets.
fn wild_layout_ok(cards: &[Card]) -> bool {
    if !(MIN_MELD..=MAX_MELD).contains(&cards.len()) {
        return false;
    }
    let wilds = cards.iter().filter(|c| c.is_wild()).count();
    if cards.len() < MAX_MELD && wilds > 1 {
        return false;
    }
    !cards.windows(2).any(|w| w[0].is_wild() && w[1].is_wild())
}

fn matches_value(rank: Rank, value: i16) -> bool {
    rank.0 as i16 == value || (rank == Rank::ACE && value == LOW_ACE)
}

/// Effective rank of the first card if `cards` form a run.
fn run_start(cards: &[Card]) -> Option<i16> {
    if !wild_layout_ok(cards) {
        return None;
    }

    let mut naturals = cards.iter().filter(|c| !c.is_wild());
    let suit = naturals.next()?.suit;
    if naturals.any(|c| c.suit != suit) {
        return None;
    }

    let (pos, anchor) = cards.iter().enumerate().find(|(_, c)| !c.is_wild())?;
    let pos = pos as i16;
    let len = cards.len() as i16;

    let high = anchor.rank.0 as i16 - pos;
    let low = (anchor.rank == Rank::ACE).then_some(LOW_ACE - pos);

    std::iter::once(high).chain(low).find(|&start| {
        start >= LOW_ACE
            && start + len - 1 <= Rank::ACE.0 as i16
            && cards
                .iter()
                .enumerate()
                .all(|(i, c)| c.is_wild() || matches_value(c.rank, start + i as i16))
    })
}

/// Check whether `cards`, in order, form a valid run.
#[must_use]
pub fn is_valid_run(cards: &[Card]) -> bool {
    run_start(cards).is_some()
}

/// Check whether `cards` form a valid set.
#[must_use]
pub fn is_valid_set(cards: &[Card]) -> bool {
    if !wild_layout_ok(cards) {
        return false;
    }
    let naturals: Vec<&Card> = cards.iter().filter(|c| !c.is_wild()).collect();
    let Some(first) = naturals.first() else {
        return false;
    };
    naturals.iter().all(|c| c.rank == first.rank)
        && naturals
            .iter()
            .enumerate()
            .all(|(i, a)| naturals[i + 1..].iter().all(|b| a.suit != b.suit))
}

/// Where `card` would join `meld`, if it can be laid off there.
#[must_use]
pub fn layoff_position(meld: &Meld, card: &Card) -> Option<End> {
    let kind = meld.kind()?;
    if meld.len() >= MAX_MELD {
        return None;
    }

    let mut extended = Vec::with_capacity(meld.len() + 1);
    extended.extend_from_slice(meld.cards());
    extended.push(*card);
    if fits(&extended, kind) {
        return Some(End::Back);
    }

    extended.pop();
    extended.insert(0, *card);
    fits(&extended, kind).then_some(End::Front)
}

/// Check whether `card` can be laid off on `meld`.
#[must_use]
pub fn layoff_possible(meld: &Meld, card: &Card) -> bool {
    layoff_position(meld, card).is_some()
}

/// Slot of a fixed wild card that `card` can stand in for.
#[must_use]
pub fn joker_swap_slot(meld: &Meld, card: &Card) -> Option<usize> {
    let kind = meld.kind()?;
    if card.is_wild() || meld.wild_count() == 0 {
        return None;
    }
    let mut candidate = meld.cards().to_vec();
    (0..candidate.len()).find(|&slot| {
        let current = meld.cards()[slot];
        if !(current.is_wild() && current.fixed) {
            return false;
        }
        candidate[slot] = *card;
        let ok = fits(&candidate, kind);
        candidate[slot] = current;
        ok
    })
}

/// Check whether `card` can replace one of the meld's fixed wild cards.
#[must_use]
pub fn joker_swap_possible(meld: &Meld, card: &Card) -> bool {
    joker_swap_slot(meld, card).is_some()
}

/// Put `card` in place of the wild card it stands for and return the freed
/// wild card, which is now visible to both players.
pub fn swap_joker(meld: &mut Meld, mut card: Card) -> Option<Card> {
    let slot = joker_swap_slot(meld, &card)?;
    card.fixed = true;
    let mut freed = meld.replace(slot, card);
    freed.fixed = false;
    freed.known = true;
    Some(freed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Suit::{Clubs, Diamonds, Hearts, Spades};

    fn c(suit: Suit, rank: u8) -> Card {
        Card::natural(suit, Rank(rank))
    }

    fn fixed(mut card: Card) -> Card {
        card.fixed = true;
        card
    }

    #[test]
    fn test_simple_run() {
        assert!(is_valid_run(&[c(Clubs, 5), c(Clubs, 6), c(Clubs, 7)]));
        assert!(!is_valid_run(&[c(Clubs, 5), c(Spades, 6), c(Clubs, 7)]));
        assert!(!is_valid_run(&[c(Clubs, 5), c(Clubs, 7), c(Clubs, 8)]));
        assert!(!is_valid_run(&[c(Clubs, 7), c(Clubs, 6), c(Clubs, 5)]));
    }

    #[test]
    fn test_run_length_bounds() {
        assert!(!is_valid_run(&[c(Clubs, 5), c(Clubs, 6)]));
        assert!(is_valid_run(&[c(Clubs, 5), c(Clubs, 6), c(Clubs, 7), c(Clubs, 8)]));
        assert!(!is_valid_run(&[
            c(Clubs, 5),
            c(Clubs, 6),
            c(Clubs, 7),
            c(Clubs, 8),
            c(Clubs, 9)
        ]));
    }

    #[test]
    fn test_run_with_wild() {
        let meld = Meld::from_cards(vec![Card::wild(0), c(Clubs, 6), c(Clubs, 7)]);
        assert_eq!(meld.kind(), Some(MeldKind::Run));
        assert_eq!(meld.suit(), Some(Clubs));
        assert_eq!(meld.wild_count(), 1);

        assert!(is_valid_run(&[c(Clubs, 5), Card::wild(0), c(Clubs, 7)]));
        assert!(!is_valid_run(&[c(Clubs, 5), Card::wild(0), c(Clubs, 8)]));
    }

    #[test]
    fn test_run_wild_limits() {
        assert!(!is_valid_run(&[Card::wild(0), Card::wild(1), c(Clubs, 6)]));
        assert!(!is_valid_run(&[c(Clubs, 5), Card::wild(0), Card::wild(1), c(Clubs, 8)]));
        assert!(is_valid_run(&[Card::wild(0), c(Clubs, 6), Card::wild(1), c(Clubs, 8)]));
    }

    #[test]
    fn test_ace_low_and_high() {
        assert!(is_valid_run(&[c(Hearts, 14), c(Hearts, 2), c(Hearts, 3)]));
        assert!(is_valid_run(&[c(Hearts, 12), c(Hearts, 13), c(Hearts, 14)]));
        assert!(!is_valid_run(&[c(Hearts, 13), c(Hearts, 14), c(Hearts, 2)]));
        assert!(is_valid_run(&[c(Hearts, 14), Card::wild(0), c(Hearts, 3)]));
    }

    #[test]
    fn test_wild_beyond_ace_rejected() {
        assert!(!is_valid_run(&[Card::wild(0), c(Hearts, 14), c(Hearts, 2)]));
        assert!(!is_valid_run(&[c(Hearts, 13), c(Hearts, 14), Card::wild(0)]));
        assert!(is_valid_run(&[c(Hearts, 14), c(Hearts, 2), c(Hearts, 3), Card::wild(0)]));
    }

    #[test]
    fn test_ace_value_not_mutated() {
        let cards = [c(Hearts, 14), c(Hearts, 2), c(Hearts, 3)];
        assert!(is_valid_run(&cards));
        assert_eq!(cards[0].rank, Rank::ACE);
    }

    #[test]
    fn test_sets() {
        assert!(is_valid_set(&[c(Clubs, 7), c(Spades, 7), c(Hearts, 7)]));
        assert!(is_valid_set(&[c(Clubs, 7), c(Spades, 7), c(Hearts, 7), c(Diamonds, 7)]));
        assert!(!is_valid_set(&[
            c(Clubs, 7),
            c(Spades, 7),
            c(Hearts, 7),
            c(Diamonds, 7),
            Card::wild(0)
        ]));
        assert!(!is_valid_set(&[c(Clubs, 7), c(Spades, 7), c(Hearts, 8)]));
        assert!(is_valid_set(&[c(Clubs, 7), Card::wild(0), c(Hearts, 7)]));
        assert!(!is_valid_set(&[c(Clubs, 7), Card::wild(0), Card::wild(1)]));
    }

    #[test]
    fn test_classification_cache() {
        let meld = Meld::from_cards(vec![c(Clubs, 7), c(Spades, 7), c(Hearts, 7)]);
        assert_eq!(meld.kind(), Some(MeldKind::Set));
        assert_eq!(meld.suit(), None);

        let bad = Meld::from_cards(vec![c(Clubs, 7), c(Spades, 8)]);
        assert!(!bad.is_valid());

        assert!(Meld::new().is_empty());
        assert!(!Meld::new().is_valid());
    }

    #[test]
    fn test_layoff_on_run() {
        let meld = Meld::from_cards(vec![c(Clubs, 5), c(Clubs, 6), c(Clubs, 7)]);

        assert_eq!(layoff_position(&meld, &c(Clubs, 8)), Some(End::Back));
        assert_eq!(layoff_position(&meld, &c(Clubs, 4)), Some(End::Front));
        assert_eq!(layoff_position(&meld, &Card::wild(0)), Some(End::Back));
        assert!(!layoff_possible(&meld, &c(Spades, 8)));
        assert!(!layoff_possible(&meld, &c(Clubs, 9)));
    }

    #[test]
    fn test_layoff_wild_on_bounded_run() {
        let high = Meld::from_cards(vec![c(Clubs, 12), c(Clubs, 13), c(Clubs, 14)]);
        assert_eq!(layoff_position(&high, &Card::wild(0)), Some(End::Front));

        let low = Meld::from_cards(vec![c(Clubs, 14), c(Clubs, 2), c(Clubs, 3)]);
        assert_eq!(layoff_position(&low, &Card::wild(0)), Some(End::Back));
    }

    #[test]
    fn test_layoff_respects_length_cap() {
        let full = Meld::from_cards(vec![c(Clubs, 5), c(Clubs, 6), c(Clubs, 7), c(Clubs, 8)]);
        assert!(!layoff_possible(&full, &c(Clubs, 9)));
        assert!(!layoff_possible(&full, &c(Clubs, 4)));
    }

    #[test]
    fn test_layoff_on_set() {
        let set = Meld::from_cards(vec![c(Clubs, 7), c(Spades, 7), c(Hearts, 7)]);
        assert_eq!(layoff_position(&set, &c(Diamonds, 7)), Some(End::Back));
        assert!(layoff_possible(&set, &Card::wild(0)));
        assert!(!layoff_possible(&set, &c(Diamonds, 8)));

        let with_wild = Meld::from_cards(vec![c(Clubs, 7), Card::wild(0), c(Hearts, 7)]);
        assert!(layoff_possible(&with_wild, &c(Spades, 7)));
    }

    #[test]
    fn test_second_wild_joins_set_at_front() {
        // Appending would put the two wild cards side by side.
        let set = Meld::from_cards(vec![c(Clubs, 7), c(Spades, 7), Card::wild(0)]);
        assert_eq!(layoff_position(&set, &Card::wild(1)), Some(End::Front));

        let mut meld = set.clone();
        meld.place(Card::wild(1), End::Front);
        assert_eq!(meld.kind(), Some(MeldKind::Set));
        assert_eq!(meld.wild_count(), 2);

        let split = Meld::from_cards(vec![c(Clubs, 7), Card::wild(0), c(Spades, 7)]);
        assert_eq!(layoff_position(&split, &Card::wild(1)), Some(End::Back));
    }

    #[test]
    fn test_swap_requires_fixed_wild() {
        let loose = Meld::from_cards(vec![c(Clubs, 5), Card::wild(0), c(Clubs, 7)]);
        assert!(!joker_swap_possible(&loose, &c(Clubs, 6)));

        let locked = Meld::from_cards(vec![fixed(c(Clubs, 5)), fixed(Card::wild(0)), fixed(c(Clubs, 7))]);
        assert_eq!(joker_swap_slot(&locked, &c(Clubs, 6)), Some(1));
        assert!(!joker_swap_possible(&locked, &c(Clubs, 8)));
        assert!(!joker_swap_possible(&locked, &c(Spades, 6)));
        assert!(!joker_swap_possible(&locked, &Card::wild(1)));
    }

    #[test]
    fn test_swap_joker_returns_freed_wild() {
        let mut meld = Meld::from_cards(vec![fixed(c(Clubs, 7)), fixed(c(Spades, 7)), fixed(Card::wild(1))]);

        let freed = swap_joker(&mut meld, c(Hearts, 7)).unwrap();

        assert!(freed.is_wild());
        assert_eq!(freed.id, Card::wild(1).id);
        assert!(!freed.fixed);
        assert!(freed.known);
        assert_eq!(meld.wild_count(), 0);
        assert_eq!(meld.kind(), Some(MeldKind::Set));
        assert!(meld.cards()[2].fixed);
    }

    #[test]
    fn test_fix_cards() {
        let mut meld = Meld::from_cards(vec![c(Clubs, 5), c(Clubs, 6), c(Clubs, 7)]);
        meld.fix_cards();
        assert!(meld.cards().iter().all(|c| c.fixed));
    }
}
