//! Authoritative game state.
//!
//! Deck and pile are `im` vectors so the many clones made while searching
//! share structure. The top of both stacks is the back of the vector.
//!
//! The meld list always ends with an empty placeholder; every meld before
//! it is either empty or a valid run/set.

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::card::{full_deck, Card, CardId};
use super::config::GameConfig;
use super::error::{EngineResult, GameError};
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::rules::meld::{Meld, MAX_MELD, MIN_MELD};

/// Turn phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Draw,
    Meld,
    LayOff,
    Discard,
    Over,
}

/// Outcome of a finished round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// The player went out.
    Winner(PlayerId),
    /// Forced draw: the deck could not be replenished any more.
    Draw,
}

impl GameResult {
    /// Terminal utility for `player`: 1 for a win, 0 for a loss, 0.5 for a draw.
    #[must_use]
    pub fn utility(&self, player: PlayerId) -> f64 {
        match self {
            GameResult::Winner(p) if *p == player => 1.0,
            GameResult::Winner(_) => 0.0,
            GameResult::Draw => 0.5,
        }
    }
}

/// An explicit table layout, used to start a round from a known position.
///
/// Cards not mentioned go to the deck, shuffled. Meld cards are treated as
/// laid in earlier turns and become fixed.
#[derive(Clone, Debug)]
pub struct TableSetup {
    pub hands: PlayerMap<Vec<Card>>,
    pub pile: Vec<Card>,
    pub melds: Vec<Vec<Card>>,
    pub phase: Phase,
    pub active: PlayerId,
}

/// Complete game state for one round.
#[derive(Clone, Debug)]
pub struct GameState {
    pub(crate) config: GameConfig,
    pub(crate) deck: Vector<Card>,
    pub(crate) pile: Vector<Card>,
    pub(crate) hands: PlayerMap<Vec<Card>>,
    pub(crate) melds: Vec<Meld>,
    pub(crate) phase: Phase,
    pub(crate) active: PlayerId,
    pub(crate) scores: PlayerMap<u32>,
    pub(crate) reshuffles: u32,
    pub(crate) turn: u32,
    pub(crate) result: Option<GameResult>,
    pub(crate) rng: GameRng,
}

impl GameState {
    /// Shuffle a fresh deck and deal a round. Player 0 draws first.
    #[must_use]
    pub fn deal(config: &GameConfig) -> Self {
        Self::deal_with_scores(config, PlayerMap::with_value(0))
    }

    /// Deal a round carrying over accumulated scores.
    #[must_use]
    pub fn deal_with_scores(config: &GameConfig, scores: PlayerMap<u32>) -> Self {
        let mut rng = GameRng::new(config.seed);
        let mut cards = full_deck(config.wild_cards);
        rng.shuffle(&mut cards);

        let mut deck: Vector<Card> = cards.into_iter().collect();
        let mut hands: PlayerMap<Vec<Card>> = PlayerMap::new(|_| Vec::with_capacity(config.hand_size + 1));
        for _ in 0..config.hand_size {
            for player in PlayerId::all() {
                if let Some(card) = deck.pop_back() {
                    hands[player].push(card);
                }
            }
        }
        let pile: Vector<Card> = deck.pop_back().into_iter().collect();

        info!(seed = config.seed, wild_cards = config.wild_cards, "dealt new round");

        Self {
            config: config.clone(),
            deck,
            pile,
            hands,
            melds: vec![Meld::new()],
            phase: Phase::Draw,
            active: PlayerId::new(0),
            scores,
            reshuffles: 0,
            turn: 1,
            result: None,
            rng,
        }
    }

    /// Start from an explicit layout.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` if a card appears twice, a card does not belong
    /// to the configured deck, or a meld is not a valid run/set.
    pub fn from_setup(config: &GameConfig, setup: TableSetup) -> EngineResult<Self> {
        let mut rng = GameRng::new(config.seed);

        let mut melds: Vec<Meld> = setup
            .melds
            .into_iter()
            .map(|cards| {
                let mut meld = Meld::from_cards(cards);
                meld.fix_cards();
                meld
            })
            .collect();
        melds.push(Meld::new());

        let mut used: FxHashSet<CardId> = FxHashSet::default();
        let placed = setup
            .hands
            .iter()
            .flat_map(|(_, h)| h.iter())
            .chain(setup.pile.iter())
            .chain(melds.iter().flat_map(|m| m.cards().iter()));
        for card in placed {
            if !used.insert(card.id) {
                return Err(GameError::invariant(format!("{card} placed twice in setup")));
            }
        }

        let all = full_deck(config.wild_cards);
        if let Some(stray) = used.iter().find(|id| !all.iter().any(|c| c.id == **id)) {
            return Err(GameError::invariant(format!("{stray} is not in the configured deck")));
        }
        let mut rest: Vec<Card> = all.into_iter().filter(|c| !used.contains(&c.id)).collect();
        rng.shuffle(&mut rest);

        let state = Self {
            config: config.clone(),
            deck: rest.into_iter().collect(),
            pile: setup.pile.into_iter().collect(),
            hands: setup.hands,
            melds,
            phase: setup.phase,
            active: setup.active,
            scores: PlayerMap::with_value(0),
            reshuffles: 0,
            turn: 1,
            result: None,
            rng,
        };
        state.check_invariants()?;
        Ok(state)
    }

    // === Read-only accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.active
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[Card] {
        &self.hands[player]
    }

    /// All melds including the trailing placeholder.
    #[must_use]
    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }

    /// The placeholder slot under construction.
    #[must_use]
    pub fn placeholder(&self) -> Option<&Meld> {
        self.melds.last()
    }

    #[must_use]
    pub fn pile(&self) -> &Vector<Card> {
        &self.pile
    }

    #[must_use]
    pub fn pile_top(&self) -> Option<&Card> {
        self.pile.back()
    }

    #[must_use]
    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    #[must_use]
    pub fn scores(&self) -> &PlayerMap<u32> {
        &self.scores
    }

    #[must_use]
    pub fn reshuffles(&self) -> u32 {
        self.reshuffles
    }

    /// Turn counter, starting at 1.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    /// Sort a player's hand by rank for display.
    pub fn sort_hand_by_rank(&mut self, player: PlayerId) {
        super::card::sort_by_rank(&mut self.hands[player]);
    }

    /// Sort a player's hand by suit for display.
    pub fn sort_hand_by_suit(&mut self, player: PlayerId) {
        super::card::sort_by_suit(&mut self.hands[player]);
    }

    /// Cards across deck, pile, hands and melds.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.deck.len()
            + self.pile.len()
            + self.hands.iter().map(|(_, h)| h.len()).sum::<usize>()
            + self.melds.iter().map(Meld::len).sum::<usize>()
    }

    /// Verify card conservation, card identity and meld shape.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` describing the first problem found.
    pub fn check_invariants(&self) -> EngineResult<()> {
        let expected = self.config.total_cards();
        let count = self.card_count();
        if count != expected {
            return Err(GameError::invariant(format!(
                "card count {count} does not match deck size {expected}"
            )));
        }

        let mut seen: FxHashSet<CardId> = FxHashSet::default();
        let every = self
            .deck
            .iter()
            .chain(self.pile.iter())
            .chain(self.hands.iter().flat_map(|(_, h)| h.iter()))
            .chain(self.melds.iter().flat_map(|m| m.cards().iter()));
        for card in every {
            if !seen.insert(card.id) {
                return Err(GameError::invariant(format!("{card} ({}) held twice", card.id)));
            }
        }

        let Some((placeholder, table)) = self.melds.split_last() else {
            return Err(GameError::invariant("meld list lost its placeholder"));
        };
        if !placeholder.is_empty() {
            return Err(GameError::invariant("placeholder meld is not empty"));
        }
        for (index, meld) in table.iter().enumerate() {
            if meld.is_empty() {
                continue;
            }
            if !(MIN_MELD..=MAX_MELD).contains(&meld.len()) || !meld.is_valid() {
                return Err(GameError::invariant(format!("meld {index} is malformed")));
            }
        }
        Ok(())
    }
}
