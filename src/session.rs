//! Foreground control loop.
//!
//! `RummySession` is what a presentation layer talks to: it owns the live
//! game, validates the human player's moves, and once per tick collects the
//! computer's move from the background search and launches the next one.

use tracing::{info, warn};

use crate::core::{
    Card, EngineResult, GameConfig, GameError, GameResult, GameState, Move, Phase, PlayerId,
    PlayerMap,
};
use crate::mcts::SearchConfig;
use crate::rules::{do_move, get_moves, Meld};
use crate::scheduler::SearchScheduler;

/// One human against one computer opponent.
pub struct RummySession {
    config: GameConfig,
    state: GameState,
    computer: PlayerId,
    scheduler: SearchScheduler,
    rounds: u64,
}

impl RummySession {
    /// Deal the first round.
    #[must_use]
    pub fn new(config: GameConfig, search: SearchConfig, computer: PlayerId) -> Self {
        let state = GameState::deal(&config);
        Self {
            config,
            state,
            computer,
            scheduler: SearchScheduler::new(search),
            rounds: 0,
        }
    }

    /// Apply a move chosen by the human player.
    ///
    /// # Errors
    ///
    /// `IllegalMove` if it is not the human's turn or the move is not in
    /// `legal_moves()`; the game is left untouched. `InvariantViolation` if
    /// the move leaves the game inconsistent.
    pub fn submit_move(&mut self, mv: &Move) -> EngineResult<()> {
        if self.state.active_player() == self.computer || !get_moves(&self.state).contains(mv) {
            warn!(%mv, phase = ?self.state.phase(), "rejected move");
            return Err(GameError::IllegalMove { mv: mv.clone() });
        }
        self.apply(mv)
    }

    /// Run one step of the control loop: apply the computer's move if its
    /// search has finished, then start a new search if the computer is to
    /// move. Returns the computer move applied this tick, if any.
    ///
    /// # Errors
    ///
    /// Search failures and invariant violations.
    pub fn tick(&mut self) -> EngineResult<Option<Move>> {
        self.scheduler.poll()?;

        let mut applied = None;
        if let Some(mv) = self.scheduler.take_result() {
            if self.state.active_player() == self.computer && get_moves(&self.state).contains(&mv) {
                self.apply(&mv)?;
                applied = Some(mv);
            } else {
                warn!(%mv, "search returned a move that no longer applies");
            }
        }

        self.scheduler.maybe_start(&self.state, self.computer)?;
        Ok(applied)
    }

    fn apply(&mut self, mv: &Move) -> EngineResult<()> {
        do_move(&mut self.state, mv)?;
        self.state.check_invariants()
    }

    /// Deal a new round. Scores carry over; any search still running for
    /// the old round is abandoned.
    pub fn restart(&mut self) {
        self.scheduler.abandon();
        self.rounds += 1;
        let config = self
            .config
            .clone()
            .with_seed(self.config.seed.wrapping_add(self.rounds));
        let scores = self.state.scores().clone();
        self.state = GameState::deal_with_scores(&config, scores);
        info!(round = self.rounds, "round restarted");
    }

    /// Include or leave out the wild cards. Takes effect at the next restart.
    pub fn set_wild_cards(&mut self, enabled: bool) {
        self.config.wild_cards = enabled;
    }

    // === Read-only accessors ===

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn computer(&self) -> PlayerId {
        self.computer
    }

    #[must_use]
    pub fn human(&self) -> PlayerId {
        self.computer.opponent()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.state.active_player()
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[Card] {
        self.state.hand(player)
    }

    #[must_use]
    pub fn melds(&self) -> &[Meld] {
        self.state.melds()
    }

    #[must_use]
    pub fn pile_top(&self) -> Option<&Card> {
        self.state.pile_top()
    }

    #[must_use]
    pub fn scores(&self) -> &PlayerMap<u32> {
        self.state.scores()
    }

    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.state.result()
    }

    /// Moves the human may submit right now.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.state.active_player() == self.computer {
            Vec::new()
        } else {
            get_moves(&self.state)
        }
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.scheduler.is_searching()
    }

    /// Sort the human's hand by rank.
    pub fn sort_hand_by_rank(&mut self) {
        let human = self.human();
        self.state.sort_hand_by_rank(human);
    }

    /// Sort the human's hand by suit.
    pub fn sort_hand_by_suit(&mut self) {
        let human = self.human();
        self.state.sort_hand_by_suit(human);
    }
}
