//! Turn state machine.
//!
//! `get_moves` enumerates what the active player may do, `do_move` applies
//! one move and `progress_state` advances the phase. The search drives the
//! game through the `RulesEngine` trait so it never interprets Rummy
//! concepts directly.

use std::fmt::Debug;

use tracing::{debug, info};

use crate::core::card::score_of;
use crate::core::{
    Card, CardId, EngineResult, GameError, GameResult, GameRng, GameState, Move, Phase, PlayerId,
};
use crate::determinize::clone_and_randomize;

use super::finder::{find_layoffs, find_melds, find_swaps};
use super::meld::{classify, layoff_position, swap_joker, Meld};

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_moves`: Return empty once the game is over
/// - `apply_move`: Must be deterministic given the state's own RNG
/// - `result`: Return None while the game continues
pub trait RulesEngine {
    type State: Clone;
    type Move: Clone + PartialEq + Debug;

    /// Player whose turn it is.
    fn active_player(&self, state: &Self::State) -> PlayerId;

    /// Every legal move for the active player.
    fn legal_moves(&self, state: &Self::State) -> Vec<Self::Move>;

    /// Apply a move.
    ///
    /// # Errors
    ///
    /// `IllegalMove` when the move does not fit the state, `InvariantViolation`
    /// when the state turns out to be inconsistent.
    fn apply_move(&self, state: &mut Self::State, mv: &Self::Move) -> EngineResult<()>;

    /// Terminal utility for `player`, `None` while the game continues.
    fn result(&self, state: &Self::State, player: PlayerId) -> Option<f64>;

    /// Sample a complete state consistent with what `observer` can see.
    fn determinize(&self, state: &Self::State, observer: PlayerId, rng: &mut GameRng) -> Self::State;
}

/// The Rummy rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct RummyRules;

impl RulesEngine for RummyRules {
    type State = GameState;
    type Move = Move;

    fn active_player(&self, state: &GameState) -> PlayerId {
        state.active_player()
    }

    fn legal_moves(&self, state: &GameState) -> Vec<Move> {
        get_moves(state)
    }

    fn apply_move(&self, state: &mut GameState, mv: &Move) -> EngineResult<()> {
        do_move(state, mv)
    }

    fn result(&self, state: &GameState, player: PlayerId) -> Option<f64> {
        get_result(state, player)
    }

    fn determinize(&self, state: &GameState, observer: PlayerId, rng: &mut GameRng) -> GameState {
        clone_and_randomize(state, observer, rng)
    }
}

/// Legal moves for the active player in the current phase.
#[must_use]
pub fn get_moves(state: &GameState) -> Vec<Move> {
    if state.phase == Phase::Over || state.reshuffles > state.config.max_reshuffles {
        return Vec::new();
    }
    let hand = state.hand(state.active);

    match state.phase {
        Phase::Draw => {
            let mut moves = Vec::with_capacity(2);
            if !state.deck.is_empty() {
                moves.push(Move::DrawDeck);
            }
            if !state.pile.is_empty() {
                moves.push(Move::DrawPile);
            }
            moves
        }
        Phase::Meld => find_melds(hand)
            .into_iter()
            .map(Move::Meld)
            .chain(std::iter::once(Move::Pass))
            .collect(),
        Phase::LayOff => find_layoffs(hand, &state.melds)
            .into_iter()
            .map(|(meld, card)| Move::LayOff { meld, card })
            .chain(
                find_swaps(hand, &state.melds)
                    .into_iter()
                    .map(|(meld, card)| Move::SwapWild { meld, card }),
            )
            .chain(std::iter::once(Move::Pass))
            .collect(),
        Phase::Discard => hand.iter().map(|c| Move::Discard(c.id)).collect(),
        Phase::Over => Vec::new(),
    }
}

/// Apply `mv` for the active player.
///
/// The move is checked against the current phase and hand before anything is
/// mutated, so a rejected move leaves the state untouched. Draws, discards
/// and passes advance the phase; melds, lay-offs and swaps do not.
///
/// # Errors
///
/// `IllegalMove` if the move does not fit the state, `InvariantViolation` if
/// the state is inconsistent.
pub fn do_move(state: &mut GameState, mv: &Move) -> EngineResult<()> {
    let illegal = || GameError::IllegalMove { mv: mv.clone() };
    let player = state.active;
    debug!(%player, %mv, phase = ?state.phase, "applying move");

    match (state.phase, mv) {
        (Phase::Draw, Move::DrawDeck) => {
            let mut card = state.deck.pop_back().ok_or_else(illegal)?;
            card.reset_flags();
            state.hands[player].push(card);
        }
        (Phase::Draw, Move::DrawPile) => {
            let mut card = state.pile.pop_back().ok_or_else(illegal)?;
            card.fixed = false;
            card.known = true;
            state.hands[player].push(card);
        }
        (Phase::Meld, Move::Meld(ids)) => {
            let cards = hand_cards(state.hand(player), ids).ok_or_else(illegal)?;
            if classify(&cards).is_none() {
                return Err(illegal());
            }
            state.hands[player].retain(|c| !ids.contains(&c.id));
            let slot = state
                .melds
                .last_mut()
                .ok_or_else(|| GameError::invariant("meld list lost its placeholder"))?;
            *slot = Meld::from_cards(cards);
            state.melds.push(Meld::new());
        }
        (Phase::LayOff, Move::LayOff { meld, card }) => {
            let pos = hand_position(state.hand(player), *card).ok_or_else(illegal)?;
            let target = table_meld(state, *meld).ok_or_else(illegal)?;
            let end = layoff_position(target, &state.hands[player][pos]).ok_or_else(illegal)?;
            let card = state.hands[player].remove(pos);
            state.melds[*meld].place(card, end);
        }
        (Phase::LayOff, Move::SwapWild { meld, card }) => {
            let pos = hand_position(state.hand(player), *card).ok_or_else(illegal)?;
            table_meld(state, *meld).ok_or_else(illegal)?;
            let natural = state.hands[player][pos];
            let freed = swap_joker(&mut state.melds[*meld], natural).ok_or_else(illegal)?;
            state.hands[player][pos] = freed;
        }
        (Phase::Discard, Move::Discard(card)) => {
            let pos = hand_position(state.hand(player), *card).ok_or_else(illegal)?;
            let mut card = state.hands[player].remove(pos);
            card.fixed = false;
            state.pile.push_back(card);
        }
        (Phase::Meld | Phase::LayOff, Move::Pass) => {}
        _ => return Err(illegal()),
    }

    if advances_phase(mv) {
        progress_state(state)?;
    }
    Ok(())
}

fn advances_phase(mv: &Move) -> bool {
    matches!(mv, Move::DrawDeck | Move::DrawPile | Move::Discard(_) | Move::Pass)
}

fn hand_position(hand: &[Card], id: CardId) -> Option<usize> {
    hand.iter().position(|c| c.id == id)
}

/// Cards for a meld move, in move order. `None` if any id is missing from
/// the hand or repeated.
fn hand_cards(hand: &[Card], ids: &[CardId]) -> Option<Vec<Card>> {
    let mut cards = Vec::with_capacity(ids.len());
    for (i, id) in ids.iter().enumerate() {
        if ids[..i].contains(id) {
            return None;
        }
        cards.push(*hand.iter().find(|c| c.id == *id)?);
    }
    Some(cards)
}

/// A non-empty meld laid in an earlier move. The placeholder never qualifies.
fn table_meld(state: &GameState, index: usize) -> Option<&Meld> {
    let (_, table) = state.melds.split_last()?;
    table.get(index).filter(|m| !m.is_empty())
}

/// Advance to the next phase.
///
/// Finishing the lay-off phase with an empty hand, or discarding the last
/// card, ends the round with the active player as winner. Finishing the
/// discard phase otherwise hands the turn to the opponent. A deck emptied
/// during a turn is refilled from the pile when the next draw phase starts,
/// so the player who took the last card still finishes their turn.
///
/// # Errors
///
/// `InvariantViolation` if called on a finished round.
pub fn progress_state(state: &mut GameState) -> EngineResult<()> {
    match state.phase {
        Phase::Draw => state.phase = Phase::Meld,
        Phase::Meld => state.phase = Phase::LayOff,
        Phase::LayOff => {
            let player = state.active;
            if state.hands[player].is_empty() {
                end_turn(state);
                declare_winner(state, player);
            } else {
                state.phase = Phase::Discard;
            }
        }
        Phase::Discard => {
            let player = state.active;
            end_turn(state);
            if state.hands[player].is_empty() {
                declare_winner(state, player);
            } else if state.turn >= state.config.max_turns {
                declare_draw(state, "turn limit reached");
            } else {
                state.active = state.active.opponent();
                state.turn += 1;
                state.phase = Phase::Draw;
            }
        }
        Phase::Over => return Err(GameError::invariant("progress requested on a finished round")),
    }

    if state.phase == Phase::Draw && state.deck.is_empty() {
        replenish_deck(state);
    }
    Ok(())
}

/// Lock in everything laid this turn.
fn end_turn(state: &mut GameState) {
    for meld in &mut state.melds {
        meld.fix_cards();
    }
}

fn declare_winner(state: &mut GameState, winner: PlayerId) {
    let gained = score_of(&state.hands[winner.opponent()]);
    state.scores[winner] += gained;
    state.phase = Phase::Over;
    state.result = Some(GameResult::Winner(winner));
    info!(%winner, gained, turn = state.turn, "round over");
}

fn declare_draw(state: &mut GameState, reason: &str) {
    state.phase = Phase::Over;
    state.result = Some(GameResult::Draw);
    info!(reason, turn = state.turn, "round drawn");
}

/// Move all pile cards but the top one back into the deck and shuffle.
///
/// Each refill counts towards the reshuffle cap; passing the cap, or having
/// nothing under the pile's top card, draws the round.
fn replenish_deck(state: &mut GameState) {
    if state.pile.len() <= 1 {
        declare_draw(state, "deck exhausted");
        return;
    }
    state.reshuffles += 1;
    if state.reshuffles > state.config.max_reshuffles {
        declare_draw(state, "reshuffle limit reached");
        return;
    }

    let top = state.pile.split_off(state.pile.len() - 1);
    let mut cards: Vec<Card> = std::mem::replace(&mut state.pile, top).into_iter().collect();
    for card in &mut cards {
        card.reset_flags();
    }
    state.rng.shuffle(&mut cards);
    state.deck = cards.into_iter().collect();
    debug!(reshuffles = state.reshuffles, deck = state.deck.len(), "pile reshuffled into deck");
}

/// Terminal utility for `player`: 1 win, 0 loss, 0.5 draw. `None` while the
/// round continues.
#[must_use]
pub fn get_result(state: &GameState, player: PlayerId) -> Option<f64> {
    state.result.map(|r| r.utility(player))
}
