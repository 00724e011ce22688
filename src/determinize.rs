//! Determinization: sampling a complete state from one player's view.
//!
//! The observer sees their own hand, the melds and the pile, and remembers
//! every card the opponent took face-up. Everything else (the rest of the
//! opponent's hand and the deck) is one pool of unseen cards.

use tracing::debug;

use crate::core::{Card, GameRng, GameState, PlayerId};

/// Clone `state` with the cards `observer` cannot see redistributed at
/// random.
///
/// The opponent keeps every card flagged `known` and gets enough unseen
/// cards to match their real hand size; the remainder becomes the deck.
/// The clone carries a fork of `rng`, so later reshuffles inside it differ
/// between samples.
#[must_use]
pub fn clone_and_randomize(state: &GameState, observer: PlayerId, rng: &mut GameRng) -> GameState {
    let mut clone = state.clone();
    let opponent = observer.opponent();

    let (mut hand, hidden): (Vec<Card>, Vec<Card>) =
        clone.hands[opponent].drain(..).partition(|c| c.known);
    let hidden_count = hidden.len();

    let mut pool: Vec<Card> = hidden.into_iter().chain(clone.deck.iter().copied()).collect();
    for card in &mut pool {
        card.reset_flags();
    }
    rng.shuffle(&mut pool);

    let rest = pool.split_off(hidden_count);
    hand.extend(pool);
    clone.hands[opponent] = hand;
    clone.deck = rest.into_iter().collect();
    clone.rng = rng.fork();

    debug!(
        %observer,
        hidden = hidden_count,
        known = clone.hands[opponent].len() - hidden_count,
        deck = clone.deck.len(),
        "determinized state"
    );
    clone
}
