//! Rule engine integration tests.

mod common;

use common::{card, init_test_logging, proptest_config, table};
use proptest::prelude::*;
use rummy_ismcts::core::Suit::{Clubs, Diamonds, Hearts, Spades};
use rummy_ismcts::core::{Card, GameConfig, GameResult, GameRng, GameState, Move, Phase, PlayerId};
use rummy_ismcts::rules::{
    do_move, find_melds, get_moves, get_result, is_valid_run, is_valid_set, Meld, MeldKind,
};

// =============================================================================
// Validation Examples
// =============================================================================

#[test]
fn test_run_examples() {
    assert!(is_valid_run(&[card(Clubs, 5), card(Clubs, 6), card(Clubs, 7)]));
    assert!(!is_valid_run(&[card(Clubs, 5), card(Spades, 6), card(Clubs, 7)]));

    let wild_run = Meld::from_cards(vec![Card::wild(0), card(Clubs, 6), card(Clubs, 7)]);
    assert_eq!(wild_run.kind(), Some(MeldKind::Run));
    assert_eq!(wild_run.suit(), Some(Clubs));

    assert!(!is_valid_run(&[Card::wild(0), Card::wild(1), card(Clubs, 6)]));
}

#[test]
fn test_set_examples() {
    let three = [card(Clubs, 7), card(Spades, 7), card(Hearts, 7)];
    let four = [card(Clubs, 7), card(Spades, 7), card(Hearts, 7), card(Diamonds, 7)];
    assert!(is_valid_set(&three));
    assert!(is_valid_set(&four));

    let mut five = four.to_vec();
    five.push(Card::wild(0));
    assert!(!is_valid_set(&five));
}

// =============================================================================
// Turn Flow
// =============================================================================

#[test]
fn test_full_turn_cycle() {
    init_test_logging();
    let mut state = GameState::deal(&GameConfig::default());
    let p0 = PlayerId::new(0);

    do_move(&mut state, &Move::DrawDeck).unwrap();
    assert_eq!(state.phase(), Phase::Meld);
    assert_eq!(get_moves(&state).last(), Some(&Move::Pass));

    do_move(&mut state, &Move::Pass).unwrap();
    assert_eq!(state.phase(), Phase::LayOff);

    do_move(&mut state, &Move::Pass).unwrap();
    assert_eq!(state.phase(), Phase::Discard);
    let discards = get_moves(&state);
    assert_eq!(discards.len(), state.hand(p0).len());
    assert!(discards.iter().all(|m| matches!(m, Move::Discard(_))));

    do_move(&mut state, &discards[0]).unwrap();
    assert_eq!(state.phase(), Phase::Draw);
    assert_eq!(state.active_player(), PlayerId::new(1));
    assert_eq!(state.hand(p0).len(), 10);
    assert!(state.check_invariants().is_ok());
}

#[test]
fn test_several_melds_in_one_turn() {
    let run = vec![card(Clubs, 5), card(Clubs, 6), card(Clubs, 7)];
    let set = vec![card(Clubs, 9), card(Spades, 9), card(Hearts, 9)];
    let mut hand = run.clone();
    hand.extend(set.iter().copied());
    hand.push(card(Diamonds, 13));
    let mut state = table(hand, vec![card(Spades, 2)], vec![card(Diamonds, 4)], vec![], Phase::Meld);

    let ids = |cards: &[Card]| cards.iter().map(|c| c.id).collect::<Vec<_>>();
    do_move(&mut state, &Move::meld(&ids(&run))).unwrap();
    assert!(get_moves(&state).contains(&Move::meld(&ids(&set))));
    do_move(&mut state, &Move::meld(&ids(&set))).unwrap();

    assert_eq!(state.melds().len(), 3);
    assert_eq!(state.melds()[1].kind(), Some(MeldKind::Set));
    assert_eq!(state.phase(), Phase::Meld);
    assert_eq!(state.hand(PlayerId::new(0)).len(), 1);
}

#[test]
fn test_meld_candidates_come_from_hand() {
    let state = GameState::deal(&GameConfig::default().with_seed(99));
    let hand = state.hand(PlayerId::new(0));
    for meld in find_melds(hand) {
        assert!(meld.iter().all(|id| hand.iter().any(|c| c.id == *id)));
    }
}

#[test]
fn test_swapped_wild_can_be_laid_off_again() {
    let hand = vec![card(Hearts, 9), card(Spades, 2)];
    let melds = vec![
        vec![card(Clubs, 9), card(Spades, 9), Card::wild(0)],
        vec![card(Diamonds, 5), card(Diamonds, 6), card(Diamonds, 7)],
    ];
    let mut state = table(hand.clone(), vec![card(Clubs, 3)], vec![card(Clubs, 4)], melds, Phase::LayOff);

    do_move(&mut state, &Move::SwapWild { meld: 0, card: hand[0].id }).unwrap();
    let wild = Card::wild(0).id;
    assert!(get_moves(&state).contains(&Move::LayOff { meld: 1, card: wild }));

    do_move(&mut state, &Move::LayOff { meld: 1, card: wild }).unwrap();
    assert_eq!(state.melds()[1].len(), 4);
    // Not fixed until the turn ends, so it cannot be swapped straight back.
    assert!(!state.melds()[1].cards().iter().any(|c| c.is_wild() && c.fixed));
    assert!(state.check_invariants().is_ok());
}

#[test]
fn test_second_wild_laid_off_on_set() {
    let hand = vec![Card::wild(1), card(Spades, 2)];
    let melds = vec![vec![card(Clubs, 7), card(Spades, 7), Card::wild(0)]];
    let mut state = table(hand, vec![card(Clubs, 3)], vec![card(Diamonds, 4)], melds, Phase::LayOff);

    let mv = Move::LayOff { meld: 0, card: Card::wild(1).id };
    assert!(get_moves(&state).contains(&mv));
    do_move(&mut state, &mv).unwrap();

    let meld = &state.melds()[0];
    assert_eq!(meld.kind(), Some(MeldKind::Set));
    assert_eq!(meld.cards()[0].id, Card::wild(1).id);
    assert!(state.check_invariants().is_ok());
}

#[test]
fn test_forced_draw_utility() {
    let config = GameConfig::default()
        .with_wild_cards(false)
        .with_hand_size(25)
        .with_max_reshuffles(0);
    let mut state = GameState::deal(&config);

    // The last deck card is drawn; refilling at the next draw passes the cap.
    do_move(&mut state, &Move::DrawDeck).unwrap();
    assert!(state.result().is_none());
    let card = state.hand(PlayerId::new(0))[0].id;
    do_move(&mut state, &Move::Pass).unwrap();
    do_move(&mut state, &Move::Pass).unwrap();
    do_move(&mut state, &Move::Discard(card)).unwrap();

    assert_eq!(state.result(), Some(GameResult::Draw));
    assert_eq!(get_result(&state, PlayerId::new(0)), Some(0.5));
    assert_eq!(get_result(&state, PlayerId::new(1)), Some(0.5));
    assert!(get_moves(&state).is_empty());
}

#[test]
fn test_result_is_none_while_playing() {
    let state = GameState::deal(&GameConfig::default());
    assert_eq!(get_result(&state, PlayerId::new(0)), None);
}

// =============================================================================
// Properties
// =============================================================================

/// Drive a round with uniformly random legal moves, checking `each` after
/// every move. Returns the number of moves made.
fn random_round(
    config: &GameConfig,
    rng_seed: u64,
    limit: usize,
    mut each: impl FnMut(&GameState),
) -> Result<usize, TestCaseError> {
    let mut state = GameState::deal(config);
    let mut rng = GameRng::new(rng_seed);
    let mut played = 0;

    loop {
        let moves = get_moves(&state);
        let Some(mv) = rng.choose(&moves).cloned() else {
            break;
        };
        do_move(&mut state, &mv).map_err(|e| TestCaseError::fail(e.to_string()))?;
        each(&state);
        played += 1;
        prop_assert!(played <= limit, "round still running after {} moves", limit);
    }

    prop_assert_eq!(state.phase(), Phase::Over);
    prop_assert!(state.result().is_some());
    Ok(played)
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property: deck + pile + hands + melds always holds the whole deck.
    #[test]
    fn prop_cards_are_conserved(seed in any::<u64>(), wild_cards in any::<bool>()) {
        let config = GameConfig::default().with_seed(seed).with_wild_cards(wild_cards);
        let total = config.total_cards();
        let mut counts = Vec::new();

        random_round(&config, seed ^ 0x5eed, 20_000, |state| {
            counts.push(state.card_count());
        })?;

        prop_assert!(counts.iter().all(|&n| n == total));
    }

    /// Property: every meld on the table is a valid run or set after any move.
    #[test]
    fn prop_table_melds_stay_valid(seed in any::<u64>()) {
        let config = GameConfig::default().with_seed(seed);
        let mut bad = 0;

        random_round(&config, seed.rotate_left(7), 20_000, |state| {
            let (placeholder, fixed) = state.melds().split_last().unwrap();
            if !placeholder.is_empty() {
                bad += 1;
            }
            for meld in fixed.iter().filter(|m| !m.is_empty()) {
                if !(is_valid_run(meld.cards()) || is_valid_set(meld.cards())) {
                    bad += 1;
                }
            }
            if state.check_invariants().is_err() {
                bad += 1;
            }
        })?;

        prop_assert_eq!(bad, 0);
    }

    /// Property: random play always ends, with a winner or a forced draw.
    #[test]
    fn prop_random_play_terminates(
        seed in any::<u64>(),
        max_reshuffles in 0u32..4,
        max_turns in 1u32..300,
    ) {
        let config = GameConfig::default()
            .with_seed(seed)
            .with_max_reshuffles(max_reshuffles)
            .with_max_turns(max_turns);

        // A turn is at most a draw, a few melds, a lay-off per card, two
        // swaps, two passes and a discard.
        let bound = max_turns as usize * 40;
        random_round(&config, seed.wrapping_mul(31), bound, |_| {})?;
    }
}
