//! Candidate enumeration: new melds from a hand, lay-offs and wild swaps
//! against the table.

use smallvec::SmallVec;

use crate::core::{Card, CardId, MeldCards, Rank, Suit};

use super::meld::{
    is_valid_run, is_valid_set, joker_swap_possible, layoff_possible, Meld, MAX_MELD, MIN_MELD,
};

/// Every meld that can be put down from `hand`, as card ids in table order.
///
/// Runs come from each suit's rank-sorted naturals (the ace counts both low
/// and high): consecutive stretches of three or four, a three extended by
/// the hand's wild card at either end, and stretches with one missing rank
/// bridged by the wild card. Sets are every three- and four-card combination
/// of equal-rank naturals, the threes optionally joined by the wild card.
#[must_use]
pub fn find_melds(hand: &[Card]) -> Vec<MeldCards> {
    let wild = hand.iter().find(|c| c.is_wild()).copied();
    let mut found = Vec::new();

    for suit in Suit::ALL {
        find_runs(hand, suit, wild, &mut found);
    }
    for rank in Rank::naturals() {
        find_sets(hand, rank, wild, &mut found);
    }

    found
}

fn push_run(cards: &[Card], out: &mut Vec<MeldCards>) {
    if is_valid_run(cards) {
        out.push(cards.iter().map(|c| c.id).collect());
    }
}

fn push_set(cards: &[Card], out: &mut Vec<MeldCards>) {
    if is_valid_set(cards) {
        out.push(cards.iter().map(|c| c.id).collect());
    }
}

fn find_runs(hand: &[Card], suit: Suit, wild: Option<Card>, out: &mut Vec<MeldCards>) {
    // (effective value, card); an ace appears at both ends of the line.
    let mut line: Vec<(u8, Card)> = Vec::new();
    for card in hand.iter().filter(|c| c.suit == Some(suit)) {
        line.push((card.rank.0, *card));
        if card.rank == Rank::ACE {
            line.push((1, *card));
        }
    }
    line.sort_by_key(|(value, _)| *value);

    for start in 0..line.len() {
        let mut end = start + 1;
        while end < line.len() && end - start < MAX_MELD && line[end].0 == line[end - 1].0 + 1 {
            end += 1;
        }

        for len in MIN_MELD..=MAX_MELD {
            if start + len > end {
                break;
            }
            let run: SmallVec<[Card; 4]> = line[start..start + len].iter().map(|(_, c)| *c).collect();
            push_run(&run, out);

            if let (Some(w), MIN_MELD) = (wild, len) {
                let mut before: SmallVec<[Card; 4]> = SmallVec::new();
                before.push(w);
                before.extend_from_slice(&run);
                push_run(&before, out);

                let mut after = run.clone();
                after.push(w);
                push_run(&after, out);
            }
        }
    }

    let Some(w) = wild else {
        return;
    };
    for start in 0..line.len() {
        for naturals in 2..MAX_MELD {
            let Some(window) = line.get(start..start + naturals) else {
                break;
            };
            if window[naturals - 1].0 - window[0].0 != naturals as u8 {
                continue;
            }
            let Some(gap) = window.windows(2).position(|p| p[1].0 - p[0].0 == 2) else {
                continue;
            };
            let mut bridged: SmallVec<[Card; 4]> = window.iter().map(|(_, c)| *c).collect();
            bridged.insert(gap + 1, w);
            push_run(&bridged, out);
        }
    }
}

fn find_sets(hand: &[Card], rank: Rank, wild: Option<Card>, out: &mut Vec<MeldCards>) {
    let group: SmallVec<[Card; 4]> = hand
        .iter()
        .filter(|c| c.rank == rank && !c.is_wild())
        .copied()
        .collect();
    let n = group.len();

    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                let three = [group[i], group[j], group[k]];
                push_set(&three, out);
                if let Some(w) = wild {
                    push_set(&[group[i], group[j], group[k], w], out);
                }
            }
        }
    }
    if n == MAX_MELD {
        push_set(&group, out);
    }
}

/// Every (meld index, card) lay-off available to `hand`. The trailing
/// placeholder is never a target.
#[must_use]
pub fn find_layoffs(hand: &[Card], melds: &[Meld]) -> Vec<(usize, CardId)> {
    let table = table_melds(melds);
    let mut found = Vec::new();
    for card in hand {
        for (index, meld) in table.iter().enumerate() {
            if !meld.is_empty() && layoff_possible(meld, card) {
                found.push((index, card.id));
            }
        }
    }
    found
}

/// Every (meld index, card) wild-card swap available to `hand`.
#[must_use]
pub fn find_swaps(hand: &[Card], melds: &[Meld]) -> Vec<(usize, CardId)> {
    let table = table_melds(melds);
    let mut found = Vec::new();
    for card in hand.iter().filter(|c| !c.is_wild()) {
        for (index, meld) in table.iter().enumerate() {
            if meld.wild_count() > 0 && joker_swap_possible(meld, card) {
                found.push((index, card.id));
            }
        }
    }
    found
}

fn table_melds(melds: &[Meld]) -> &[Meld] {
    match melds.split_last() {
        Some((_, fixed)) => fixed,
        None => melds,
    }
}
