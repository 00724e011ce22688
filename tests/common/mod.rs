//! Shared helpers for integration tests.

#![allow(dead_code)]

use once_cell::sync::OnceCell;
use proptest::prelude::ProptestConfig;
use tracing_subscriber::{fmt, EnvFilter};

use rummy_ismcts::core::{Card, GameConfig, GameState, Phase, PlayerId, PlayerMap, Rank, Suit, TableSetup};

static LOGGING: OnceCell<()> = OnceCell::new();

/// Install a test subscriber once per binary.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, then `"warn"`.
pub fn init_test_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// Property test settings. `PROPTEST_CASES` overrides the case count.
pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(16)
        .max(1);

    ProptestConfig {
        failure_persistence: None,
        cases,
        ..ProptestConfig::default()
    }
}

pub fn card(suit: Suit, rank: u8) -> Card {
    Card::natural(suit, Rank(rank))
}

/// Build a position with player 0 to act.
pub fn table(
    p0: Vec<Card>,
    p1: Vec<Card>,
    pile: Vec<Card>,
    melds: Vec<Vec<Card>>,
    phase: Phase,
) -> GameState {
    table_with(GameConfig::default(), p0, p1, pile, melds, phase)
}

pub fn table_with(
    config: GameConfig,
    p0: Vec<Card>,
    p1: Vec<Card>,
    pile: Vec<Card>,
    melds: Vec<Vec<Card>>,
    phase: Phase,
) -> GameState {
    let setup = TableSetup {
        hands: PlayerMap::new(|p| if p.index() == 0 { p0.clone() } else { p1.clone() }),
        pile,
        melds,
        phase,
        active: PlayerId::new(0),
    };
    GameState::from_setup(&config, setup).unwrap()
}
