//! Round configuration.
//!
//! Passed explicitly when a round is dealt. Nothing in the engine reads
//! process-wide settings.

use serde::{Deserialize, Serialize};

use super::card::{NATURAL_CARDS, WILD_CARDS};

/// Configuration for a round of Rummy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Include the two wild cards (54-card deck instead of 52).
    pub wild_cards: bool,

    /// Cards dealt to each player.
    pub hand_size: usize,

    /// Pile-to-deck reshuffles allowed before the round is declared drawn.
    pub max_reshuffles: u32,

    /// Turns allowed before the round is declared drawn. Both players can
    /// otherwise trade the same pile card back and forth indefinitely.
    pub max_turns: u32,

    /// Seed for the deal and all later reshuffles.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            wild_cards: true,
            hand_size: 10,
            max_reshuffles: 3,
            max_turns: 200,
            seed: 42,
        }
    }
}

impl GameConfig {
    /// Enable or disable wild cards.
    #[must_use]
    pub fn with_wild_cards(mut self, enabled: bool) -> Self {
        self.wild_cards = enabled;
        self
    }

    /// Set the number of cards dealt to each player.
    #[must_use]
    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    /// Set the reshuffle cap.
    #[must_use]
    pub fn with_max_reshuffles(mut self, cap: u32) -> Self {
        self.max_reshuffles = cap;
        self
    }

    /// Set the turn cap.
    #[must_use]
    pub fn with_max_turns(mut self, cap: u32) -> Self {
        self.max_turns = cap;
        self
    }

    /// Set the deal seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of cards in play: 52, or 54 with wild cards.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        if self.wild_cards {
            NATURAL_CARDS + WILD_CARDS
        } else {
            NATURAL_CARDS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert!(config.wild_cards);
        assert_eq!(config.hand_size, 10);
        assert_eq!(config.total_cards(), 54);
    }

    #[test]
    fn test_builder_pattern() {
        let config = GameConfig::default()
            .with_wild_cards(false)
            .with_hand_size(7)
            .with_max_reshuffles(1)
            .with_max_turns(50)
            .with_seed(9);

        assert_eq!(config.total_cards(), 52);
        assert_eq!(config.hand_size, 7);
        assert_eq!(config.max_reshuffles, 1);
        assert_eq!(config.max_turns, 50);
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn test_serialization() {
        let config = GameConfig::default().with_seed(123);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
