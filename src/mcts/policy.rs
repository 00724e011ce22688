//! ISMCTS policies for selection and simulation.
//!
//! Policies are trait-based to allow customization:
//! - `SelectionPolicy`: How to score legal children during descent (UCB1)
//! - `SimulationPolicy`: How to play out a determinized state (random)

use crate::core::{EngineResult, GameError, GameRng};
use crate::rules::RulesEngine;

use super::config::SearchConfig;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for scoring a child during selection. The highest score is
/// followed; ties go to the earliest child.
pub trait SelectionPolicy: Send + Sync {
    /// Score a child from its statistics.
    fn score(&self, visits: u32, reward: f64, considerations: u32, config: &SearchConfig) -> f64;
}

/// UCB1 over availability counts.
///
/// Formula: reward / visits + c * sqrt(ln(considerations) / visits)
///
/// `considerations` counts how often the child's move was legal when its
/// parent was descended through, so moves that are rarely available are not
/// penalized for rarely being chosen.
#[derive(Clone, Debug, Default)]
pub struct Ucb1;

impl SelectionPolicy for Ucb1 {
    fn score(&self, visits: u32, reward: f64, considerations: u32, config: &SearchConfig) -> f64 {
        if visits == 0 {
            return f64::INFINITY;
        }
        let visits = visits as f64;
        let exploration = ((considerations.max(1) as f64).ln() / visits).sqrt();
        reward / visits + config.exploration_constant * exploration
    }
}

// =============================================================================
// Simulation Policy
// =============================================================================

/// Policy for running simulations (rollouts) from a determinized state.
pub trait SimulationPolicy<E: RulesEngine>: Send + Sync {
    /// Play until no legal move remains, returning the number of moves made.
    ///
    /// # Errors
    ///
    /// Propagates engine errors, and reports `InvariantViolation` if the
    /// rollout runs past `max_moves`.
    fn simulate(
        &self,
        engine: &E,
        state: &mut E::State,
        rng: &mut GameRng,
        max_moves: u32,
    ) -> EngineResult<u32>;
}

/// Random simulation policy.
///
/// Plays uniformly random legal moves. A lone legal move (typically a pass)
/// is taken without consulting the RNG.
#[derive(Clone, Debug, Default)]
pub struct RandomSimulation;

impl<E: RulesEngine> SimulationPolicy<E> for RandomSimulation {
    fn simulate(
        &self,
        engine: &E,
        state: &mut E::State,
        rng: &mut GameRng,
        max_moves: u32,
    ) -> EngineResult<u32> {
        let mut played = 0;

        loop {
            let moves = engine.legal_moves(state);
            let mv = match moves.len() {
                0 => return Ok(played),
                1 => &moves[0],
                n => &moves[rng.gen_range_usize(0..n)],
            };
            if played >= max_moves {
                return Err(GameError::invariant(format!(
                    "rollout still running after {max_moves} moves"
                )));
            }
            engine.apply_move(state, mv)?;
            played += 1;
        }
    }
}
