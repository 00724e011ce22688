//! Core ISMCTS search algorithm.
//!
//! Every iteration samples a fresh determinization of the root state from
//! the searching player's point of view and walks the shared tree through
//! it. Because a move legal in one sample may be illegal in another,
//! legality is re-checked at every step of the descent.

use std::time::Instant;

use tracing::{debug, info};

use crate::core::{EngineResult, GameError, GameRng, PlayerId};
use crate::rules::RulesEngine;

use super::config::SearchConfig;
use super::node::NodeId;
use super::policy::{RandomSimulation, SelectionPolicy, SimulationPolicy, Ucb1};
use super::stats::SearchStats;
use super::tree::SearchTree;

/// Main ISMCTS search context.
///
/// Generic over the rules engine type. Owns the search tree and
/// configuration, and provides methods to run searches.
pub struct IsmctsSearch<E: RulesEngine> {
    /// The game rules engine.
    engine: E,

    /// Search configuration.
    config: SearchConfig,

    /// The search tree.
    tree: SearchTree<E::Move>,

    /// RNG for determinizations, expansion and rollouts.
    rng: GameRng,

    /// Selection policy.
    selection: Box<dyn SelectionPolicy>,

    /// Simulation policy.
    simulation: Box<dyn SimulationPolicy<E>>,

    /// Search statistics.
    stats: SearchStats,
}

impl<E: RulesEngine> IsmctsSearch<E> {
    /// Create a new ISMCTS search context.
    pub fn new(engine: E, config: SearchConfig) -> Self {
        let rng = GameRng::new(config.seed);
        let capacity = config.max_nodes.min(1 << 16);

        Self {
            engine,
            config,
            tree: SearchTree::with_capacity(capacity),
            rng,
            selection: Box::new(Ucb1),
            simulation: Box::new(RandomSimulation),
            stats: SearchStats::default(),
        }
    }

    /// Set a custom selection policy.
    #[must_use]
    pub fn with_selection<S: SelectionPolicy + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set a custom simulation policy.
    #[must_use]
    pub fn with_simulation<S: SimulationPolicy<E> + 'static>(mut self, simulation: S) -> Self {
        self.simulation = Box::new(simulation);
        self
    }

    /// Search from `root_state` for the player to move.
    ///
    /// Runs until the thinking time elapses, the iteration cap is hit or the
    /// tree is full, then returns the root move with the most visits. Returns
    /// `None` if the root has no legal move and the only move without
    /// searching when there is exactly one.
    ///
    /// # Errors
    ///
    /// Propagates engine errors raised while replaying moves; they mean the
    /// rules and the tree disagree, which is an invariant violation.
    pub fn search(&mut self, root_state: &E::State) -> EngineResult<Option<E::Move>> {
        let start = Instant::now();
        self.stats.reset();
        self.tree.reset();

        let root_moves = self.engine.legal_moves(root_state);
        match root_moves.len() {
            0 => return Ok(None),
            1 => return Ok(root_moves.into_iter().next()),
            _ => {}
        }

        let observer = self.engine.active_player(root_state);
        loop {
            self.iteration(root_state, observer)?;
            self.stats.iterations += 1;

            if self.config.max_iterations.is_some_and(|cap| self.stats.iterations >= cap)
                || start.elapsed() >= self.config.think_time
                || self.tree.len() >= self.config.max_nodes
            {
                break;
            }
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;
        self.stats.max_depth = self.tree.stats().max_depth;

        let best = self.best_move();
        info!(
            %observer,
            iterations = self.stats.iterations,
            nodes = self.tree.len(),
            elapsed_ms = self.stats.time_us / 1000,
            chosen = ?best,
            "search finished"
        );
        Ok(best)
    }

    /// Single ISMCTS iteration: determinize, select, expand, simulate,
    /// backpropagate.
    fn iteration(&mut self, root_state: &E::State, observer: PlayerId) -> EngineResult<()> {
        let mut state = self.engine.determinize(root_state, observer, &mut self.rng);
        let mut current = self.tree.root();

        // === SELECTION ===
        let mut legal = self.engine.legal_moves(&state);
        while !legal.is_empty() && self.tree.untried_moves(current, &legal).is_empty() {
            current = self.select_child(current, &legal)?;
            let mv = self
                .tree
                .get(current)
                .mv
                .clone()
                .ok_or_else(|| GameError::invariant("non-root node without a move"))?;
            self.engine.apply_move(&mut state, &mv)?;
            legal = self.engine.legal_moves(&state);
        }

        // === EXPANSION ===
        let untried = self.tree.untried_moves(current, &legal);
        if !untried.is_empty() {
            let mv = untried[self.rng.gen_range_usize(0..untried.len())].clone();
            let mover = self.engine.active_player(&state);
            self.engine.apply_move(&mut state, &mv)?;
            current = self.tree.add_child(current, mv, mover);
            self.stats.nodes_expanded += 1;
        }

        // === SIMULATION ===
        let played = self.simulation.simulate(
            &self.engine,
            &mut state,
            &mut self.rng,
            self.config.max_rollout_moves,
        )?;
        self.stats.rollout_moves += u64::from(played);

        // === BACKPROPAGATION ===
        let dead_end = self.engine.result(&state, observer).is_none();
        if dead_end {
            self.stats.dead_ends += 1;
            debug!("determinization ended without a result, scoring as draw");
        }
        while !current.is_none() {
            let node = self.tree.get_mut(current);
            let result = node.mover.map(|p| self.engine.result(&state, p).unwrap_or(0.5));
            node.update(result);
            current = node.parent;
        }
        Ok(())
    }

    /// Pick the best legal child by the selection policy and count every
    /// legal child as considered.
    fn select_child(&mut self, parent: NodeId, legal: &[E::Move]) -> EngineResult<NodeId> {
        let candidates = self.tree.legal_children(parent, legal);

        let mut best: Option<(NodeId, f64)> = None;
        for &child in &candidates {
            let node = self.tree.get(child);
            let score = self
                .selection
                .score(node.visits, node.reward, node.considerations, &self.config);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((child, score));
            }
        }
        for &child in &candidates {
            self.tree.get_mut(child).considerations += 1;
        }

        best.map(|(id, _)| id)
            .ok_or_else(|| GameError::invariant("no legal child to select"))
    }

    /// Most-visited root move; the earliest child wins ties.
    fn best_move(&self) -> Option<E::Move> {
        let mut best: Option<NodeId> = None;
        for &child in self.tree.children(self.tree.root()) {
            if best.map_or(true, |b| self.tree.get(child).visits > self.tree.get(b).visits) {
                best = Some(child);
            }
        }
        best.and_then(|id| self.tree.get(id).mv.clone())
    }

    /// Visit counts of the root's children from the last search, in creation
    /// order.
    #[must_use]
    pub fn root_visits(&self) -> Vec<(E::Move, u32)> {
        self.tree
            .children(self.tree.root())
            .iter()
            .filter_map(|&id| {
                let node = self.tree.get(id);
                node.mv.clone().map(|mv| (mv, node.visits))
            })
            .collect()
    }

    /// Get search statistics from the last search.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the search tree.
    #[must_use]
    pub fn tree(&self) -> &SearchTree<E::Move> {
        &self.tree
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}
