//! Background search scheduling.
//!
//! One worker thread at a time runs `IsmctsSearch` over a snapshot of the
//! game. Its move comes back over a one-shot channel that the foreground
//! polls without blocking. Every launch is stamped with a generation;
//! abandoning the round bumps the generation so a result still in flight is
//! dropped when it arrives instead of being applied to a different round.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use crate::core::{EngineResult, GameError, GameState, Move, PlayerId};
use crate::mcts::{IsmctsSearch, SearchConfig};
use crate::rules::RummyRules;

type SearchOutcome = EngineResult<Option<Move>>;

struct Worker {
    generation: u64,
    receiver: Receiver<SearchOutcome>,
    handle: JoinHandle<()>,
}

/// Runs at most one search in the background and hands out its move once.
pub struct SearchScheduler {
    config: SearchConfig,
    generation: u64,
    launches: u64,
    worker: Option<Worker>,
    ready: Option<Move>,
}

impl SearchScheduler {
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            generation: 0,
            launches: 0,
            worker: None,
            ready: None,
        }
    }

    /// Launch a search if it is `computer`'s turn, no worker is running and
    /// no finished move is waiting to be taken. Returns whether a search was
    /// launched.
    ///
    /// The worker gets its own clone of `state` and never sees the live game.
    ///
    /// # Errors
    ///
    /// Errors from reaping a previous worker (see [`poll`](Self::poll)), or
    /// `SearchUnavailable` if the thread cannot be spawned.
    pub fn maybe_start(&mut self, state: &GameState, computer: PlayerId) -> EngineResult<bool> {
        self.poll()?;
        if state.is_over()
            || state.active_player() != computer
            || self.worker.is_some()
            || self.ready.is_some()
        {
            return Ok(false);
        }

        let snapshot = state.clone();
        let config = self
            .config
            .clone()
            .with_seed(self.config.seed.wrapping_add(self.launches));
        let (sender, receiver) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("ismcts-search".into())
            .spawn(move || {
                let mut search = IsmctsSearch::new(RummyRules, config);
                let outcome = search.search(&snapshot);
                // The receiver is gone if the scheduler was dropped.
                let _ = sender.send(outcome);
            })
            .map_err(|_| GameError::SearchUnavailable)?;

        self.launches += 1;
        self.worker = Some(Worker {
            generation: self.generation,
            receiver,
            handle,
        });
        info!(%computer, turn = state.turn(), generation = self.generation, "search launched");
        Ok(true)
    }

    /// Collect the worker's move if it has finished. Never blocks.
    ///
    /// # Errors
    ///
    /// The search's own error, or `SearchUnavailable` if the worker died
    /// without answering. Results of abandoned searches, failures included,
    /// are discarded with a warning.
    pub fn poll(&mut self) -> EngineResult<()> {
        let Some(worker) = &self.worker else {
            return Ok(());
        };
        let outcome = match worker.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return Ok(()),
            Err(TryRecvError::Disconnected) => Err(GameError::SearchUnavailable),
        };
        self.finish(outcome)
    }

    /// Block until the running search (if any) finishes, then collect it.
    ///
    /// # Errors
    ///
    /// Same as [`poll`](Self::poll).
    pub fn wait(&mut self) -> EngineResult<()> {
        let Some(worker) = &self.worker else {
            return Ok(());
        };
        let outcome = worker
            .receiver
            .recv()
            .unwrap_or(Err(GameError::SearchUnavailable));
        self.finish(outcome)
    }

    fn finish(&mut self, outcome: SearchOutcome) -> EngineResult<()> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        // The worker has sent or dropped its sender, so this returns promptly.
        let _ = worker.handle.join();

        if worker.generation != self.generation {
            warn!(
                generation = worker.generation,
                current = self.generation,
                "discarding result of abandoned search"
            );
            return Ok(());
        }
        self.ready = outcome?;
        Ok(())
    }

    /// Take the finished move. Each result is handed out once.
    pub fn take_result(&mut self) -> Option<Move> {
        self.ready.take()
    }

    /// Forget the current round: a pending move is dropped and a search
    /// still running will have its result discarded. Searches cannot be
    /// interrupted, so the worker keeps running until its deadline and no new
    /// search starts before then.
    pub fn abandon(&mut self) {
        self.generation += 1;
        self.ready = None;
    }

    /// A worker thread is running or has an uncollected answer.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.worker.is_some()
    }

    /// A finished move is waiting in `take_result`.
    #[must_use]
    pub fn has_result(&self) -> bool {
        self.ready.is_some()
    }

    /// Searches launched so far.
    #[must_use]
    pub fn launches(&self) -> u64 {
        self.launches
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}
