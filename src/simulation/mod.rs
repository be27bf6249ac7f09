//! Simulation Module
//!
//! Drives the fixed-iteration loop over a [`GridStore`].
//!
//! ## Step
//! 1. Every cell of `current` is read, every cell of `next` written once
//! 2. The store toggles its buffer slot
//! 3. The new current state is appended to the history
//!
//! Serial and parallel execution only differ in how step 1 is split up, so
//! both produce identical histories.

mod scheduler;

pub use scheduler::ChunkScheduler;

use crate::config::Execution;
use crate::error::Result;
use crate::grid::{GridStore, History};
use crate::rule;

/// Runs steps with a fixed execution strategy
#[derive(Debug, Clone, Copy)]
pub struct Simulation {
    execution: Execution,
}

impl Simulation {
    pub fn new(execution: Execution) -> Self {
        Self { execution }
    }

    /// A single-threaded simulation
    pub fn serial() -> Self {
        Self::new(Execution::Serial)
    }

    pub fn execution(&self) -> Execution {
        self.execution
    }

    /// Simulate `iterations` steps from `initial`
    ///
    /// Returns `iterations + 1` frames. All memory is reserved before the
    /// first step; `Allocation` is returned if that fails and nothing runs.
    pub fn run(&self, initial: &[u8], rows: usize, cols: usize, iterations: usize) -> Result<History> {
        let mut store = GridStore::new(initial, rows, cols, iterations)?;
        self.advance(&mut store, iterations);
        Ok(store.into_history())
    }

    /// Apply `steps` steps to an existing store
    pub fn advance(&self, store: &mut GridStore, steps: usize) {
        for _ in 0..steps {
            self.step(store);
            tracing::trace!(step = store.steps(), "Step complete");
        }
    }

    /// Apply one step
    pub fn step(&self, store: &mut GridStore) {
        let cols = store.cols();
        let (current, next) = store.buffers_mut();

        match self.execution {
            Execution::Serial => sweep(current, next, 0, cols),
            Execution::Parallel { workers } => {
                ChunkScheduler::new(workers).sweep(current, next, cols)
            }
        }

        store.commit();
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::serial()
    }
}

/// Compute `next` for cells `start..start + next.len()` of `current`
pub(crate) fn sweep(current: &[u8], next: &mut [u8], start: usize, cols: usize) {
    for (offset, cell) in next.iter_mut().enumerate() {
        *cell = rule::next_state(current, start + offset, cols) as u8;
    }
}
