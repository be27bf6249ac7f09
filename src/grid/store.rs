//! Grid Store
//!
//! Owns the two working buffers and the history of a run.

use std::path::Path;

use crate::error::{GridError, Result};
use crate::npy;

use super::{alloc_cells, Grid, History};

/// Double-buffered grid plus the history it feeds
///
/// ## Buffers
/// - `buffers[current]`: the latest state, read-only during a step
/// - `buffers[current ^ 1]`: the next state, written once per cell
///
/// `commit()` toggles the slot and records the new state; nothing is copied
/// between the two buffers.
pub struct GridStore {
    rows: usize,
    cols: usize,
    buffers: [Vec<u8>; 2],
    /// Slot holding the current state (0 or 1)
    current: usize,
    history: History,
}

impl GridStore {
    /// Set up buffers for `iterations` steps starting from `initial`
    ///
    /// Everything is allocated here; later steps never allocate. Fails with
    /// `Allocation` if the buffers or the `iterations + 1` frame history
    /// cannot be reserved.
    pub fn new(initial: &[u8], rows: usize, cols: usize, iterations: usize) -> Result<Self> {
        if rows == 0 || cols == 0 || rows.checked_mul(cols) != Some(initial.len()) {
            return Err(GridError::Format(format!(
                "{} cells do not fill a {} x {} grid",
                initial.len(),
                rows,
                cols
            )));
        }

        let frames = iterations
            .checked_add(1)
            .ok_or(GridError::Allocation { bytes: usize::MAX })?;
        let mut history = History::with_capacity(rows, cols, frames)?;

        let mut current = alloc_cells(initial.len())?;
        current.copy_from_slice(initial);
        let next = alloc_cells(initial.len())?;

        history.push(initial);

        Ok(Self {
            rows,
            cols,
            buffers: [current, next],
            current: 0,
            history,
        })
    }

    /// Set up buffers from an owned grid
    pub fn from_grid(grid: &Grid, iterations: usize) -> Result<Self> {
        Self::new(grid.cells(), grid.rows(), grid.cols(), iterations)
    }

    /// Load the initial grid from an array file
    ///
    /// The file mapping is released before this returns, on success or error.
    pub fn load(path: &Path, iterations: usize) -> Result<Self> {
        let mapped = npy::load(path)?;
        tracing::debug!(
            path = %path.display(),
            rows = mapped.rows(),
            cols = mapped.cols(),
            "Loaded initial grid"
        );
        Self::new(&mapped, mapped.rows(), mapped.cols(), iterations)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cells per grid
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The latest state
    pub fn current(&self) -> &[u8] {
        &self.buffers[self.current]
    }

    /// `(current, next)`: read the first, write the second
    pub fn buffers_mut(&mut self) -> (&[u8], &mut [u8]) {
        let (first, second) = self.buffers.split_at_mut(1);
        if self.current == 0 {
            (first[0].as_slice(), second[0].as_mut_slice())
        } else {
            (second[0].as_slice(), first[0].as_mut_slice())
        }
    }

    /// Make the next buffer current and append it to the history
    pub fn commit(&mut self) {
        self.current ^= 1;
        self.history.push(&self.buffers[self.current]);
    }

    /// Steps committed so far
    pub fn steps(&self) -> usize {
        self.history.len() - 1
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn into_history(self) -> History {
        self.history
    }

    /// Write the history as an array file, returning its size
    pub fn save(&self, path: &Path) -> Result<u64> {
        self.history.save(path)
    }
}
