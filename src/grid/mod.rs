//! Grid Module
//!
//! In-memory grids, the per-step history, and the double-buffered store the
//! simulation runs on.
//!
//! ## Layout
//! Cells are row-major `u8`s: index `i` sits at `x = i % cols`, `y = i / cols`.
//! Zero is dead, anything else is alive; stepped grids hold only 0 and 1.

mod history;
mod store;

use std::fmt;

pub use history::History;
pub use store::GridStore;

use crate::error::{GridError, Result};

/// Glyph printed for a live cell
pub const ALIVE_GLYPH: char = '█';

/// Glyph printed for a dead cell
pub const DEAD_GLYPH: char = '-';

/// An owned `rows x cols` grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Wrap row-major cells
    pub fn new(rows: usize, cols: usize, cells: Vec<u8>) -> Result<Self> {
        check_dims(rows, cols, cells.len())?;
        Ok(Self { rows, cols, cells })
    }

    /// Copy row-major cells into a new grid
    pub fn from_cells(rows: usize, cols: usize, cells: &[u8]) -> Result<Self> {
        check_dims(rows, cols, cells.len())?;
        let mut owned = alloc_cells(cells.len())?;
        owned.copy_from_slice(cells);
        Ok(Self {
            rows,
            cols,
            cells: owned,
        })
    }

    /// An all-dead grid
    pub fn dead(rows: usize, cols: usize) -> Result<Self> {
        let len = rows
            .checked_mul(cols)
            .ok_or(GridError::Allocation { bytes: usize::MAX })?;
        check_dims(rows, cols, len)?;
        Ok(Self {
            rows,
            cols,
            cells: alloc_cells(len)?,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<u8> {
        self.cells
    }

    /// Whether the cell at `(x, y)` is alive; `None` when out of range
    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        if x < self.cols && y < self.rows {
            Some(self.cells[y * self.cols + x] != 0)
        } else {
            None
        }
    }

    /// Set the cell at `(x, y)`; out-of-range coordinates are ignored
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        if x < self.cols && y < self.rows {
            self.cells[y * self.cols + x] = alive as u8;
        }
    }

    /// Number of live cells
    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }
}

/// One row per line, `█` for alive and `-` for dead
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks_exact(self.cols) {
            for &cell in row {
                let glyph = if cell != 0 { ALIVE_GLYPH } else { DEAD_GLYPH };
                write!(f, "{}", glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn check_dims(rows: usize, cols: usize, len: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(GridError::Format(format!(
            "grid dimensions must be non-zero, got {} x {}",
            rows, cols
        )));
    }
    if rows.checked_mul(cols) != Some(len) {
        return Err(GridError::Format(format!(
            "{} cells do not fill a {} x {} grid",
            len, rows, cols
        )));
    }
    Ok(())
}

/// Zeroed buffer, reporting allocation failure instead of aborting
pub(crate) fn alloc_cells(len: usize) -> Result<Vec<u8>> {
    let mut cells = Vec::new();
    cells
        .try_reserve_exact(len)
        .map_err(|_| GridError::Allocation { bytes: len })?;
    cells.resize(len, 0);
    Ok(cells)
}
