//! Simulation History
//!
//! Every frame of a run, back to back in one buffer.

use std::path::Path;
use std::slice::ChunksExact;

use crate::error::{GridError, Result};
use crate::npy;

use super::Grid;

/// Ordered grid snapshots: the initial state plus one per step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    rows: usize,
    cols: usize,
    /// `rows * cols`, never zero
    frame_len: usize,
    /// Frames stored contiguously
    data: Vec<u8>,
}

impl History {
    /// Reserve room for `frames` frames up front
    ///
    /// Fails with `Allocation` when the buffer cannot be reserved.
    pub fn with_capacity(rows: usize, cols: usize, frames: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GridError::Format(format!(
                "history frames must be non-empty, got {} x {}",
                rows, cols
            )));
        }
        let frame_len = rows
            .checked_mul(cols)
            .ok_or(GridError::Allocation { bytes: usize::MAX })?;
        let total = frame_len
            .checked_mul(frames)
            .ok_or(GridError::Allocation { bytes: usize::MAX })?;

        let mut data = Vec::new();
        data.try_reserve_exact(total)
            .map_err(|_| GridError::Allocation { bytes: total })?;

        Ok(Self {
            rows,
            cols,
            frame_len,
            data,
        })
    }

    /// Append a copy of `frame`
    pub fn push(&mut self, frame: &[u8]) {
        assert_eq!(frame.len(), self.frame_len, "frame size mismatch");
        self.data.extend_from_slice(frame);
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.data.len() / self.frame_len
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Bytes per frame
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Frame `index`, if recorded
    pub fn frame(&self, index: usize) -> Option<&[u8]> {
        let start = index.checked_mul(self.frame_len)?;
        let end = start.checked_add(self.frame_len)?;
        self.data.get(start..end)
    }

    /// The most recent frame
    pub fn last(&self) -> Option<&[u8]> {
        self.len().checked_sub(1).and_then(|i| self.frame(i))
    }

    /// Frames in order
    pub fn frames(&self) -> ChunksExact<'_, u8> {
        self.data.chunks_exact(self.frame_len)
    }

    /// Frame `index` as an owned grid
    pub fn grid(&self, index: usize) -> Option<Grid> {
        let frame = self.frame(index)?;
        Grid::from_cells(self.rows, self.cols, frame).ok()
    }

    /// All frames, contiguous
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Write as a `(frames, rows, cols)` array file, returning its size
    pub fn save(&self, path: &Path) -> Result<u64> {
        npy::save(path, self.frames(), self.rows, self.cols, self.len())
    }
}
