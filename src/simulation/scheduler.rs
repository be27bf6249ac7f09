//! Chunk Scheduler
//!
//! Fork-join sweep: the flat index range is cut into contiguous chunks, one
//! scoped task per chunk, joined before the step ends.

use super::sweep;

/// Splits one step's sweep across worker threads
#[derive(Debug, Clone, Copy)]
pub struct ChunkScheduler {
    workers: usize,
}

impl ChunkScheduler {
    /// At least one worker is always used
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Cells per chunk for a grid of `cells` cells
    pub fn chunk_len(&self, cells: usize) -> usize {
        cells.div_ceil(self.workers).max(1)
    }

    /// Compute every cell of `next` from `current`
    ///
    /// `current` is shared by all tasks; each task owns a disjoint slice of
    /// `next`. Returns once every task has finished. A panicking task is
    /// re-raised here.
    pub fn sweep(&self, current: &[u8], next: &mut [u8], cols: usize) {
        let chunk_len = self.chunk_len(next.len());
        if chunk_len >= next.len() {
            sweep(current, next, 0, cols);
            return;
        }

        crossbeam::thread::scope(|scope| {
            for (index, chunk) in next.chunks_mut(chunk_len).enumerate() {
                scope.spawn(move |_| sweep(current, chunk, index * chunk_len, cols));
            }
        })
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
    }
}
