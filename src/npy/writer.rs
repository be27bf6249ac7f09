//! Array Writer
//!
//! Streams frames to a new array file behind a single header.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{GridError, Result};

use super::write_header;

/// Builder for array files made of equally sized frames
///
/// Writes the header immediately; call `write_frame()` once per frame, then
/// `finish()` to flush and sync.
pub struct ArrayWriter {
    /// Output file path
    path: PathBuf,
    /// Buffered writer for performance
    writer: BufWriter<File>,
    /// Bytes per frame
    frame_len: usize,
    /// Frames promised by the header
    expected_frames: usize,
    /// Frames written so far
    frames_written: usize,
    /// Header plus payload bytes written
    bytes_written: u64,
}

impl ArrayWriter {
    /// Create a writer for a `(frames, rows, cols)` stack
    pub fn create(path: &Path, frames: usize, rows: usize, cols: usize) -> Result<Self> {
        Self::with_shape(path, &[frames, rows, cols])
    }

    /// Create a writer for an arbitrary shape
    ///
    /// For three or more dimensions the leading one counts frames; otherwise
    /// the whole array is a single frame.
    pub fn with_shape(path: &Path, shape: &[usize]) -> Result<Self> {
        let product = |dims: &[usize]| {
            dims.iter()
                .try_fold(1usize, |acc, &d| acc.checked_mul(d))
                .ok_or_else(|| GridError::Format(format!("shape {:?} is too large", shape)))
        };
        let (expected_frames, frame_len) = match shape {
            [frames, rest @ ..] if rest.len() >= 2 => (*frames, product(rest)?),
            _ => (1, product(shape)?),
        };

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut writer = BufWriter::new(file);
        let header_len = write_header(&mut writer, shape)?;

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            frame_len,
            expected_frames,
            frames_written: 0,
            bytes_written: header_len as u64,
        })
    }

    /// Append one frame
    pub fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        if frame.len() != self.frame_len {
            return Err(GridError::Format(format!(
                "frame {} has {} bytes, expected {}",
                self.frames_written,
                frame.len(),
                self.frame_len
            )));
        }
        if self.frames_written == self.expected_frames {
            return Err(GridError::Format(format!(
                "header declares {} frames, refusing to write more",
                self.expected_frames
            )));
        }

        self.writer.write_all(frame)?;
        self.frames_written += 1;
        self.bytes_written += frame.len() as u64;
        Ok(())
    }

    /// Flush, sync and return the file size in bytes
    pub fn finish(self) -> Result<u64> {
        if self.frames_written != self.expected_frames {
            return Err(GridError::Format(format!(
                "{}: header declares {} frames but {} were written",
                self.path.display(),
                self.expected_frames,
                self.frames_written
            )));
        }

        // into_inner flushes the buffer
        let file = self
            .writer
            .into_inner()
            .map_err(|e| GridError::Io(e.into_error()))?;
        file.sync_all()?;

        Ok(self.bytes_written)
    }
}

/// Write `depth` frames of `rows * cols` bytes as a `(depth, rows, cols)` array
pub fn save<'a, I>(path: &Path, frames: I, rows: usize, cols: usize, depth: usize) -> Result<u64>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut writer = ArrayWriter::create(path, depth, rows, cols)?;
    for frame in frames {
        writer.write_frame(frame)?;
    }
    let bytes = writer.finish()?;

    tracing::debug!(path = %path.display(), frames = depth, rows, cols, bytes, "Saved array file");
    Ok(bytes)
}

/// Write a single 2-D `(rows, cols)` grid
pub fn save_grid(path: &Path, cells: &[u8], rows: usize, cols: usize) -> Result<u64> {
    let mut writer = ArrayWriter::with_shape(path, &[rows, cols])?;
    writer.write_frame(cells)?;
    writer.finish()
}
