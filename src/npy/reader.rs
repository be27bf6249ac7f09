//! Frame Reader
//!
//! Reads a saved history back into memory.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::error::{GridError, Result};
use crate::grid::History;

use super::read_header;

/// Load a `(frames, rows, cols)` file; a 2-D file loads as a single frame
pub fn load_frames(path: &Path) -> Result<History> {
    let mut reader = BufReader::new(File::open(path)?);
    let header = read_header(&mut reader)?;

    let (frames, rows, cols) = match header.shape.as_slice() {
        [frames, rows, cols] => (*frames, *rows, *cols),
        [rows, cols] => (1, *rows, *cols),
        other => {
            return Err(GridError::Format(format!(
                "expected a 2-D or 3-D array, found {} dimensions",
                other.len()
            )))
        }
    };

    let mut history = History::with_capacity(rows, cols, frames)?;
    let mut frame = vec![0u8; history.frame_len()];
    for index in 0..frames {
        reader.read_exact(&mut frame).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => GridError::Format(format!(
                "truncated payload in {}: frame {} of {} is incomplete",
                path.display(),
                index,
                frames
            )),
            _ => GridError::Io(e),
        })?;
        history.push(&frame);
    }

    Ok(history)
}
