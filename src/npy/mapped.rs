//! Memory-Mapped Grid
//!
//! Maps a grid file read-write so the cells are backed by the file itself.

use std::fs::OpenOptions;
use std::io::BufReader;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use memmap2::{MmapMut, MmapOptions};

use crate::error::{GridError, Result};
use crate::grid::Grid;

use super::read_header;

/// A 1-D or 2-D `u1` grid mapped straight from its file.
///
/// The mapping covers header and payload; the cell view starts at the payload
/// offset. The map is released when this value drops, on every path.
pub struct MappedGrid {
    /// Shared, writable mapping (base is page-aligned, managed by memmap2)
    mmap: MmapMut,
    /// Payload offset inside the mapping
    offset: usize,
    rows: usize,
    cols: usize,
}

impl MappedGrid {
    /// Open and map a grid file
    ///
    /// Fails with `Format` for a bad header, an unsupported shape, or a file
    /// shorter than its header claims; with `Io` if it cannot be opened or mapped.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let file_len = file.metadata()?.len();

        let header = read_header(&mut BufReader::new(&file))?;
        let (rows, cols) = header.grid_dims()?;
        let cells = header.element_count()?;

        if cells == 0 {
            return Err(GridError::Format(format!(
                "empty grid ({} x {}) in {}",
                rows,
                cols,
                path.display()
            )));
        }

        let end = header.payload_offset.checked_add(cells).ok_or_else(|| {
            GridError::Format(format!(
                "shape {:?} in {} overflows the address space",
                header.shape,
                path.display()
            ))
        })?;
        if (end as u64) > file_len {
            return Err(GridError::Format(format!(
                "truncated payload in {}: expected {} bytes, file has {}",
                path.display(),
                end,
                file_len
            )));
        }

        // SAFETY: the file stays mapped only for the lifetime of this value and
        // the mapped range was checked against the file length above.
        let mmap = unsafe { MmapOptions::new().len(end).map_mut(&file)? };

        tracing::debug!(
            path = %path.display(),
            rows,
            cols,
            offset = header.payload_offset,
            "Mapped grid file"
        );

        Ok(Self {
            mmap,
            offset: header.payload_offset,
            rows,
            cols,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cells backed by the file
    pub fn cells(&self) -> &[u8] {
        &self.mmap[self.offset..]
    }

    /// Mutable cells; writes reach the file
    pub fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.mmap[self.offset..]
    }

    /// Flush outstanding writes to disk
    pub fn flush(&self) -> Result<()> {
        self.mmap.flush()?;
        Ok(())
    }

    /// Copy the cells into an owned grid
    pub fn to_grid(&self) -> Result<Grid> {
        Grid::from_cells(self.rows, self.cols, self.cells())
    }
}

impl Deref for MappedGrid {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.cells()
    }
}

impl DerefMut for MappedGrid {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.cells_mut()
    }
}

impl std::fmt::Debug for MappedGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedGrid")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("offset", &self.offset)
            .finish()
    }
}
