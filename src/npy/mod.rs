//! Array File Module
//!
//! Reads and writes the `.npy` binary array format, restricted to unsigned
//! 8-bit, C-ordered arrays.
//!
//! ## Responsibilities
//! - Parse and validate headers (magic, version, dtype, order, shape)
//! - Memory-map 1-D/2-D grids for loading
//! - Stream 3-D `(frames, rows, cols)` histories to disk
//!
//! ## File Format (V1)
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Preamble (10 bytes)                                     │
//! │   Magic: "\x93NUMPY" (6) | Major (1) | Minor (1)        │
//! │   HeaderLen: u16 LE (2)                                 │
//! ├─────────────────────────────────────────────────────────┤
//! │ Descriptor (HeaderLen bytes)                            │
//! │   {'descr': '<u1', 'fortran_order': False,              │
//! │    'shape': (R, C[, D]), }                              │
//! │   space padded, last byte '\n'                          │
//! │   preamble + descriptor is a multiple of 16 (128 here)  │
//! ├─────────────────────────────────────────────────────────┤
//! │ Payload                                                 │
//! │   product(shape) bytes, row-major, no padding           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Versions 2.0 and 3.0 (u32 header length) are accepted on read.

mod header;
mod mapped;
mod reader;
mod writer;

pub use header::{encode_header, read_header, write_header, ArrayHeader};
pub use mapped::MappedGrid;
pub use reader::load_frames;
pub use writer::{save, save_grid, ArrayWriter};

use std::path::Path;

use crate::error::Result;

// =============================================================================
// Shared Constants (used by header, mapped, reader, writer)
// =============================================================================

/// Magic bytes identifying an array file
pub const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Version emitted by the writer
pub(crate) const VERSION: (u8, u8) = (1, 0);

/// Preamble size for version 1 files: Magic (6) + Version (2) + HeaderLen (2)
pub const PREAMBLE_SIZE: usize = 10;

/// Header size produced by the reference writer
pub const HEADER_SIZE: usize = 128;

/// Total header size is always padded to a multiple of this
pub const HEADER_ALIGNMENT: usize = 16;

/// Element type written to every descriptor
pub(crate) const DESCR: &str = "<u1";

/// Memory-map a 1-D or 2-D grid file (see [`MappedGrid::open`])
pub fn load(path: &Path) -> Result<MappedGrid> {
    MappedGrid::open(path)
}
