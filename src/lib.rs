//! # gridlife
//!
//! Conway's Game of Life over fixed-size byte grids:
//! - Memory-mapped loading of `.npy` array files
//! - Bounded (non-wrapping) neighbor rule
//! - Serial or chunk-parallel stepping with a double buffer
//! - Full per-step history written back as one `.npy` file
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Engine                               │
//! │              (config → load → run → save)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  GridStore  │◄─────────│ Simulation  │
//!   │ (buffers +  │          │ (per-step   │
//!   │  history)   │          │   sweep)    │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          ▼                        ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  npy codec  │          │    rule     │
//!   │  (mmap I/O) │          │ (next_state)│
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod npy;
pub mod grid;
pub mod rule;
pub mod simulation;
pub mod engine;
pub mod units;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{GridError, Result};
pub use config::{Config, Execution};
pub use engine::{Engine, RunReport};
pub use grid::{Grid, GridStore, History};
pub use simulation::Simulation;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of gridlife
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
