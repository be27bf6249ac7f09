//! Error types for gridlife
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using GridError
pub type Result<T> = std::result::Result<T, GridError>;

/// Unified error type for gridlife operations
#[derive(Debug, Error)]
pub enum GridError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Array File Errors
    // -------------------------------------------------------------------------
    #[error("Array format error: {0}")]
    Format(String),

    // -------------------------------------------------------------------------
    // Resource Errors
    // -------------------------------------------------------------------------
    #[error("Failed to allocate {bytes} bytes")]
    Allocation { bytes: usize },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
