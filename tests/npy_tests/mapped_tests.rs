//! Tests for memory-mapped grid loading
//!
//! These tests verify:
//! - Mapped cells match the file payload
//! - Writes through the mapping reach the file
//! - Shape, truncation and open failures are reported without a grid

use std::fs;
use std::path::PathBuf;

use gridlife::npy::{self, encode_header, save, save_grid, MappedGrid, HEADER_SIZE};
use gridlife::GridError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_grid(cells: &[u8], rows: usize, cols: usize) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("grid.npy");
    save_grid(&path, cells, rows, cols).unwrap();
    (temp_dir, path)
}

// =============================================================================
// Loading Tests
// =============================================================================

#[test]
fn test_load_maps_payload() {
    let cells = [0, 1, 0, 1, 1, 1, 0, 0, 0];
    let (_temp, path) = setup_temp_grid(&cells, 3, 3);

    let mapped = MappedGrid::open(&path).unwrap();

    assert_eq!(mapped.rows(), 3);
    assert_eq!(mapped.cols(), 3);
    assert_eq!(&mapped[..], &cells[..]);
    assert_eq!(mapped.len(), 9);
}

#[test]
fn test_load_rectangular_grid() {
    let cells: Vec<u8> = (0..10).map(|i| (i % 2) as u8).collect();
    let (_temp, path) = setup_temp_grid(&cells, 2, 5);

    let grid = npy::load(&path).unwrap().to_grid().unwrap();

    assert_eq!(grid.rows(), 2);
    assert_eq!(grid.cols(), 5);
    assert_eq!(grid.cells(), cells.as_slice());
}

#[test]
fn test_writes_through_mapping_reach_file() {
    let (_temp, path) = setup_temp_grid(&[0, 0, 0, 0], 2, 2);

    {
        let mut mapped = npy::load(&path).unwrap();
        mapped[3] = 1;
        mapped.flush().unwrap();
    }

    let raw = fs::read(&path).unwrap();
    assert_eq!(&raw[HEADER_SIZE..], &[0, 0, 0, 1]);
}

#[test]
fn test_mapping_ignores_trailing_bytes() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("trailing.npy");
    let mut bytes = encode_header(&[1, 2]).unwrap().to_vec();
    bytes.extend_from_slice(&[1, 0, 7, 7, 7]);
    fs::write(&path, bytes).unwrap();

    let mapped = npy::load(&path).unwrap();
    assert_eq!(mapped.cells(), &[1, 0]);
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_load_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.npy");

    match npy::load(&path) {
        Err(GridError::Io(_)) => {}
        other => panic!("Expected IO error, got {:?}", other),
    }
}

#[test]
fn test_load_truncated_payload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("short.npy");
    let mut bytes = encode_header(&[4, 4]).unwrap().to_vec();
    bytes.extend_from_slice(&[0u8; 10]);
    fs::write(&path, bytes).unwrap();

    match npy::load(&path) {
        Err(GridError::Format(msg)) => assert!(msg.contains("truncated")),
        other => panic!("Expected format error, got {:?}", other),
    }
}

#[test]
fn test_load_history_file_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("history.npy");
    let frames = [[0u8; 4], [1u8; 4]];
    save(&path, frames.iter().map(|f| &f[..]), 2, 2, 2).unwrap();

    match npy::load(&path) {
        Err(GridError::Format(_)) => {}
        other => panic!("Expected format error, got {:?}", other),
    }
}

#[test]
fn test_load_bad_magic() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.npy");
    let mut bytes = encode_header(&[2, 2]).unwrap().to_vec();
    bytes[0] = 0;
    bytes.extend_from_slice(&[0u8; 4]);
    fs::write(&path, bytes).unwrap();

    match npy::load(&path) {
        Err(GridError::Format(_)) => {}
        other => panic!("Expected format error, got {:?}", other),
    }
}

#[test]
fn test_load_overflowing_shape_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("huge.npy");
    let mut bytes = encode_header(&[usize::MAX]).unwrap().to_vec();
    bytes.extend_from_slice(&[0u8; 16]);
    fs::write(&path, bytes).unwrap();

    match npy::load(&path) {
        Err(GridError::Format(_)) => {}
        other => panic!("Expected format error, got {:?}", other),
    }
}

#[test]
fn test_load_empty_grid_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.npy");
    fs::write(&path, encode_header(&[0, 5]).unwrap()).unwrap();

    match npy::load(&path) {
        Err(GridError::Format(_)) => {}
        other => panic!("Expected format error, got {:?}", other),
    }
}
