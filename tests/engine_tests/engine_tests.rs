//! Tests for Engine
//!
//! These tests verify:
//! - Full load → simulate → save runs
//! - Output directory creation
//! - Config validation
//! - Failed loads leave no output behind

use std::path::PathBuf;

use gridlife::config::{Config, Execution};
use gridlife::engine::Engine;
use gridlife::npy::{self, load_frames, save_grid, HEADER_SIZE};
use gridlife::GridError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

/// Temp dir with a 5x5 blinker saved as `input.npy`
fn setup_blinker() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input.npy");
    let mut cells = vec![0u8; 25];
    cells[11..14].copy_from_slice(&[1, 1, 1]);
    save_grid(&input, &cells, 5, 5).unwrap();
    (temp_dir, input)
}

// =============================================================================
// Run Tests
// =============================================================================

#[test]
fn test_engine_run_writes_history() {
    let (temp_dir, input) = setup_blinker();
    let output = temp_dir.path().join("out.npy");

    let config = Config::builder()
        .iterations(3)
        .input_path(&input)
        .output_path(&output)
        .build();
    let report = Engine::new(config).unwrap().run().unwrap();

    assert_eq!(report.rows, 5);
    assert_eq!(report.cols, 5);
    assert_eq!(report.iterations, 3);
    assert_eq!(report.frames, 4);
    assert_eq!(report.bytes_written, (HEADER_SIZE + 4 * 25) as u64);

    let history = load_frames(&output).unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history.frame(0), history.frame(2));
    assert_eq!(history.frame(1), history.frame(3));
    assert_ne!(history.frame(0), history.frame(1));
}

#[test]
fn test_engine_leaves_input_untouched() {
    let (temp_dir, input) = setup_blinker();
    let before = std::fs::read(&input).unwrap();

    let config = Config::builder()
        .iterations(5)
        .input_path(&input)
        .output_path(temp_dir.path().join("out.npy"))
        .build();
    Engine::new(config).unwrap().run().unwrap();

    assert_eq!(std::fs::read(&input).unwrap(), before);
}

#[test]
fn test_engine_creates_output_directory() {
    let (temp_dir, input) = setup_blinker();
    let output = temp_dir.path().join("nested").join("dir").join("out.npy");

    let config = Config::builder()
        .input_path(&input)
        .output_path(&output)
        .build();
    Engine::new(config).unwrap().run().unwrap();

    assert!(output.exists());
}

#[test]
fn test_engine_parallel_matches_serial() {
    let (temp_dir, input) = setup_blinker();
    let serial_out = temp_dir.path().join("serial.npy");
    let parallel_out = temp_dir.path().join("parallel.npy");

    for (execution, output) in [
        (Execution::Serial, &serial_out),
        (Execution::Parallel { workers: 4 }, &parallel_out),
    ] {
        let config = Config::builder()
            .iterations(6)
            .execution(execution)
            .input_path(&input)
            .output_path(output)
            .build();
        Engine::new(config).unwrap().run().unwrap();
    }

    assert_eq!(
        std::fs::read(&serial_out).unwrap(),
        std::fs::read(&parallel_out).unwrap()
    );
}

#[test]
fn test_engine_simulate_without_saving() {
    let (temp_dir, input) = setup_blinker();
    let output = temp_dir.path().join("never.npy");

    let config = Config::builder()
        .iterations(2)
        .input_path(&input)
        .output_path(&output)
        .build();
    let (history, _elapsed) = Engine::new(config).unwrap().simulate().unwrap();

    assert_eq!(history.len(), 3);
    assert!(!output.exists());
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_engine_missing_input() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out.npy");

    let config = Config::builder()
        .input_path(temp_dir.path().join("absent.npy"))
        .output_path(&output)
        .build();

    match Engine::new(config).unwrap().run() {
        Err(GridError::Io(_)) => {}
        other => panic!("Expected IO error, got {:?}", other),
    }
    assert!(!output.exists());
}

#[test]
fn test_engine_malformed_input() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("bad.npy");
    let output = temp_dir.path().join("out.npy");
    let mut bytes = npy::encode_header(&[2, 2]).unwrap().to_vec();
    bytes[0] = b'X';
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    std::fs::write(&input, bytes).unwrap();

    let config = Config::builder()
        .input_path(&input)
        .output_path(&output)
        .build();

    match Engine::new(config).unwrap().run() {
        Err(GridError::Format(_)) => {}
        other => panic!("Expected format error, got {:?}", other),
    }
    assert!(!output.exists());
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.iterations, 3);
    assert_eq!(config.execution, Execution::Serial);
    assert_eq!(config.input_path, PathBuf::from("data/input.npy"));
    assert_eq!(config.output_path, PathBuf::from("output/out.npy"));
}

#[test]
fn test_config_rejects_zero_workers() {
    let config = Config::builder()
        .execution(Execution::Parallel { workers: 0 })
        .build();

    assert!(matches!(Engine::new(config), Err(GridError::Config(_))));
}

#[test]
fn test_engine_output_may_replace_input() {
    let (_temp_dir, input) = setup_blinker();

    let config = Config::builder()
        .iterations(2)
        .input_path(&input)
        .output_path(&input)
        .build();
    let report = Engine::new(config).unwrap().run().unwrap();

    let history = load_frames(&input).unwrap();
    assert_eq!(report.frames, 3);
    assert_eq!(history.len(), 3);
    assert_eq!(history.frame(0), history.frame(2));
}

#[test]
fn test_execution_with_workers() {
    assert_eq!(Execution::with_workers(0), Execution::Serial);
    assert_eq!(Execution::with_workers(1), Execution::Serial);
    assert_eq!(Execution::with_workers(6), Execution::Parallel { workers: 6 });
}
