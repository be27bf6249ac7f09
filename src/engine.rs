//! Engine Module
//!
//! Runs one complete simulation job.
//!
//! ## Responsibilities
//! - Validate the configuration
//! - Load the initial grid (mapping released right after)
//! - Simulate the configured number of steps
//! - Persist the full history

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::Result;
use crate::grid::{GridStore, History};
use crate::simulation::Simulation;

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub rows: usize,
    pub cols: usize,
    /// Steps simulated
    pub iterations: usize,
    /// Frames written (`iterations + 1`)
    pub frames: usize,
    /// Size of the output file
    pub bytes_written: u64,
    /// Time spent stepping, excluding load and save
    pub elapsed: Duration,
}

/// Coordinates load, simulation and save for one config
pub struct Engine {
    config: Config,
    simulation: Simulation,
}

impl Engine {
    /// Create an engine, rejecting invalid configurations
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let simulation = Simulation::new(config.execution);
        Ok(Self { config, simulation })
    }

    /// Load, simulate and save
    ///
    /// Nothing is written if loading or allocation fails.
    pub fn run(&self) -> Result<RunReport> {
        let (history, elapsed) = self.simulate()?;

        let bytes_written = self.save(&history)?;

        let report = RunReport {
            rows: history.rows(),
            cols: history.cols(),
            iterations: self.config.iterations,
            frames: history.len(),
            bytes_written,
            elapsed,
        };

        tracing::info!(
            rows = report.rows,
            cols = report.cols,
            frames = report.frames,
            output = %self.config.output_path.display(),
            "Run complete"
        );

        Ok(report)
    }

    /// Load the input and simulate, returning the history and stepping time
    pub fn simulate(&self) -> Result<(History, Duration)> {
        let iterations = self.config.iterations;
        let mut store = GridStore::load(&self.config.input_path, iterations)?;

        tracing::info!(
            input = %self.config.input_path.display(),
            rows = store.rows(),
            cols = store.cols(),
            iterations,
            execution = ?self.simulation.execution(),
            "Starting simulation"
        );

        let start = Instant::now();
        self.simulation.advance(&mut store, iterations);
        let elapsed = start.elapsed();

        tracing::debug!(elapsed_us = elapsed.as_micros() as u64, "Simulation finished");

        Ok((store.into_history(), elapsed))
    }

    /// Write `history` to the configured output, creating its directory
    pub fn save(&self, history: &History) -> Result<u64> {
        let path = &self.config.output_path;
        ensure_parent_dir(path)?;
        history.save(path)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
