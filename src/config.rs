//! Configuration for gridlife
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{GridError, Result};

/// Main configuration for a simulation run
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Simulation Configuration
    // -------------------------------------------------------------------------
    /// Number of steps to simulate. The history holds `iterations + 1` frames.
    pub iterations: usize,

    /// How each step's cell sweep is executed
    pub execution: Execution,

    // -------------------------------------------------------------------------
    // File Configuration
    // -------------------------------------------------------------------------
    /// Input `.npy` file holding a 1-D or 2-D `u1` grid
    pub input_path: PathBuf,

    /// Output `.npy` file receiving the `(frames, rows, cols)` history
    pub output_path: PathBuf,
}

/// Execution strategy for the per-step sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    /// One sequential pass over every cell
    Serial,

    /// Contiguous chunks swept by `workers` scoped threads, joined every step
    Parallel { workers: usize },
}

impl Execution {
    /// Parallel execution sized to the machine, or serial on a single core
    pub fn available() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::with_workers(workers)
    }

    /// `1` worker means serial
    pub fn with_workers(workers: usize) -> Self {
        if workers <= 1 {
            Execution::Serial
        } else {
            Execution::Parallel { workers }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iterations: 3,
            execution: Execution::Serial,
            input_path: PathBuf::from("data/input.npy"),
            output_path: PathBuf::from("output/out.npy"),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject configurations that cannot run
    pub fn validate(&self) -> Result<()> {
        if let Execution::Parallel { workers: 0 } = self.execution {
            return Err(GridError::Config(
                "parallel execution needs at least one worker".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the number of steps to simulate
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.config.iterations = iterations;
        self
    }

    /// Set the execution strategy
    pub fn execution(mut self, execution: Execution) -> Self {
        self.config.execution = execution;
        self
    }

    /// Set the input array file
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.input_path = path.into();
        self
    }

    /// Set the output array file
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = path.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
