//! gridlife Binary
//!
//! Runs a simulation from an input array file and writes the history.

use std::path::PathBuf;

use clap::Parser;
use gridlife::npy;
use gridlife::units::{format_bytes, format_duration};
use gridlife::{Config, Engine, Execution};
use tracing_subscriber::{fmt, EnvFilter};

/// gridlife
#[derive(Parser, Debug)]
#[command(name = "gridlife")]
#[command(about = "Game of Life over .npy grids, saving every step")]
#[command(version)]
struct Args {
    /// Number of steps to simulate
    #[arg(short = 'n', long, default_value = "3", value_parser = clap::value_parser!(u64).range(1..))]
    iterations: u64,

    /// Input grid (.npy, 1-D or 2-D, uint8)
    #[arg(short, long, default_value = "data/input.npy")]
    input: PathBuf,

    /// Output history (.npy, shape (frames, rows, cols))
    #[arg(short, long, default_value = "output/out.npy")]
    output: PathBuf,

    /// Worker threads per step (1 = serial, default: all cores)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Print every saved frame to stdout
    #[arg(long)]
    print: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gridlife=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("gridlife v{}", gridlife::VERSION);

    let execution = match args.workers {
        Some(workers) => Execution::with_workers(workers),
        None => Execution::available(),
    };

    let config = Config::builder()
        .iterations(args.iterations as usize)
        .input_path(&args.input)
        .output_path(&args.output)
        .execution(execution)
        .build();

    let engine = match Engine::new(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let report = match engine.run() {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Time: {}", format_duration(report.elapsed));
    tracing::info!(
        "Wrote {} frames of {}x{} ({})",
        report.frames,
        report.rows,
        report.cols,
        format_bytes(report.bytes_written)
    );

    if args.print {
        if let Err(e) = print_frames(&args.output) {
            tracing::error!("Failed to print frames: {}", e);
            std::process::exit(1);
        }
    }
}

/// Render each frame of a saved history, blank line between frames
fn print_frames(path: &std::path::Path) -> gridlife::Result<()> {
    let history = npy::load_frames(path)?;
    for index in 0..history.len() {
        if let Some(grid) = history.grid(index) {
            println!("{}", grid);
        }
    }
    Ok(())
}
