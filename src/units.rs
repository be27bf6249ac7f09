//! Human-readable sizes and durations
//!
//! Values are scaled to the largest unit they reach and shown with three
//! significant figures (`512 bytes`, `1.50 KiB`, `12.3 ms`).

use std::time::Duration;

const BYTE_UNITS: [&str; 4] = ["bytes", "KiB", "MiB", "GiB"];
const TIME_UNITS: [&str; 4] = ["ns", "us", "ms", "s"];

/// Format a byte count with binary prefixes
pub fn format_bytes(bytes: u64) -> String {
    with_unit(bytes as f64, 3, 1024.0, &BYTE_UNITS)
}

/// Format a duration from nanoseconds up to seconds
pub fn format_duration(duration: Duration) -> String {
    with_unit(duration.as_nanos() as f64, 3, 1000.0, &TIME_UNITS)
}

fn with_unit(mut value: f64, sigfigs: usize, step: f64, units: &[&str]) -> String {
    let mut unit = 0;
    while unit + 1 < units.len() && value >= step {
        value /= step;
        unit += 1;
    }

    let mut decimals = decimals_for(value, unit, sigfigs);

    // Rounding can carry into the next unit (999.96 us -> 1.00 ms)
    if unit + 1 < units.len() && round_to(value, decimals) >= step {
        value /= step;
        unit += 1;
        decimals = decimals_for(value, unit, sigfigs);
    }
    // ...or into the next decade (9.996 -> 10.0)
    decimals = decimals.min(decimals_for(round_to(value, decimals), unit, sigfigs));

    format!("{:.*} {}", decimals, value, units[unit])
}

fn decimals_for(value: f64, unit: usize, sigfigs: usize) -> usize {
    // Base units are whole numbers
    if unit == 0 {
        0
    } else if value < 10.0 {
        sigfigs - 1
    } else if value < 100.0 {
        sigfigs - 2
    } else {
        sigfigs.saturating_sub(3)
    }
}

fn round_to(value: f64, decimals: usize) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
