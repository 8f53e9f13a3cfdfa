//! Cross-match CLI binary.
//!
//! Matches an observational plan CSV against an allocated-slots CSV and
//! writes the joined table with the actual observation windows appended.
//!
//! # Usage
//!
//! ```bash
//! crossmatch observational_plan.csv allocated_slots.csv actual_times.csv
//!
//! # With explicit tolerances
//! crossmatch plan.csv slots.csv out.csv --hour-tolerance 1.5 --day-tolerance 2
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crossmatch::core::domain::Tolerances;
use crossmatch::services::run_crossmatch;

#[derive(Parser, Debug)]
#[command(
    name = "crossmatch",
    about = "Match an observational plan against allocated slots and reconcile actual observation times"
)]
struct Args {
    /// Observational plan CSV (StartTime/StopTime columns)
    plan: PathBuf,
    /// Allocated slots CSV (startTime/stopTime columns)
    slots: PathBuf,
    /// Output CSV path
    output: PathBuf,
    /// Hour-of-day tolerance, in hours
    #[arg(long, default_value_t = 2.0)]
    hour_tolerance: f64,
    /// Calendar window tolerance, in days
    #[arg(long, default_value_t = 3)]
    day_tolerance: i64,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    let args = Args::parse();
    let tolerances = Tolerances {
        hours: args.hour_tolerance,
        days: args.day_tolerance,
    };

    let report = run_crossmatch(&args.plan, &args.slots, &args.output, &tolerances)?;
    info!(
        matched = report.matched,
        observations = report.observations,
        slots = report.slots,
        "Cross-match finished"
    );

    println!(
        "Actual observational times saved to {}",
        args.output.display()
    );
    Ok(())
}
