//! Print the stability category of every configured station for the latest sounding time.
//!
//! # Usage
//!
//! ```bash
//! stability-report --data-dir soundings
//! stability-report --config stations.toml --time 2023101612
//! ```
//!
//! Logging is controlled with `RUST_LOG` (default: info).
use chrono::{NaiveDateTime, Utc};
use clap::Parser;
use sounding_stability::{
    latest_sounding_time, legend, map_view, run_with_config, table, Config, CsvDirectorySource,
    RetryingSource,
};
use std::{error::Error, path::PathBuf, process::ExitCode};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Convective stability report for a network of upper air stations.
#[derive(Parser, Debug)]
#[command(name = "stability-report")]
#[command(about = "Classify upper air soundings by convective stability", long_about = None)]
struct Args {
    /// Configuration file (TOML). Without one the Indonesian network is used.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the soundings, overrides the configuration.
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Sounding time as YYYYMMDDHH, defaults to the latest 00 or 12 UTC.
    #[arg(short, long)]
    time: Option<String>,

    /// Number of worker threads, overrides the configuration.
    #[arg(short, long)]
    workers: Option<usize>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(workers) = args.workers {
        config.workers = workers;
    }

    let data_dir = args
        .data_dir
        .or_else(|| config.data_dir.clone())
        .ok_or("no data directory, use --data-dir or set data_dir in the config")?;

    let time = match &args.time {
        Some(val) => parse_time(val)?,
        None => latest_sounding_time(Utc::now().naive_utc()),
    };

    info!(%time, data_dir = %data_dir.display(), "stability report");

    let source = RetryingSource::new(CsvDirectorySource::new(&data_dir), config.retry.policy());
    let results = run_with_config(&config, time, &source)?;

    println!("Stability for {}", time.format("%Y-%m-%d %H UTC"));
    println!();
    print!("{}", table(&results));

    if let Some(view) = map_view(&results) {
        println!();
        println!(
            "Map center: {:.2}, {:.2} (zoom {})",
            view.latitude, view.longitude, view.zoom
        );
    }

    println!();
    for entry in legend() {
        println!(
            "{:<7} {} ({})",
            entry.color,
            entry.label,
            entry.category.local_label()
        );
    }

    Ok(())
}

fn parse_time(val: &str) -> Result<NaiveDateTime, Box<dyn Error>> {
    let full = format!("{}00", val.trim());
    NaiveDateTime::parse_from_str(&full, "%Y%m%d%H%M")
        .map_err(|err| format!("invalid time '{}', expected YYYYMMDDHH: {}", val, err).into())
}
