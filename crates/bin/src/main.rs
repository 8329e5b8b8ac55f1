//! Carino CLI binary.
//!
//! Runs the whole pipeline in one pass: read the long-format returns CSV,
//! optionally restrict to one factor, apply the selected smoothing
//! aggregation, and write the table out.

use std::path::PathBuf;
use std::process;

use carino::{EngineConfig, ExportFormat, SmoothingEngine, export, read_returns_csv};
use clap::Parser;

#[derive(Parser)]
#[command(name = "carino")]
#[command(about = "Carino logarithmic smoothing for factor return series", long_about = None)]
#[command(version)]
struct Cli {
    /// Long-format input CSV with COUNTRY, REF_DATE, TOTAL columns
    input: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "smoothed.csv")]
    output: PathBuf,

    /// Aggregation granularity: "" (inception-to-date), Q, Y, or I
    #[arg(long, default_value = "")]
    period: String,

    /// Restrict to one factor (country/category); empty keeps all factors
    #[arg(long, default_value = "")]
    factor: String,

    /// Skip filtering and smoothing; emit the cleaned table unchanged
    #[arg(long)]
    raw: bool,

    /// Output format: csv, json, or pretty-json
    #[arg(long, default_value = "csv")]
    format: String,
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let format: ExportFormat = cli.format.parse()?;
    let config = if cli.raw {
        None
    } else {
        Some(EngineConfig::from_args(&cli.period, &cli.factor)?)
    };

    let table = read_returns_csv(&cli.input)?;
    let rows_in = table.n_rows();
    let table = SmoothingEngine::new(table, config).smooth();

    export(&table, &cli.output, format)?;
    println!(
        "wrote {} of {} factor rows, {} period columns, {} smoothed columns to {}",
        table.n_rows(),
        rows_in,
        table.n_periods(),
        table.smoothed_columns().len(),
        cli.output.display()
    );
    Ok(())
}
