//! Command-line parsing for the retail analysis tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! loading, query and forecasting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_DB_PATH, DEFAULT_TOP_N};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ri", version, about = "Retail transaction analysis and sales forecasting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a CSV into the store, then print the aggregate reports.
    Analyze(AnalyzeArgs),
    /// Print the aggregate reports for the data already in the store.
    Report(ReportArgs),
    /// Forecast next month's sales for one product code.
    Predict(PredictArgs),
    /// Write a synthetic retail CSV for demos and testing.
    Sample(SampleArgs),
}

#[derive(Debug, Args, Clone)]
pub struct StoreArgs {
    /// SQLite store path.
    #[arg(long = "db", env = "RI_DB_PATH", default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct DisplayArgs {
    /// Rows kept in the ranked reports.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Disable the terminal charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Trend chart height (rows).
    #[arg(long, default_value_t = 15)]
    pub height: usize,

    /// Export the result sets (CSV + summary JSON) into this directory.
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    /// Input CSV (Latin-1). If omitted, pick one interactively.
    #[arg(short = 'f', long = "file")]
    pub csv: Option<PathBuf>,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub display: DisplayArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub display: DisplayArgs,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    /// Product (stock) code to forecast.
    #[arg(default_value = "")]
    pub stock_code: String,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Print the full forecast as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(short = 'o', long = "out")]
    pub out: PathBuf,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of distinct customers.
    #[arg(long, default_value_t = 40)]
    pub customers: usize,

    /// Number of distinct items.
    #[arg(long, default_value_t = 25)]
    pub items: usize,

    /// First month (YYYY-MM).
    #[arg(long, default_value = "2010-12")]
    pub start: String,

    /// Number of months covered.
    #[arg(long, default_value_t = 12)]
    pub months: usize,

    /// Number of order lines.
    #[arg(long, default_value_t = 2_000)]
    pub lines: usize,

    /// Number of lines written with an unparseable date.
    #[arg(long, default_value_t = 5)]
    pub bad_dates: usize,
}
