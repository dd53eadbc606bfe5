//! Shared workflow behind the `analyze`, `report` and `predict` commands.
//!
//! Keeping this in one place avoids duplicating the core steps:
//! CSV load -> normalize -> replace store -> read-only aggregate
//!
//! The app layer then only deals with presentation (printing, charts, exports).

use std::path::Path;

use crate::domain::{AggregateResults, AnalyzeConfig, Forecast, ForecastConfig};
use crate::error::AppError;
use crate::io::normalize::NormalizeReport;
use crate::store::Store;

/// All computed outputs of a single `ri analyze` run.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub report: NormalizeReport,
    pub stored: usize,
    pub results: AggregateResults,
}

/// Load the CSV, replace the store contents, then aggregate.
pub fn run_analysis(config: &AnalyzeConfig) -> Result<AnalysisOutput, AppError> {
    // 1) Read and type the input.
    let table = crate::io::load_csv(&config.csv_path)?;
    let normalized = crate::io::normalize(&table)?;

    // 2) Replace the stored order table. The writer is dropped before reading.
    let stored = {
        let mut store = Store::open_for_write(&config.db_path)?;
        store.replace_orders(&normalized.lines)?
    };

    // 3) Aggregate through a fresh read-only connection.
    let results = run_report(&config.db_path, config.top_n)?;

    Ok(AnalysisOutput {
        report: normalized.report,
        stored,
        results,
    })
}

/// Aggregate whatever the store currently holds.
pub fn run_report(db_path: &Path, top_n: usize) -> Result<AggregateResults, AppError> {
    let store = Store::open_read_only(db_path)?;
    let rows = store.row_count()?;
    log::info!("Aggregating {rows} order row(s) from {}", store.path().display());
    crate::analysis::aggregate(&store, top_n)
}

/// Forecast one item. The code is validated before the store is opened.
pub fn run_forecast(config: &ForecastConfig) -> Result<Forecast, AppError> {
    let code = crate::forecast::validate_stock_code(&config.stock_code)?;
    let store = Store::open_read_only(&config.db_path)?;
    crate::forecast::forecast(&store, code)
}
