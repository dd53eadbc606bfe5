//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - normalized order lines (`OrderLine`) and the month key (`YearMonth`)
//! - aggregate result rows (`CustomerSpend`, `MonthlySales`, `ItemVolume`)
//! - forecast outputs (`ItemMonth`, `Forecast`)
//! - run configuration (`AnalyzeConfig`, `ForecastConfig`)

pub mod types;

pub use types::*;
