//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - passed between the loader, store, aggregator and forecaster
//! - exported to CSV/JSON
//! - rendered as tables and charts

use std::fmt;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDateTime};
use serde::{Serialize, Serializer};

/// Default store location, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "database.db";

/// Default number of rows kept by the ranked result sets.
pub const DEFAULT_TOP_N: usize = 10;

/// One normalized row of the source table.
///
/// Only `invoice_date` is guaranteed meaningful; text fields pass through as read.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub invoice_no: String,
    pub stock_code: String,
    pub description: String,
    /// Negative for returns.
    pub quantity: i64,
    pub invoice_date: NaiveDateTime,
    pub unit_price: f64,
    pub customer_id: Option<f64>,
    pub country: String,
}

/// A calendar month used as a grouping key (`YYYY-MM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based month.
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(dt: &NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
        }
    }

    /// Parse the `YYYY-MM` form produced by SQLite's `strftime('%Y-%m', ..)`.
    pub fn parse(s: &str) -> Option<Self> {
        let (year, month) = s.trim().split_once('-')?;
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    /// Continuous month index (`year * 12 + month`), one unit per calendar month.
    pub fn index(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month)
    }

    pub fn from_index(index: i64) -> Self {
        // Months are 1-based, so shift before dividing.
        let zero_based = index - 1;
        Self {
            year: zero_based.div_euclid(12) as i32,
            month: (zero_based.rem_euclid(12) + 1) as u32,
        }
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Total spend of one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSpend {
    pub customer_id: f64,
    pub total_spent: f64,
}

/// Total sales of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySales {
    pub month: YearMonth,
    pub sales: f64,
}

/// Total quantity sold of one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemVolume {
    pub stock_code: String,
    pub total_sold: i64,
}

/// The four derived result sets of one analysis run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateResults {
    pub top_spenders: Vec<CustomerSpend>,
    pub sales_trend: Vec<MonthlySales>,
    pub top_items_all_time: Vec<ItemVolume>,
    /// Latest month present in the store; `None` when the store is empty.
    pub recent_month: Option<YearMonth>,
    pub top_items_recent_month: Vec<ItemVolume>,
}

/// One month of history for a single item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemMonth {
    pub month: YearMonth,
    pub quantity: i64,
    pub average_price: f64,
}

/// One-period-ahead estimate for an item.
///
/// `predicted_quantity` is not clamped and may be negative.
#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub stock_code: String,
    pub history: Vec<ItemMonth>,
    /// Units per month.
    pub slope: f64,
    /// Intercept against the absolute month index.
    pub intercept: f64,
    pub target_month: YearMonth,
    pub predicted_quantity: f64,
    /// Average unit price of the last observed month.
    pub last_average_price: f64,
    pub estimated_revenue: f64,
}

/// Display options shared by `analyze` and `report`.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_dir: Option<PathBuf>,
}

/// Configuration of a load-and-analyze run.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    pub top_n: usize,
    pub display: DisplayConfig,
}

/// Configuration of a forecast request.
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    pub db_path: PathBuf,
    pub stock_code: String,
    pub json: bool,
}
