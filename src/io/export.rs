//! Export aggregate results to CSV files and a JSON summary.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::AggregateResults;
use crate::error::{AppError, ErrorKind};

/// Write every result set into `dir`, creating it if needed.
///
/// Returns the paths written, in a fixed order.
pub fn write_results(dir: &Path, results: &AggregateResults) -> Result<Vec<PathBuf>, AppError> {
    create_dir_all(dir).map_err(|e| {
        AppError::new(
            ErrorKind::Export,
            format!("Failed to create export dir '{}': {e}", dir.display()),
        )
    })?;

    let written = vec![
        write_csv(&dir.join("top_spenders.csv"), &results.top_spenders)?,
        write_csv(&dir.join("sales_trend.csv"), &results.sales_trend)?,
        write_csv(&dir.join("top_items_all_time.csv"), &results.top_items_all_time)?,
        write_csv(&dir.join("top_items_recent_month.csv"), &results.top_items_recent_month)?,
        write_json(&dir.join("summary.json"), results)?,
    ];

    log::info!("Exported {} file(s) to {}", written.len(), dir.display());
    Ok(written)
}

/// Write serializable rows as CSV with a header row.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<PathBuf, AppError> {
    let export_error = |e: csv::Error| {
        AppError::new(
            ErrorKind::Export,
            format!("Failed to write export CSV '{}': {e}", path.display()),
        )
    };

    let mut writer = csv::Writer::from_path(path).map_err(export_error)?;
    for row in rows {
        writer.serialize(row).map_err(export_error)?;
    }
    writer.flush().map_err(|e| {
        AppError::new(
            ErrorKind::Export,
            format!("Failed to flush export CSV '{}': {e}", path.display()),
        )
    })?;

    Ok(path.to_path_buf())
}

/// Write any serializable value as pretty JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<PathBuf, AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            ErrorKind::Export,
            format!("Failed to create '{}': {e}", path.display()),
        )
    })?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| AppError::new(ErrorKind::Export, format!("Failed to write JSON: {e}")))?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ItemVolume, MonthlySales, YearMonth};

    #[test]
    fn writes_headers_and_month_keys() {
        let dir = tempfile::tempdir().unwrap();
        let results = AggregateResults {
            sales_trend: vec![MonthlySales { month: YearMonth::new(2011, 2).unwrap(), sales: 12.5 }],
            top_items_all_time: vec![ItemVolume { stock_code: "85123A".to_string(), total_sold: 7 }],
            ..AggregateResults::default()
        };

        let out = dir.path().join("exports");
        let written = write_results(&out, &results).unwrap();
        assert_eq!(written.len(), 5);

        let trend = std::fs::read_to_string(out.join("sales_trend.csv")).unwrap();
        assert_eq!(trend, "month,sales\n2011-02,12.5\n");

        let items = std::fs::read_to_string(out.join("top_items_all_time.csv")).unwrap();
        assert_eq!(items, "stock_code,total_sold\n85123A,7\n");

        let summary: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("summary.json")).unwrap()).unwrap();
        assert_eq!(summary["sales_trend"][0]["month"], "2011-02");
        assert!(summary["recent_month"].is_null());
    }
}
