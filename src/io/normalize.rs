//! Row normalization: raw CSV records -> typed `OrderLine`s.
//!
//! Policy:
//! - required columns must exist in the header (otherwise the load fails)
//! - rows whose invoice date does not parse are dropped, never repaired
//! - rows whose quantity or unit price is not numeric are dropped as well,
//!   since the typed record has no way to hold them
//! - a non-numeric customer id becomes `None`
//!
//! The date is the only field checked for meaning. Quantity and unit price are
//! only checked for being numbers: negative quantities, zero prices and every
//! text field pass through unchanged. Dropping a row for a non-numeric quantity
//! or price, and nulling a non-numeric customer id, goes beyond a date-only
//! filter and is a property of the typed record, not of the source data.
//!
//! Dropping rows is not an error. Every dropped row is recorded in the
//! returned `NormalizeReport` so the count stays observable.

use std::collections::HashMap;
use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::domain::OrderLine;
use crate::error::AppError;
use crate::io::ingest::RawTable;

/// Header names (lowercased) of the columns the pipeline reads.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "invoiceno",
    "stockcode",
    "description",
    "quantity",
    "invoicedate",
    "unitprice",
    "customerid",
    "country",
];

/// Date-time layouts accepted for `InvoiceDate`, tried in order.
const DATETIME_FMTS: [&str; 5] = [
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts; these resolve to midnight.
const DATE_FMTS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

/// Years SQLite's `strftime` can group by.
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropReason {
    InvalidDate,
    InvalidQuantity,
    InvalidUnitPrice,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DropReason::InvalidDate => "invalid InvoiceDate",
            DropReason::InvalidQuantity => "invalid Quantity",
            DropReason::InvalidUnitPrice => "invalid UnitPrice",
        };
        f.write_str(label)
    }
}

/// A row dropped during normalization.
#[derive(Debug, Clone)]
pub struct RowError {
    /// 1-based line in the source file (header is line 1).
    pub line: usize,
    pub invoice_no: Option<String>,
    pub reason: DropReason,
    pub value: String,
}

/// What normalization kept and what it dropped.
#[derive(Debug, Clone, Default)]
pub struct NormalizeReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub dropped: Vec<RowError>,
}

impl NormalizeReport {
    pub fn drop_count(&self) -> usize {
        self.dropped.len()
    }

    /// Drop counts grouped by reason, in a stable order.
    pub fn drops_by_reason(&self) -> Vec<(DropReason, usize)> {
        let mut counts: HashMap<DropReason, usize> = HashMap::new();
        for row in &self.dropped {
            *counts.entry(row.reason).or_default() += 1;
        }
        [
            DropReason::InvalidDate,
            DropReason::InvalidQuantity,
            DropReason::InvalidUnitPrice,
        ]
        .into_iter()
        .filter_map(|reason| counts.get(&reason).map(|&n| (reason, n)))
        .collect()
    }
}

/// Normalized order lines plus the report describing what was dropped.
#[derive(Debug, Clone)]
pub struct NormalizedOrders {
    pub lines: Vec<OrderLine>,
    pub report: NormalizeReport,
}

/// Convert a raw table into typed order lines.
pub fn normalize(table: &RawTable) -> Result<NormalizedOrders, AppError> {
    let header_map = table.header_map();
    ensure_required_columns_exist(&header_map)?;

    let mut lines = Vec::with_capacity(table.len());
    let mut dropped = Vec::new();

    for (idx, record) in table.records.iter().enumerate() {
        // +2: records start after the header, and lines are 1-based.
        let line = idx + 2;
        match parse_row(record, &header_map) {
            Ok(order) => lines.push(order),
            Err((reason, value)) => {
                let invoice_no = get_field(record, &header_map, "invoiceno")
                    .filter(|s| !s.is_empty())
                    .map(str::to_string);
                log::debug!("Dropping line {line}: {reason} ({value:?})");
                dropped.push(RowError {
                    line,
                    invoice_no,
                    reason,
                    value,
                });
            }
        }
    }

    let report = NormalizeReport {
        rows_read: table.len(),
        rows_kept: lines.len(),
        dropped,
    };

    if report.drop_count() > 0 {
        log::info!(
            "Normalized {} of {} row(s); dropped {}",
            report.rows_kept,
            report.rows_read,
            report.drop_count()
        );
    } else {
        log::info!("Normalized {} row(s)", report.rows_kept);
    }

    Ok(NormalizedOrders { lines, report })
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| !header_map.contains_key(*name))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    Err(AppError::load(format!(
        "Missing required column(s): {}",
        missing.join(", ")
    )))
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<OrderLine, (DropReason, String)> {
    let text = |name: &str| get_field(record, header_map, name).unwrap_or_default().to_string();

    let raw_date = text("invoicedate");
    let invoice_date = parse_invoice_date(&raw_date).ok_or((DropReason::InvalidDate, raw_date))?;

    let raw_quantity = text("quantity");
    let quantity = parse_quantity(&raw_quantity).ok_or((DropReason::InvalidQuantity, raw_quantity))?;

    let raw_price = text("unitprice");
    let unit_price = parse_finite(&raw_price).ok_or((DropReason::InvalidUnitPrice, raw_price))?;

    Ok(OrderLine {
        invoice_no: text("invoiceno"),
        stock_code: text("stockcode"),
        description: text("description"),
        quantity,
        invoice_date,
        unit_price,
        customer_id: parse_finite(&text("customerid")),
        country: text("country"),
    })
}

fn get_field<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim)
}

/// Parse an invoice timestamp in any of the accepted layouts.
///
/// Years outside `0..=9999` are rejected: chrono's `%Y` takes signed years of
/// any width, but the store's date functions only handle four-digit years.
pub fn parse_invoice_date(s: &str) -> Option<NaiveDateTime> {
    parse_any_layout(s).filter(|dt| STORABLE_YEARS.contains(&dt.year()))
}

fn parse_any_layout(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn parse_quantity(s: &str) -> Option<i64> {
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    // Spreadsheet round-trips sometimes turn `6` into `6.0`.
    let v = parse_finite(s)?;
    (v.fract() == 0.0 && v.abs() < i64::MAX as f64).then_some(v as i64)
}

fn parse_finite(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::parse_csv;

    const HEADER: &str = "InvoiceNo,StockCode,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country\n";

    fn table(rows: &str) -> RawTable {
        parse_csv(&format!("{HEADER}{rows}")).unwrap()
    }

    #[test]
    fn unparseable_date_drops_only_that_row() {
        let t = table(concat!(
            "536365,85123A,WHITE HANGING HEART,6,12/1/2010 8:26,2.55,17850,United Kingdom\n",
            "536366,22633,HAND WARMER,6,not a date,1.85,17850,United Kingdom\n",
        ));
        let out = normalize(&t).unwrap();
        assert_eq!(out.lines.len(), 1);
        assert_eq!(out.report.rows_read, 2);
        assert_eq!(out.report.drop_count(), 1);
        assert_eq!(out.report.dropped[0].line, 3);
        assert_eq!(out.report.dropped[0].reason, DropReason::InvalidDate);
        assert_eq!(out.report.dropped[0].invoice_no.as_deref(), Some("536366"));
    }

    #[test]
    fn fields_are_typed_and_customer_may_be_null() {
        let t = table("C536379,D,Discount,-1,2010-12-01 09:41:00,27.5,,United Kingdom\n");
        let out = normalize(&t).unwrap();
        let line = &out.lines[0];
        assert_eq!(line.invoice_no, "C536379");
        assert_eq!(line.quantity, -1);
        assert_eq!(line.customer_id, None);
        assert!((line.unit_price - 27.5).abs() < 1e-12);
    }

    #[test]
    fn non_numeric_quantity_and_price_are_dropped_with_reason() {
        let t = table(concat!(
            "1,A,x,many,12/1/2010 8:26,1.0,1,UK\n",
            "2,B,x,3,12/1/2010 8:26,free,1,UK\n",
            "3,C,x,3.0,12/1/2010 8:26,1.5,1,UK\n",
        ));
        let out = normalize(&t).unwrap();
        assert_eq!(out.lines.len(), 1);
        assert_eq!(out.lines[0].quantity, 3);
        assert_eq!(
            out.report.drops_by_reason(),
            vec![(DropReason::InvalidQuantity, 1), (DropReason::InvalidUnitPrice, 1)]
        );
    }

    #[test]
    fn missing_column_is_a_load_error() {
        let t = parse_csv("InvoiceNo,StockCode\n1,A\n").unwrap();
        let err = normalize(&t).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Load);
        assert!(err.to_string().contains("invoicedate"));
    }

    #[test]
    fn output_never_exceeds_input() {
        let t = table(concat!(
            "1,A,x,1,12/1/2010 8:26,1.0,1,UK\n",
            "2,A,x,1,,1.0,1,UK\n",
            "3,A,x,1,13/45/2010 8:26,1.0,1,UK\n",
            "4,A,x,1,2011-01-05,1.0,1,UK\n",
        ));
        let out = normalize(&t).unwrap();
        assert!(out.lines.len() <= out.report.rows_read);
        assert_eq!(out.lines.len(), 2);
        assert_eq!(out.report.rows_kept + out.report.drop_count(), out.report.rows_read);
    }

    #[test]
    fn accepted_date_layouts() {
        for s in [
            "12/1/2010 8:26",
            "12/01/2010 08:26:30",
            "2010-12-01 08:26:00",
            "2010-12-01T08:26:00",
            "2010-12-01 08:26",
            "12/1/2010",
            "2010-12-01",
        ] {
            let dt = parse_invoice_date(s).unwrap_or_else(|| panic!("should parse {s}"));
            assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2010, 12, 1).unwrap());
        }
        assert!(parse_invoice_date("yesterday").is_none());
    }

    #[test]
    fn years_outside_four_digits_are_invalid_dates() {
        assert!(parse_invoice_date("1/1/+12345 8:26").is_none());
        assert!(parse_invoice_date("1/1/-0001 8:26").is_none());
        assert!(parse_invoice_date("+12345-01-01 08:26:00").is_none());
        assert!(parse_invoice_date("1/1/9999 8:26").is_some());

        let t = table(concat!(
            "1,A,x,1,12/1/2010 8:26,1.0,1,UK\n",
            "2,B,x,1,1/1/+12345 8:26,1.0,1,UK\n",
        ));
        let out = normalize(&t).unwrap();
        assert_eq!(out.lines.len(), 1);
        assert_eq!(out.report.dropped[0].reason, DropReason::InvalidDate);
        assert_eq!(out.report.dropped[0].value, "1/1/+12345 8:26");
    }
}
