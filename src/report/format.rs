//! Formatted terminal output: load summary, result tables, forecast message.
//!
//! We keep formatting code in one place so the query and forecasting code stay
//! free of presentation concerns.

use crate::domain::{AggregateResults, CustomerSpend, Forecast, ItemVolume, MonthlySales};
use crate::io::normalize::NormalizeReport;

/// Summary of a load: what was read, kept and dropped.
pub fn format_load_summary(source: &str, report: &NormalizeReport, stored: usize) -> String {
    let mut out = String::new();
    out.push_str("=== ri - Retail Insights ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!(
        "Rows: read={} kept={} dropped={} stored={stored}\n",
        report.rows_read,
        report.rows_kept,
        report.drop_count(),
    ));
    for (reason, n) in report.drops_by_reason() {
        out.push_str(&format!("  - {reason}: {n}\n"));
    }
    out
}

/// All four result tables.
pub fn format_results(results: &AggregateResults) -> String {
    let mut out = String::new();

    out.push_str("Top customers by total spend:\n");
    out.push_str(&format_spenders(&results.top_spenders));
    out.push('\n');

    out.push_str("Monthly sales trend:\n");
    if results.sales_trend.is_empty() {
        out.push_str("  (no sales trend data to show)\n");
    } else {
        out.push_str(&format_trend(&results.sales_trend));
    }
    out.push('\n');

    out.push_str("Top items by quantity (all time):\n");
    out.push_str(&format_items(&results.top_items_all_time));
    out.push('\n');

    match results.recent_month {
        Some(month) => out.push_str(&format!("Top items by quantity ({month}):\n")),
        None => out.push_str("Top items by quantity (most recent month):\n"),
    }
    out.push_str(&format_items(&results.top_items_recent_month));

    out
}

pub fn format_spenders(rows: &[CustomerSpend]) -> String {
    if rows.is_empty() {
        return "  (none)\n".to_string();
    }
    let mut out = table_header(&["customer", "total_spent"], &[12, 14]);
    for r in rows {
        out.push_str(&format!(
            "{:<12} {:>14.2}\n",
            fmt_customer_id(r.customer_id),
            r.total_spent
        ));
    }
    out
}

pub fn format_trend(rows: &[MonthlySales]) -> String {
    let mut out = table_header(&["month", "sales"], &[8, 14]);
    for r in rows {
        out.push_str(&format!("{:<8} {:>14.2}\n", r.month, r.sales));
    }
    out
}

pub fn format_items(rows: &[ItemVolume]) -> String {
    if rows.is_empty() {
        return "  (none)\n".to_string();
    }
    let mut out = table_header(&["stock_code", "total_sold"], &[12, 12]);
    for r in rows {
        out.push_str(&format!("{:<12} {:>12}\n", truncate(&r.stock_code, 12), r.total_sold));
    }
    out
}

/// Forecast message with two-decimal rounding.
pub fn format_forecast(forecast: &Forecast) -> String {
    format!(
        "Estimated Sales for '{}' ({}): {:.2}\nEstimated Total Income: ${:.2}\n",
        forecast.stock_code,
        forecast.target_month,
        forecast.predicted_quantity,
        forecast.estimated_revenue,
    )
}

/// Customer ids are stored as REAL; whole numbers print without a fraction.
pub fn fmt_customer_id(id: f64) -> String {
    if id.fract() == 0.0 && id.abs() < 1e15 {
        format!("{}", id as i64)
    } else {
        format!("{id}")
    }
}

fn table_header(names: &[&str], widths: &[usize]) -> String {
    let mut head = Vec::with_capacity(names.len());
    let mut rule = Vec::with_capacity(names.len());
    for (i, (name, &w)) in names.iter().zip(widths).enumerate() {
        if i == 0 {
            head.push(format!("{name:<w$}"));
        } else {
            head.push(format!("{name:>w$}"));
        }
        rule.push("-".repeat(w));
    }
    format!("{}\n{}\n", head.join(" "), rule.join(" "))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
