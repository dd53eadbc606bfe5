//! Terminal charts for the aggregate result sets.

pub mod ascii;

pub use ascii::*;

use crate::domain::AggregateResults;
use crate::report::fmt_customer_id;

/// Render one chart per result set.
pub fn render_result_charts(results: &AggregateResults, width: usize, height: usize) -> String {
    let spenders: Vec<(String, f64)> = results
        .top_spenders
        .iter()
        .map(|r| (fmt_customer_id(r.customer_id), r.total_spent))
        .collect();
    let all_time: Vec<(String, f64)> = results
        .top_items_all_time
        .iter()
        .map(|r| (r.stock_code.clone(), r.total_sold as f64))
        .collect();
    let recent: Vec<(String, f64)> = results
        .top_items_recent_month
        .iter()
        .map(|r| (r.stock_code.clone(), r.total_sold as f64))
        .collect();
    let recent_title = match results.recent_month {
        Some(month) => format!("Top items by quantity ({month})"),
        None => "Top items by quantity (most recent month)".to_string(),
    };

    let mut out = String::new();
    out.push_str(&render_bar_chart("Top customers by total spend", &spenders, width));
    out.push('\n');
    out.push_str(&render_trend_chart(&results.sales_trend, width, height));
    out.push('\n');
    out.push_str(&render_bar_chart("Top items by quantity (all time)", &all_time, width));
    out.push('\n');
    out.push_str(&render_bar_chart(&recent_title, &recent, width));
    out
}
