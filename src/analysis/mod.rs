//! Aggregate queries over the `orders` relation.
//!
//! All queries are read-only. Ties on the metric are broken by the key in
//! ascending order so results are reproducible.

use rusqlite::params;

use crate::domain::{AggregateResults, CustomerSpend, ItemVolume, MonthlySales, YearMonth};
use crate::error::AppError;
use crate::store::Store;

const TOP_SPENDERS: &str = "
    SELECT CustomerID, SUM(UnitPrice * Quantity) AS TotalSpent
    FROM orders
    WHERE CustomerID IS NOT NULL
    GROUP BY CustomerID
    ORDER BY TotalSpent DESC, CustomerID ASC
    LIMIT ?1";

const SALES_TREND: &str = "
    SELECT strftime('%Y-%m', InvoiceDate) AS Month, SUM(UnitPrice * Quantity) AS MonthlySales
    FROM orders
    GROUP BY Month
    ORDER BY Month ASC";

const TOP_ITEMS_ALL_TIME: &str = "
    SELECT StockCode, SUM(Quantity) AS TotalSold
    FROM orders
    GROUP BY StockCode
    ORDER BY TotalSold DESC, StockCode ASC
    LIMIT ?1";

const RECENT_MONTH: &str = "
    SELECT strftime('%Y-%m', MAX(InvoiceDate)) AS RecentMonth
    FROM orders";

const TOP_ITEMS_FOR_MONTH: &str = "
    SELECT StockCode, SUM(Quantity) AS TotalSold
    FROM orders
    WHERE strftime('%Y-%m', InvoiceDate) = ?1
    GROUP BY StockCode
    ORDER BY TotalSold DESC, StockCode ASC
    LIMIT ?2";

/// Compute all four result sets.
pub fn aggregate(store: &Store, top_n: usize) -> Result<AggregateResults, AppError> {
    let top_spenders = top_spenders(store, top_n)?;
    let sales_trend = sales_trend(store)?;
    let top_items_all_time = top_items_all_time(store, top_n)?;
    let recent_month = recent_month(store)?;
    let top_items_recent_month = match recent_month {
        Some(month) => top_items_for_month(store, month, top_n)?,
        None => Vec::new(),
    };

    log::debug!(
        "Aggregated: {} spender(s), {} month(s), {} item(s), {} recent item(s)",
        top_spenders.len(),
        sales_trend.len(),
        top_items_all_time.len(),
        top_items_recent_month.len()
    );

    Ok(AggregateResults {
        top_spenders,
        sales_trend,
        top_items_all_time,
        recent_month,
        top_items_recent_month,
    })
}

/// Customers ranked by total spend (`UnitPrice * Quantity`), null customers excluded.
pub fn top_spenders(store: &Store, top_n: usize) -> Result<Vec<CustomerSpend>, AppError> {
    let mut stmt = store.conn().prepare(TOP_SPENDERS).map_err(query_error)?;
    let rows = stmt
        .query_map(params![limit(top_n)], |row| {
            Ok(CustomerSpend {
                customer_id: row.get(0)?,
                total_spent: row.get(1)?,
            })
        })
        .map_err(query_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(query_error)
}

/// Total sales per calendar month, oldest first.
///
/// An empty result means there is nothing to show; it is not an error.
pub fn sales_trend(store: &Store) -> Result<Vec<MonthlySales>, AppError> {
    let mut stmt = store.conn().prepare(SALES_TREND).map_err(query_error)?;
    let rows = stmt
        .query_map([], |row| {
            let month: String = row.get(0)?;
            let sales: f64 = row.get(1)?;
            Ok((month, sales))
        })
        .map_err(query_error)?;

    let mut out = Vec::new();
    for row in rows {
        let (month, sales) = row.map_err(query_error)?;
        out.push(MonthlySales {
            month: parse_month(&month)?,
            sales,
        });
    }
    Ok(out)
}

/// Items ranked by total quantity sold over the whole table.
pub fn top_items_all_time(store: &Store, top_n: usize) -> Result<Vec<ItemVolume>, AppError> {
    let mut stmt = store.conn().prepare(TOP_ITEMS_ALL_TIME).map_err(query_error)?;
    let rows = stmt
        .query_map(params![limit(top_n)], item_volume)
        .map_err(query_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(query_error)
}

/// Month of the latest invoice date, or `None` for an empty table.
pub fn recent_month(store: &Store) -> Result<Option<YearMonth>, AppError> {
    let month: Option<String> = store
        .conn()
        .query_row(RECENT_MONTH, [], |row| row.get(0))
        .map_err(query_error)?;
    month.as_deref().map(parse_month).transpose()
}

/// Items ranked by quantity sold within a single month.
pub fn top_items_for_month(store: &Store, month: YearMonth, top_n: usize) -> Result<Vec<ItemVolume>, AppError> {
    let mut stmt = store.conn().prepare(TOP_ITEMS_FOR_MONTH).map_err(query_error)?;
    let rows = stmt
        .query_map(params![month.to_string(), limit(top_n)], item_volume)
        .map_err(query_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(query_error)
}

fn item_volume(row: &rusqlite::Row<'_>) -> rusqlite::Result<ItemVolume> {
    Ok(ItemVolume {
        stock_code: row.get(0)?,
        total_sold: row.get(1)?,
    })
}

fn limit(top_n: usize) -> i64 {
    i64::try_from(top_n).unwrap_or(i64::MAX)
}

fn parse_month(s: &str) -> Result<YearMonth, AppError> {
    YearMonth::parse(s).ok_or_else(|| AppError::query(format!("Unexpected month key from store: '{s}'")))
}

fn query_error(e: rusqlite::Error) -> AppError {
    AppError::query(format!("Aggregate query failed: {e}"))
}
