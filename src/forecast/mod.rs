//! One-period-ahead sales forecast for a single item.
//!
//! The model is a straight line through the item's monthly quantities, with the
//! month index (`year * 12 + month`) as the only feature. The next month's
//! quantity is read off that line and priced at the last observed month's
//! average unit price.
//!
//! The predicted quantity is not clamped: a falling trend can yield a negative
//! estimate, and the revenue follows its sign.

use rusqlite::params;

use crate::domain::{Forecast, ItemMonth, YearMonth};
use crate::error::AppError;
use crate::math::fit_line;
use crate::store::Store;

const ITEM_MONTHLY_SERIES: &str = "
    SELECT strftime('%Y-%m', InvoiceDate) AS Month, SUM(Quantity) AS TotalSales, AVG(UnitPrice) AS AveragePrice
    FROM orders
    WHERE StockCode = ?1
    GROUP BY Month
    ORDER BY Month ASC";

/// Reject an empty item code before anything touches the store.
pub fn validate_stock_code(stock_code: &str) -> Result<&str, AppError> {
    let code = stock_code.trim();
    if code.is_empty() {
        return Err(AppError::validation("Please enter a product code."));
    }
    Ok(code)
}

/// Monthly quantity and average price for one item, oldest month first.
pub fn item_monthly_series(store: &Store, stock_code: &str) -> Result<Vec<ItemMonth>, AppError> {
    let query_error = |e: rusqlite::Error| AppError::query(format!("Item history query failed: {e}"));

    let mut stmt = store.conn().prepare(ITEM_MONTHLY_SERIES).map_err(query_error)?;
    let rows = stmt
        .query_map(params![stock_code], |row| {
            let month: String = row.get(0)?;
            let quantity: i64 = row.get(1)?;
            let average_price: f64 = row.get(2)?;
            Ok((month, quantity, average_price))
        })
        .map_err(query_error)?;

    let mut series = Vec::new();
    for row in rows {
        let (month, quantity, average_price) = row.map_err(query_error)?;
        let month = YearMonth::parse(&month)
            .ok_or_else(|| AppError::query(format!("Unexpected month key from store: '{month}'")))?;
        series.push(ItemMonth {
            month,
            quantity,
            average_price,
        });
    }

    log::debug!("Item {stock_code}: {} month(s) of history", series.len());
    Ok(series)
}

/// Fit the trend over an item's monthly history and extrapolate one month.
pub fn forecast_from_series(stock_code: &str, history: Vec<ItemMonth>) -> Result<Forecast, AppError> {
    let Some(last) = history.last() else {
        return Err(AppError::no_data(format!(
            "No sales data found for product: {stock_code}"
        )));
    };
    if history.len() < 2 {
        return Err(AppError::insufficient_data(format!(
            "Not enough data for regression: product {stock_code} has sales in {} only.",
            last.month
        )));
    }

    let xs: Vec<f64> = history.iter().map(|m| m.month.index() as f64).collect();
    let ys: Vec<f64> = history.iter().map(|m| m.quantity as f64).collect();

    let line = fit_line(&xs, &ys).ok_or_else(|| {
        AppError::insufficient_data(format!(
            "Not enough distinct months to fit a trend for product {stock_code}."
        ))
    })?;

    let target_month = last.month.next();
    let predicted_quantity = line.predict(target_month.index() as f64);
    let last_average_price = last.average_price;
    let estimated_revenue = predicted_quantity * last_average_price;

    Ok(Forecast {
        stock_code: stock_code.to_string(),
        history,
        slope: line.slope,
        intercept: line.intercept,
        target_month,
        predicted_quantity,
        last_average_price,
        estimated_revenue,
    })
}

/// Validate the code, read the item's history from the store and forecast.
pub fn forecast(store: &Store, stock_code: &str) -> Result<Forecast, AppError> {
    let code = validate_stock_code(stock_code)?;
    let history = item_monthly_series(store, code)?;
    forecast_from_series(code, history)
}
