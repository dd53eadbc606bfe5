//! Synthetic retail transaction CSV generation.
//!
//! Produces a deterministic (seeded) order-line file in the same shape and
//! encoding as a real retail export: Latin-1 text, `M/D/YYYY H:MM` dates, a
//! nullable CustomerID, occasional returns with negative quantity. A chosen
//! number of rows get an unparseable date so the drop path gets exercised.

use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::YearMonth;
use crate::error::{AppError, ErrorKind};
use crate::io::ingest::encode_latin1;

/// Share of lines with no customer id.
const GUEST_SHARE: f64 = 0.15;

/// Share of lines that are returns.
const RETURN_SHARE: f64 = 0.03;

const COUNTRIES: [&str; 6] = ["United Kingdom", "France", "Germany", "España", "Österreich", "Norway"];

const PRODUCTS: [&str; 12] = [
    "WHITE HANGING HEART T-LIGHT HOLDER",
    "CRÈME BRÛLÉE RAMEKIN",
    "CAFÉ AU LAIT MUG",
    "JUMBO BAG RED RETROSPOT",
    "PARTY BUNTING",
    "LUNCH BAG BLACK SKULL",
    "SMÖRGÅSBORD PLATTER",
    "REGENCY CAKESTAND 3 TIER",
    "NATURAL SLATE HEART CHALKBOARD",
    "PAPER CHAIN KIT 50'S CHRISTMAS",
    "PIÑATA DONKEY",
    "SET OF 3 CAKE TINS PANTRY DESIGN",
];

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub seed: u64,
    pub customers: usize,
    pub items: usize,
    pub start: YearMonth,
    pub months: usize,
    pub lines: usize,
    pub bad_dates: usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            customers: 40,
            items: 25,
            start: YearMonth { year: 2010, month: 12 },
            months: 12,
            lines: 2_000,
            bad_dates: 5,
        }
    }
}

/// One generated row, still as text.
#[derive(Debug, Clone)]
struct SampleRow {
    invoice_no: String,
    stock_code: String,
    description: String,
    quantity: i64,
    invoice_date: String,
    unit_price: f64,
    customer_id: Option<u32>,
    country: &'static str,
}

#[derive(Debug, Clone)]
struct Item {
    code: String,
    description: String,
    price: f64,
    /// Base monthly demand multiplier.
    popularity: f64,
    /// Per-month relative growth of demand.
    trend: f64,
}

/// Summary of a written sample file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSummary {
    pub rows: usize,
    pub bad_dates: usize,
}

/// Generate the sample CSV text (UTF-8; encode before writing).
pub fn generate_sample_csv(config: &SampleConfig) -> Result<(String, SampleSummary), AppError> {
    if config.customers == 0 || config.items == 0 || config.months == 0 {
        return Err(AppError::validation(
            "Sample needs at least one customer, one item and one month.",
        ));
    }
    if config.bad_dates > config.lines {
        return Err(AppError::validation("`--bad-dates` cannot exceed `--lines`."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(1.0, 0.25)
        .map_err(|e| AppError::validation(format!("Noise distribution error: {e}")))?;

    let items: Vec<Item> = (0..config.items).map(|i| make_item(&mut rng, i)).collect();
    let start_index = config.start.index();

    let mut rows = Vec::with_capacity(config.lines);
    for i in 0..config.lines {
        let month_offset = rng.gen_range(0..config.months);
        let month = YearMonth::from_index(start_index + month_offset as i64);
        let item = &items[rng.gen_range(0..items.len())];

        let demand = item.popularity * (1.0 + item.trend * month_offset as f64) * noise.sample(&mut rng);
        let mut quantity = demand.round().max(1.0) as i64;
        let is_return = rng.gen_bool(RETURN_SHARE);
        if is_return {
            quantity = -quantity;
        }

        let customer_id = (!rng.gen_bool(GUEST_SHARE))
            .then(|| 12_346 + rng.gen_range(0..config.customers) as u32);
        let invoice_prefix = if is_return { "C" } else { "" };

        rows.push(SampleRow {
            invoice_no: format!("{invoice_prefix}{}", 536_365 + i),
            stock_code: item.code.clone(),
            description: item.description.clone(),
            quantity,
            invoice_date: random_datetime(&mut rng, month)
                .format("%-m/%-d/%Y %-H:%M")
                .to_string(),
            unit_price: item.price,
            customer_id,
            country: COUNTRIES[rng.gen_range(0..COUNTRIES.len())],
        });
    }

    // Corrupt a deterministic subset of dates.
    let mut positions: Vec<usize> = (0..rows.len()).collect();
    positions.shuffle(&mut rng);
    for &pos in positions.iter().take(config.bad_dates) {
        rows[pos].invoice_date = "not-a-date".to_string();
    }

    let text = render_csv(&rows)?;
    let summary = SampleSummary {
        rows: rows.len(),
        bad_dates: config.bad_dates,
    };
    Ok((text, summary))
}

/// Generate a sample and write it Latin-1 encoded to `path`.
pub fn write_sample_csv(path: &Path, config: &SampleConfig) -> Result<SampleSummary, AppError> {
    let (text, summary) = generate_sample_csv(config)?;
    std::fs::write(path, encode_latin1(&text)).map_err(|e| {
        AppError::new(
            ErrorKind::Export,
            format!("Failed to write sample CSV '{}': {e}", path.display()),
        )
    })?;
    log::info!(
        "Wrote {} sample row(s) ({} with bad dates) to {}",
        summary.rows,
        summary.bad_dates,
        path.display()
    );
    Ok(summary)
}

fn make_item(rng: &mut StdRng, i: usize) -> Item {
    let base = PRODUCTS[i % PRODUCTS.len()];
    let description = if i < PRODUCTS.len() {
        base.to_string()
    } else {
        format!("{base} {}", i / PRODUCTS.len() + 1)
    };
    // Real stock codes are five digits, sometimes with a letter suffix.
    let suffix = if rng.gen_bool(0.3) { "A" } else { "" };
    let price_cents: u32 = rng.gen_range(29..=1_295);

    Item {
        code: format!("{}{suffix}", 20_000 + i * 137),
        description,
        price: f64::from(price_cents) / 100.0,
        popularity: rng.gen_range(2.0..24.0),
        trend: rng.gen_range(-0.05..0.08),
    }
}

fn random_datetime(rng: &mut StdRng, month: YearMonth) -> NaiveDateTime {
    let first = NaiveDate::from_ymd_opt(month.year, month.month, 1).unwrap_or_default();
    let next = month.next();
    let days_in_month = NaiveDate::from_ymd_opt(next.year, next.month, 1)
        .map(|d| (d - first).num_days())
        .unwrap_or(28);

    let day = rng.gen_range(0..days_in_month);
    let minute = rng.gen_range(8 * 60..20 * 60);
    first.and_hms_opt(0, 0, 0).unwrap_or_default() + Duration::days(day) + Duration::minutes(minute)
}

fn render_csv(rows: &[SampleRow]) -> Result<String, AppError> {
    let csv_error = |e: csv::Error| AppError::new(ErrorKind::Export, format!("Failed to render sample CSV: {e}"));

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "InvoiceNo",
            "StockCode",
            "Description",
            "Quantity",
            "InvoiceDate",
            "UnitPrice",
            "CustomerID",
            "Country",
        ])
        .map_err(csv_error)?;

    for r in rows {
        let quantity = r.quantity.to_string();
        let unit_price = format!("{:.2}", r.unit_price);
        let customer_id = r.customer_id.map(|c| format!("{c}.0")).unwrap_or_default();
        writer
            .write_record([
                r.invoice_no.as_str(),
                r.stock_code.as_str(),
                r.description.as_str(),
                quantity.as_str(),
                r.invoice_date.as_str(),
                unit_price.as_str(),
                customer_id.as_str(),
                r.country,
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::new(ErrorKind::Export, format!("Failed to render sample CSV: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::new(ErrorKind::Export, format!("Sample CSV is not valid text: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{decode_latin1, normalize, parse_csv};

    fn small() -> SampleConfig {
        SampleConfig {
            lines: 300,
            bad_dates: 7,
            ..SampleConfig::default()
        }
    }

    #[test]
    fn same_seed_same_file() {
        let (a, _) = generate_sample_csv(&small()).unwrap();
        let (b, _) = generate_sample_csv(&small()).unwrap();
        assert_eq!(a, b);

        let other = SampleConfig { seed: 7, ..small() };
        let (c, _) = generate_sample_csv(&other).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn bad_dates_are_exactly_the_dropped_rows() {
        let (text, summary) = generate_sample_csv(&small()).unwrap();
        // Round-trip through the Latin-1 encoding the loader expects.
        let decoded = decode_latin1(&encode_latin1(&text));
        let out = normalize(&parse_csv(&decoded).unwrap()).unwrap();

        assert_eq!(summary.rows, 300);
        assert_eq!(out.report.rows_read, 300);
        assert_eq!(out.report.drop_count(), 7);
        assert_eq!(out.lines.len(), 293);
    }

    #[test]
    fn dates_stay_within_the_requested_months() {
        let config = SampleConfig { bad_dates: 0, ..small() };
        let (text, _) = generate_sample_csv(&config).unwrap();
        let out = normalize(&parse_csv(&text).unwrap()).unwrap();

        let first = config.start.index();
        let last = first + config.months as i64 - 1;
        for line in &out.lines {
            let idx = YearMonth::of(&line.invoice_date).index();
            assert!((first..=last).contains(&idx), "{} out of range", line.invoice_date);
        }
    }

    #[test]
    fn rejects_impossible_configs() {
        let config = SampleConfig { items: 0, ..small() };
        assert_eq!(generate_sample_csv(&config).unwrap_err().kind(), ErrorKind::Validation);

        let config = SampleConfig { lines: 3, bad_dates: 4, ..small() };
        assert_eq!(generate_sample_csv(&config).unwrap_err().kind(), ErrorKind::Validation);
    }
}
