//! End-to-end runs of the load -> store -> aggregate -> forecast workflow.

use std::path::{Path, PathBuf};

use retail_insights::app::pipeline::{run_analysis, run_forecast, run_report};
use retail_insights::data::{SampleConfig, write_sample_csv};
use retail_insights::domain::{AnalyzeConfig, DisplayConfig, ForecastConfig, YearMonth};
use retail_insights::error::ErrorKind;
use retail_insights::io::encode_latin1;

const HEADER: &str = "InvoiceNo,StockCode,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country\n";

fn write_csv(dir: &Path, rows: &str) -> PathBuf {
    let path = dir.join("orders.csv");
    std::fs::write(&path, encode_latin1(&format!("{HEADER}{rows}"))).unwrap();
    path
}

fn analyze_config(csv_path: PathBuf, db_path: PathBuf) -> AnalyzeConfig {
    AnalyzeConfig {
        csv_path,
        db_path,
        top_n: 10,
        display: DisplayConfig {
            plot: false,
            plot_width: 60,
            plot_height: 15,
            export_dir: None,
        },
    }
}

fn forecast_config(db_path: &Path, code: &str) -> ForecastConfig {
    ForecastConfig {
        db_path: db_path.to_path_buf(),
        stock_code: code.to_string(),
        json: false,
    }
}

#[test]
fn bad_date_row_is_dropped_and_the_rest_is_stored() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(
        dir.path(),
        concat!(
            "536365,85123A,CRÈME MUG,6,12/1/2010 8:26,2.55,17850.0,United Kingdom\n",
            "536366,22633,HAND WARMER,6,31/31/2010 8:28,1.85,17850.0,United Kingdom\n",
        ),
    );
    let out = run_analysis(&analyze_config(csv, dir.path().join("t.db"))).unwrap();

    assert_eq!(out.report.rows_read, 2);
    assert_eq!(out.report.drop_count(), 1);
    assert_eq!(out.stored, 1);
    assert_eq!(out.results.top_items_all_time.len(), 1);
    assert_eq!(out.results.top_items_all_time[0].stock_code, "85123A");
}

#[test]
fn out_of_range_year_is_dropped_and_reports_still_run() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(
        dir.path(),
        concat!(
            "536365,85123A,MUG,6,12/1/2010 8:26,2.55,17850.0,United Kingdom\n",
            "536366,22633,HAND WARMER,6,1/1/+12345 8:26,1.85,17850.0,United Kingdom\n",
        ),
    );
    let db = dir.path().join("t.db");
    let out = run_analysis(&analyze_config(csv, db.clone())).unwrap();

    assert_eq!(out.report.drop_count(), 1);
    assert_eq!(out.stored, 1);
    assert_eq!(out.results.sales_trend.len(), 1);
    assert_eq!(out.results.recent_month, YearMonth::new(2010, 12));

    let again = run_report(&db, 10).unwrap();
    assert_eq!(again.sales_trend, out.results.sales_trend);
}

#[test]
fn reloading_replaces_instead_of_appending() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(
        dir.path(),
        concat!(
            "1,A,a,2,2021-01-05 10:00:00,1.5,1,UK\n",
            "2,B,b,3,2021-02-05 10:00:00,2.0,2,UK\n",
        ),
    );
    let config = analyze_config(csv, dir.path().join("t.db"));

    let first = run_analysis(&config).unwrap();
    let second = run_analysis(&config).unwrap();

    assert_eq!(second.stored, 2);
    assert_eq!(first.results.top_spenders, second.results.top_spenders);
    assert_eq!(first.results.sales_trend, second.results.sales_trend);
    assert_eq!(first.results.top_items_all_time, second.results.top_items_all_time);
    assert_eq!(first.results.top_items_recent_month, second.results.top_items_recent_month);
}

#[test]
fn sample_file_round_trips_through_every_report() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("sample.csv");
    let sample = SampleConfig {
        lines: 600,
        bad_dates: 3,
        ..SampleConfig::default()
    };
    write_sample_csv(&csv, &sample).unwrap();

    let db = dir.path().join("t.db");
    let out = run_analysis(&analyze_config(csv, db.clone())).unwrap();
    assert_eq!(out.report.drop_count(), 3);
    assert_eq!(out.stored, 597);

    let results = out.results;

    assert!(!results.top_spenders.is_empty() && results.top_spenders.len() <= 10);
    for pair in results.top_spenders.windows(2) {
        assert!(pair[0].total_spent >= pair[1].total_spent);
    }

    for pair in results.sales_trend.windows(2) {
        assert!(pair[0].month < pair[1].month);
    }
    let last_trend_month = results.sales_trend.last().unwrap().month;
    assert_eq!(results.recent_month, Some(last_trend_month));

    assert!(results.top_items_all_time.len() <= 10);
    assert!(!results.top_items_recent_month.is_empty());
    for pair in results.top_items_recent_month.windows(2) {
        assert!(pair[0].total_sold >= pair[1].total_sold);
    }

    // A report-only run reads the same store.
    let again = run_report(&db, 10).unwrap();
    assert_eq!(again.sales_trend, results.sales_trend);

    // The best seller has a sale in (nearly) every month, so it can be forecast.
    let code = results.top_items_all_time[0].stock_code.clone();
    let forecast = run_forecast(&forecast_config(&db, &code)).unwrap();
    assert_eq!(forecast.target_month, forecast.history.last().unwrap().month.next());
}

#[test]
fn forecast_follows_the_item_trend() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(
        dir.path(),
        concat!(
            "1,X1,x,4,1/10/2021 9:00,2.0,1,UK\n",
            "2,X1,x,6,1/20/2021 9:00,2.0,1,UK\n",
            "3,X1,x,20,2/3/2021 9:00,2.5,1,UK\n",
            "4,Y9,y,5,2/4/2021 9:00,1.0,2,UK\n",
        ),
    );
    let db = dir.path().join("t.db");
    run_analysis(&analyze_config(csv, db.clone())).unwrap();

    let f = run_forecast(&forecast_config(&db, " X1 ")).unwrap();
    assert_eq!(f.stock_code, "X1");
    assert_eq!(f.target_month, YearMonth::new(2021, 3).unwrap());
    assert!((f.predicted_quantity - 30.0).abs() < 1e-9);
    assert!((f.estimated_revenue - 75.0).abs() < 1e-9);

    let err = run_forecast(&forecast_config(&db, "Y9")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientData);

    let err = run_forecast(&forecast_config(&db, "NOPE")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoData);
    assert!(err.to_string().contains("NOPE"));
}

#[test]
fn empty_code_is_rejected_before_the_store_is_touched() {
    let dir = tempfile::tempdir().unwrap();
    let missing_db = dir.path().join("never-created.db");

    let err = run_forecast(&forecast_config(&missing_db, "   ")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(!missing_db.exists());
}

#[test]
fn reading_before_any_load_is_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("t.db");

    assert_eq!(run_report(&db, 10).unwrap_err().kind(), ErrorKind::NoData);
    assert_eq!(
        run_forecast(&forecast_config(&db, "X1")).unwrap_err().kind(),
        ErrorKind::NoData
    );
}

#[test]
fn missing_input_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = analyze_config(dir.path().join("absent.csv"), dir.path().join("t.db"));
    assert_eq!(run_analysis(&config).unwrap_err().kind(), ErrorKind::Load);
}
