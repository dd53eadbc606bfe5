//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the load/aggregate/forecast pipeline
//! - prints reports and charts
//! - writes optional exports

use clap::Parser;
use env_logger::Env;

use crate::cli::{AnalyzeArgs, Command, DisplayArgs, PredictArgs, ReportArgs, SampleArgs};
use crate::data::SampleConfig;
use crate::domain::{AggregateResults, AnalyzeConfig, DisplayConfig, ForecastConfig, YearMonth};
use crate::error::{AppError, ErrorKind};

pub mod pipeline;

/// Entry point for the `ri` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine; RI_DB_PATH and RUST_LOG may come from the shell.
    dotenvy::dotenv().ok();
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .try_init();

    // `ri` and `ri -f orders.csv` behave like `ri analyze ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Report(args) => handle_report(args),
        Command::Predict(args) => handle_predict(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let csv_path = match args.csv {
        Some(path) => path,
        None => crate::cli::picker::prompt_for_csv_path()?,
    };
    let config = AnalyzeConfig {
        csv_path,
        db_path: args.store.db_path,
        top_n: args.display.top,
        display: display_config_from_args(&args.display),
    };

    let run = pipeline::run_analysis(&config)?;

    println!(
        "{}",
        crate::report::format_load_summary(&config.csv_path.display().to_string(), &run.report, run.stored)
    );
    present_results(&run.results, &config.display)
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let display = display_config_from_args(&args.display);
    let results = pipeline::run_report(&args.store.db_path, args.display.top)?;
    present_results(&results, &display)
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = ForecastConfig {
        db_path: args.store.db_path,
        stock_code: args.stock_code,
        json: args.json,
    };
    let forecast = pipeline::run_forecast(&config)?;

    if config.json {
        let json = serde_json::to_string_pretty(&forecast)
            .map_err(|e| AppError::new(ErrorKind::Export, format!("Failed to encode forecast: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", crate::report::format_forecast(&forecast));
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let start = YearMonth::parse(&args.start).ok_or_else(|| {
        AppError::validation(format!("Invalid --start month '{}'; expected YYYY-MM.", args.start))
    })?;
    let config = SampleConfig {
        seed: args.seed,
        customers: args.customers,
        items: args.items,
        start,
        months: args.months,
        lines: args.lines,
        bad_dates: args.bad_dates,
    };

    let summary = crate::data::write_sample_csv(&args.out, &config)?;
    println!(
        "Wrote {} row(s) to {} ({} with an invalid date).",
        summary.rows,
        args.out.display(),
        summary.bad_dates
    );
    Ok(())
}

fn present_results(results: &AggregateResults, display: &DisplayConfig) -> Result<(), AppError> {
    println!("{}", crate::report::format_results(results));

    if display.plot {
        println!(
            "{}",
            crate::plot::render_result_charts(results, display.plot_width, display.plot_height)
        );
    }

    if let Some(dir) = &display.export_dir {
        let written = crate::io::export::write_results(dir, results)?;
        for path in written {
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

pub fn display_config_from_args(args: &DisplayArgs) -> DisplayConfig {
    DisplayConfig {
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_dir: args.export.clone(),
    }
}

/// Rewrite argv so `ri` defaults to `ri analyze`.
///
/// Rules:
/// - `ri`                      -> `ri analyze`
/// - `ri -f orders.csv ...`    -> `ri analyze -f orders.csv ...`
/// - `ri --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("analyze".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "analyze" | "report" | "predict" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "analyze flags".
    if arg1.starts_with('-') {
        argv.insert(1, "analyze".to_string());
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_becomes_analyze() {
        assert_eq!(rewrite_args(argv(&["ri"])), argv(&["ri", "analyze"]));
    }

    #[test]
    fn leading_flag_becomes_analyze_flag() {
        assert_eq!(
            rewrite_args(argv(&["ri", "-f", "orders.csv"])),
            argv(&["ri", "analyze", "-f", "orders.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        for args in [
            argv(&["ri", "predict", "85123A"]),
            argv(&["ri", "report", "--top", "5"]),
            argv(&["ri", "--help"]),
            argv(&["ri", "-V"]),
        ] {
            assert_eq!(rewrite_args(args.clone()), args);
        }
    }

    #[test]
    fn rewritten_flags_parse() {
        let cli = crate::cli::Cli::try_parse_from(rewrite_args(argv(&["ri", "-f", "x.csv", "--no-plot"]))).unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert!(!display_config_from_args(&args.display).plot);
    }
}
