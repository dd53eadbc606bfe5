use std::process::ExitCode;

fn main() -> ExitCode {
    match retail_insights::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_informational() => {
            println!("{err}");
            ExitCode::from(err.exit_code())
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
