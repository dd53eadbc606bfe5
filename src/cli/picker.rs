//! Interactive CSV picker.
//!
//! Kept separate from clap parsing: clap handles flags and subcommands, the
//! picker covers running `ri` with no file and choosing one from a list.
//!
//! The picker searches for `*.csv` files under the current working directory.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::{AppError, ErrorKind};

/// Default directory recursion depth for finding CSV files.
const DEFAULT_SEARCH_DEPTH: usize = 4;

/// Prompt the user to select a CSV file from the current directory tree.
///
/// Behavior:
/// - list discovered `*.csv` files
/// - accept either a number (from the list) or an explicit path
/// - `q` cancels
pub fn prompt_for_csv_path() -> Result<PathBuf, AppError> {
    let files = discover_csv_files(Path::new("."));
    if files.is_empty() {
        return Err(AppError::new(
            ErrorKind::Input,
            "No .csv files found. Provide one with `ri analyze -f <file.csv>`.",
        ));
    }

    println!("Found {} CSV file(s):", files.len());
    for (idx, path) in files.iter().enumerate() {
        println!("{:>3}) {}", idx + 1, pretty_path(path));
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        print!("Select a file by number (1-{}) or type a path (q to quit): ", files.len());
        io::stdout()
            .flush()
            .map_err(|e| AppError::new(ErrorKind::Input, format!("Failed to write prompt: {e}")))?;

        match read_choice(&mut input, &files)? {
            Choice::Picked(path) => return Ok(path),
            Choice::Retry(message) => println!("{message}"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Choice {
    Picked(PathBuf),
    Retry(String),
}

/// Read one answer from `input` and resolve it against the listed files.
fn read_choice(input: &mut impl BufRead, files: &[PathBuf]) -> Result<Choice, AppError> {
    let mut line = String::new();
    let bytes = input
        .read_line(&mut line)
        .map_err(|e| AppError::new(ErrorKind::Input, format!("Failed to read input: {e}")))?;

    if bytes == 0 {
        return Err(AppError::new(
            ErrorKind::Input,
            "No input received. Provide a CSV path with `ri analyze -f <file.csv>`.",
        ));
    }

    let answer = line.trim();
    if answer.eq_ignore_ascii_case("q") {
        return Err(AppError::new(ErrorKind::Input, "Canceled."));
    }

    if let Ok(choice) = answer.parse::<usize>() {
        if (1..=files.len()).contains(&choice) {
            return validate_csv_path(&files[choice - 1]).map(Choice::Picked);
        }
        return Ok(Choice::Retry(format!(
            "Invalid choice: {choice}. Enter a number between 1 and {}.",
            files.len()
        )));
    }

    match validate_csv_path(Path::new(answer)) {
        Ok(path) => Ok(Choice::Picked(path)),
        Err(err) => Ok(Choice::Retry(err.to_string())),
    }
}

/// Validate the provided path points to a `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::load(format!("CSV file not found: {}", path.display())));
    }
    if path.is_dir() {
        return Err(AppError::load(format!(
            "Expected a file, got a directory: {}",
            path.display()
        )));
    }
    if !has_csv_extension(path) {
        return Err(AppError::load(format!(
            "Expected a .csv file (got: {}). Use -f to pass a CSV path.",
            path.display()
        )));
    }

    Ok(path.to_path_buf())
}

/// Discover `*.csv` files under `root` (deterministic order).
pub fn discover_csv_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    find_csv_files_inner(root, 0, DEFAULT_SEARCH_DEPTH, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn find_csv_files_inner(root: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }

    let Ok(entries) = fs::read_dir(root) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if !should_skip_dir(&path) {
                find_csv_files_inner(&path, depth + 1, max_depth, out);
            }
            continue;
        }

        if file_type.is_file() && has_csv_extension(&path) {
            out.push(path);
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules")
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}
