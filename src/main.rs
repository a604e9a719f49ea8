//! Java source line counter.
//!
//! Walks a directory tree, classifies every line of each `.java` file as code,
//! comment or blank, and prints the three totals.

use clap::{ArgAction, Parser};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use colored::*;

mod classify;
mod error;
mod metrics;
mod reader;
mod report;
mod scan;
mod totals;

use error::{CountError, Result};
use metrics::PerformanceMetrics;
use scan::{count_tree, ScanOptions, DEFAULT_EXTENSION, DEFAULT_MAX_DEPTH};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Counts code, comment and blank lines in a source tree",
    long_about = "Counts code, comment and blank lines across every file with the given extension (Java by default). Lines are classified with C-family comment rules: // line comments, /* */ block comments, string and character literals."
)]
struct Args {
    /// Directory to scan
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// File extension to count, with or without the leading dot
    #[arg(short, long, default_value = DEFAULT_EXTENSION)]
    ext: String,

    /// Directory name to skip (repeatable)
    #[arg(short, long, action = ArgAction::Append)]
    ignore: Vec<String>,

    /// Print counts for every file before the totals
    #[arg(short, long)]
    verbose: bool,

    #[arg(short = 'd', long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[arg(short = 'n', long)]
    non_recursive: bool,

    /// Glob matched against the file name or root-relative path
    #[arg(short = 'f', long)]
    filespec: Option<String>,

    /// Worker threads (0 = one per core)
    #[arg(short = 'j', long, default_value_t = 0)]
    jobs: usize,

    /// Print timing and throughput to stderr
    #[arg(long)]
    stats: bool,
}

impl Args {
    fn scan_options(&self) -> Result<ScanOptions> {
        ScanOptions {
            ignore: self.ignore.clone(),
            max_depth: self.max_depth,
            non_recursive: self.non_recursive,
            jobs: self.jobs,
            ..ScanOptions::default()
        }
        .with_extension(&self.ext)
        .with_filespec(self.filespec.as_deref())
    }
}

fn main() -> ExitCode {
    match run_with_args(env::args_os()) {
        Ok(report) => {
            print!("{}", report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err.to_string().red());
            if matches!(err, CountError::MissingArgument) {
                eprintln!("Usage: {} <PATH>", env!("CARGO_PKG_NAME"));
            }
            ExitCode::FAILURE
        }
    }
}

fn run_with_args<I, T>(args: I) -> Result<String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = Args::parse_from(args);
    let metrics = PerformanceMetrics::new(args.stats);
    run_cli_with_metrics(args, &metrics)
}

/// Runs a scan and returns the stdout report. Per-file failures and warnings
/// go to stderr; path and traversal errors are returned.
fn run_cli_with_metrics(args: Args, metrics: &PerformanceMetrics) -> Result<String> {
    let path = args.path.as_deref().ok_or(CountError::MissingArgument)?;
    if !path.is_dir() {
        return Err(CountError::InvalidPath(path.to_path_buf()));
    }
    let options = args.scan_options()?;

    let outcome = count_tree(path, &options, metrics)?;
    for failure in &outcome.failures {
        eprintln!("{}", failure);
    }
    metrics.print_final_stats();

    if !outcome.failures.is_empty() {
        eprintln!(
            "{}: {} file(s) could not be read",
            "Warning".red().bold(),
            outcome.failures.len()
        );
    }
    if outcome.warnings > 0 {
        eprintln!(
            "{}: {} director(ies) skipped at maximum depth",
            "Warning".red().bold(),
            outcome.warnings
        );
    }

    Ok(report::build_report(&outcome, args.verbose))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::tests::CaptureWriter;
    use colored::control;
    use std::fs;
    use std::io;
    use std::path::Path;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Args {
        Args::parse_from(std::iter::once("jloc").chain(args.iter().copied()))
    }

    fn path_arg(path: &Path) -> &str {
        path.to_str().expect("temp dir path should be valid UTF-8")
    }

    fn test_metrics() -> PerformanceMetrics {
        PerformanceMetrics::with_writer(Box::new(io::sink()), false)
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert!(args.path.is_none());
        assert_eq!(args.ext, "java");
        assert_eq!(args.max_depth, 100);
        assert_eq!(args.jobs, 0);
        assert!(!args.verbose && !args.non_recursive && !args.stats);
    }

    #[test]
    fn test_missing_path_is_reported() {
        let err = run_cli_with_metrics(parse(&[]), &test_metrics())
            .expect_err("missing path should fail");
        assert!(matches!(err, CountError::MissingArgument));
        assert_eq!(err.to_string(), "Please provide a directory path.");
    }

    #[test]
    fn test_invalid_path_is_reported() -> io::Result<()> {
        let temp_dir = TempDir::new()?;
        let missing = temp_dir.path().join("missing");
        let err = run_cli_with_metrics(parse(&[path_arg(&missing)]), &test_metrics())
            .expect_err("missing directory should fail");
        assert!(matches!(err, CountError::InvalidPath(_)));
        assert!(err.to_string().starts_with("Invalid directory path:"));
        Ok(())
    }

    #[test]
    fn test_path_errors_take_precedence_over_filespec() -> io::Result<()> {
        let temp_dir = TempDir::new()?;
        let missing = temp_dir.path().join("missing");
        let err = run_cli_with_metrics(
            parse(&[path_arg(&missing), "--filespec", "["]),
            &test_metrics(),
        )
        .expect_err("missing directory should fail");
        assert!(matches!(err, CountError::InvalidPath(_)));

        let err = run_cli_with_metrics(
            parse(&[path_arg(temp_dir.path()), "--filespec", "["]),
            &test_metrics(),
        )
        .expect_err("bad pattern should fail");
        assert!(matches!(err, CountError::InvalidFilespec { .. }));
        Ok(())
    }

    #[test]
    fn test_run_reports_totals() -> io::Result<()> {
        control::set_override(false);
        let temp_dir = TempDir::new()?;
        fs::write(
            temp_dir.path().join("App.java"),
            "/*\n * App.\n */\npublic class App {\n\n    String s = \"/* no */\"; // yes\n}\n",
        )?;
        fs::write(temp_dir.path().join("README.md"), "# App\n\nDocs.\n")?;

        let report = run_cli_with_metrics(parse(&[path_arg(temp_dir.path())]), &test_metrics())
            .expect("scan should succeed");
        assert_eq!(report, "Code lines: 3\nComment lines: 4\nBlank lines: 1\n");
        Ok(())
    }

    #[test]
    fn test_run_with_stats_writes_summary() -> io::Result<()> {
        control::set_override(false);
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("A.java"), "class A {}\n")?;
        let capture = CaptureWriter::new();
        let metrics = PerformanceMetrics::with_writer(Box::new(capture.clone()), true);

        run_cli_with_metrics(parse(&[path_arg(temp_dir.path()), "--stats"]), &metrics)
            .expect("scan should succeed");
        let output = capture.contents();
        assert!(output.contains("files/sec"), "output: {output}");
        assert!(output.contains("Files processed: 1"), "output: {output}");
        Ok(())
    }

    #[test]
    fn test_run_with_args_parses_options() -> io::Result<()> {
        control::set_override(false);
        let temp_dir = TempDir::new()?;
        let sub = temp_dir.path().join("sub");
        fs::create_dir(&sub)?;
        fs::write(temp_dir.path().join("a.kt"), "fun a() {}\n")?;
        fs::write(sub.join("b.kt"), "// b\n")?;

        let report = run_with_args([
            "jloc",
            path_arg(temp_dir.path()),
            "--ext",
            ".kt",
            "--non-recursive",
        ])
        .expect("scan should succeed");
        assert_eq!(report, "Code lines: 1\nComment lines: 0\nBlank lines: 0\n");
        Ok(())
    }
}
