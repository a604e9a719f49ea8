use std::fmt::Write as FmtWrite;

use colored::*;

use crate::scan::{FileReport, ScanOutcome};
use crate::totals::LineTotals;

/// Per-file breakdown printed in verbose mode.
pub fn format_file_report(report: &FileReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "File: {}", report.path.display());
    let _ = writeln!(output, "  Code lines: {}", report.totals.code_lines);
    let _ = writeln!(output, "  Comment lines: {}", report.totals.comment_lines);
    let _ = writeln!(output, "  Blank lines: {}", report.totals.blank_lines);
    let _ = writeln!(output, "  Total lines: {}", report.totals.total_lines);
    output
}

/// The three-line summary.
pub fn format_totals(totals: &LineTotals) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Code lines: {}",
        totals.code_lines.to_string().bright_yellow()
    );
    let _ = writeln!(
        output,
        "Comment lines: {}",
        totals.comment_lines.to_string().bright_yellow()
    );
    let _ = writeln!(
        output,
        "Blank lines: {}",
        totals.blank_lines.to_string().bright_yellow()
    );
    output
}

pub fn build_report(outcome: &ScanOutcome, verbose: bool) -> String {
    let mut output = String::new();
    if verbose {
        for report in &outcome.files {
            output.push_str(&format_file_report(report));
            output.push('\n');
        }
    }
    output.push_str(&format_totals(&outcome.totals));
    output
}
