use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use colored::*;

/// Throughput counters shared by the worker threads.
pub struct PerformanceMetrics {
    files_processed: AtomicU64,
    lines_processed: AtomicU64,
    start_time: Instant,
    writer: Mutex<Box<dyn Write + Send>>,
    enabled: bool,
}

impl PerformanceMetrics {
    pub fn new(enabled: bool) -> Self {
        PerformanceMetrics::with_writer(Box::new(io::stderr()), enabled)
    }

    pub fn with_writer(writer: Box<dyn Write + Send>, enabled: bool) -> Self {
        PerformanceMetrics {
            files_processed: AtomicU64::new(0),
            lines_processed: AtomicU64::new(0),
            start_time: Instant::now(),
            writer: Mutex::new(writer),
            enabled,
        }
    }

    pub fn update(&self, new_lines: u64) {
        self.files_processed.fetch_add(1, Ordering::Relaxed);
        self.lines_processed.fetch_add(new_lines, Ordering::Relaxed);
    }

    pub fn files_processed(&self) -> u64 {
        self.files_processed.load(Ordering::Relaxed)
    }

    pub fn lines_processed(&self) -> u64 {
        self.lines_processed.load(Ordering::Relaxed)
    }

    pub fn print_final_stats(&self) {
        if !self.enabled {
            return;
        }

        let elapsed = self.start_time.elapsed().as_secs_f64();
        let files = self.files_processed();
        let lines = self.lines_processed();

        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        let _ = writeln!(writer, "{}", "Performance Summary:".blue().bold());
        let _ = writeln!(
            writer,
            "Total time: {} seconds",
            format!("{:.2}", elapsed).bright_yellow()
        );
        let _ = writeln!(
            writer,
            "Files processed: {} ({})",
            files.to_string().bright_yellow(),
            format!("{:.1} files/sec", safe_rate(files, elapsed)).bright_yellow()
        );
        let _ = writeln!(
            writer,
            "Lines processed: {} ({})",
            lines.to_string().bright_yellow(),
            format!("{:.1} lines/sec", safe_rate(lines, elapsed)).bright_yellow()
        );
        let _ = writer.flush();
    }
}

fn safe_rate(value: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= f64::EPSILON {
        0.0
    } else {
        value as f64 / elapsed_secs
    }
}
