//! Directory traversal and per-file counting.
//!
//! The walk itself is sequential and fails fast: any directory that cannot be
//! read aborts the run. Matched files are then counted in parallel and their
//! sub-totals folded together, so the result does not depend on scheduling.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glob::Pattern;
use rayon::prelude::*;

use crate::classify::FileClassifier;
use crate::error::{CountError, Result};
use crate::metrics::PerformanceMetrics;
use crate::reader::{read_source_lines, SourceLines};
use crate::totals::LineTotals;

pub const DEFAULT_EXTENSION: &str = "java";
pub const DEFAULT_MAX_DEPTH: usize = 100;

const READ_DIR_FAIL_TAG: &str = "__jloc_read_dir_fail__";
const OPEN_FAIL_TAG: &str = "__jloc_open_fail__";
const FAULT_ENV_VAR: &str = "JLOC_ENABLE_FAULTS";

/// Which files to count and how far to descend.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Extension without the leading dot.
    pub extension: String,
    pub ignore: Vec<String>,
    pub max_depth: usize,
    pub non_recursive: bool,
    pub filespec: Option<Pattern>,
    /// Worker threads; 0 lets rayon decide.
    pub jobs: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            extension: DEFAULT_EXTENSION.to_string(),
            ignore: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            non_recursive: false,
            filespec: None,
            jobs: 0,
        }
    }
}

impl ScanOptions {
    /// Accepts `java` as well as `.java`.
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_filespec(mut self, spec: Option<&str>) -> Result<Self> {
        self.filespec = match spec {
            Some(spec) => Some(Pattern::new(spec).map_err(|source| {
                CountError::InvalidFilespec {
                    spec: spec.to_string(),
                    source,
                }
            })?),
            None => None,
        };
        Ok(self)
    }

    fn is_ignored_dir(&self, path: &Path) -> bool {
        self.ignore.iter().any(|dir| path.ends_with(Path::new(dir)))
    }

    fn selects(&self, root_path: &Path, file_path: &Path) -> bool {
        let Some(name) = file_path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        let suffix = format!(".{}", self.extension);
        if !name.ends_with(&suffix) {
            return false;
        }
        self.filespec
            .as_ref()
            .map(|pattern| filespec_matches(pattern, name, root_path, file_path))
            .unwrap_or(true)
    }
}

fn filespec_matches(pattern: &Pattern, name: &str, root_path: &Path, file_path: &Path) -> bool {
    if pattern.matches(name) {
        return true;
    }

    let Ok(relative) = file_path.strip_prefix(root_path) else {
        return false;
    };
    match relative.to_str() {
        Some(rel) => pattern.matches(&rel.replace('\\', "/")),
        None => false,
    }
}

/// Counts of one successfully read file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub totals: LineTotals,
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub totals: LineTotals,
    /// Successful files in path order.
    pub files: Vec<FileReport>,
    /// Files that could not be read, in path order. They add nothing to `totals`.
    pub failures: Vec<CountError>,
    pub warnings: usize,
}

fn failure_injection_enabled() -> bool {
    cfg!(test) || std::env::var_os(FAULT_ENV_VAR).is_some()
}

fn file_name_matches(path: &Path, predicate: impl Fn(&str) -> bool) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(predicate)
        .unwrap_or(false)
}

fn read_dir_stream(path: &Path) -> io::Result<fs::ReadDir> {
    if failure_injection_enabled() && file_name_matches(path, |name| name == READ_DIR_FAIL_TAG) {
        return Err(io::Error::other("simulated read_dir failure"));
    }
    fs::read_dir(path)
}

fn open_source(path: &Path) -> io::Result<SourceLines> {
    if failure_injection_enabled() && file_name_matches(path, |name| name.starts_with(OPEN_FAIL_TAG))
    {
        return Err(io::Error::other("simulated open failure"));
    }
    read_source_lines(path)
}

/// Counts one file from its first line with a fresh block-comment state.
pub fn count_file(file_path: &Path) -> Result<LineTotals> {
    let read_error = |source| CountError::FileRead {
        path: file_path.to_path_buf(),
        source,
    };

    let mut classifier = FileClassifier::new();
    let mut totals = LineTotals::default();
    for line in open_source(file_path).map_err(read_error)? {
        let line = line.map_err(read_error)?;
        totals.record(&classifier.push(&line));
    }
    Ok(totals)
}

fn collect_files(
    path: &Path,
    root_path: &Path,
    options: &ScanOptions,
    current_depth: usize,
    files: &mut Vec<PathBuf>,
    warnings: &mut usize,
) -> Result<()> {
    let traversal_error = |path: &Path, source| CountError::Traversal {
        path: path.to_path_buf(),
        source,
    };

    for entry in read_dir_stream(path).map_err(|err| traversal_error(path, err))? {
        let entry = entry.map_err(|err| traversal_error(path, err))?;
        let entry_path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|err| traversal_error(&entry_path, err))?;

        if file_type.is_symlink() {
            // Linked files are read through; linked directories are not walked.
            // A dangling link is kept so the failed read gets reported.
            let links_to_dir = fs::metadata(&entry_path)
                .map(|meta| meta.is_dir())
                .unwrap_or(false);
            if !links_to_dir && options.selects(root_path, &entry_path) {
                files.push(entry_path);
            }
            continue;
        }

        if file_type.is_dir() {
            if options.non_recursive || options.is_ignored_dir(&entry_path) {
                continue;
            }
            if current_depth + 1 > options.max_depth {
                eprintln!(
                    "Warning: Maximum directory depth ({}) reached at {}",
                    options.max_depth,
                    entry_path.display()
                );
                *warnings += 1;
                continue;
            }
            collect_files(
                &entry_path,
                root_path,
                options,
                current_depth + 1,
                files,
                warnings,
            )?;
        } else if file_type.is_file() && options.selects(root_path, &entry_path) {
            files.push(entry_path);
        }
    }

    Ok(())
}

/// Walks `root_path`, counting every selected file.
///
/// Fails with `InvalidPath` when the root is not a directory and with
/// `Traversal` when any directory cannot be listed. Unreadable files are
/// reported in `ScanOutcome::failures` and skipped.
pub fn count_tree(
    root_path: &Path,
    options: &ScanOptions,
    metrics: &PerformanceMetrics,
) -> Result<ScanOutcome> {
    if !root_path.is_dir() {
        return Err(CountError::InvalidPath(root_path.to_path_buf()));
    }

    let mut files = Vec::new();
    let mut warnings = 0;
    collect_files(root_path, root_path, options, 0, &mut files, &mut warnings)?;
    files.sort();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs)
        .build()?;
    let results: Vec<(PathBuf, Result<LineTotals>)> = pool.install(|| {
        files
            .into_par_iter()
            .map(|path| {
                let result = count_file(&path);
                if let Ok(totals) = &result {
                    metrics.update(totals.total_lines);
                }
                (path, result)
            })
            .collect()
    });

    let mut outcome = ScanOutcome {
        warnings,
        ..ScanOutcome::default()
    };
    for (path, result) in results {
        match result {
            Ok(totals) => {
                outcome.totals += totals;
                outcome.files.push(FileReport { path, totals });
            }
            Err(err) => outcome.failures.push(err),
        }
    }
    Ok(outcome)
}
