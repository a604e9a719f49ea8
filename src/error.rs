use std::io;
use std::path::PathBuf;

/// Everything that can stop a run or a single file.
#[derive(Debug, thiserror::Error)]
pub enum CountError {
    #[error("Please provide a directory path.")]
    MissingArgument,

    #[error("Invalid directory path: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("Invalid filespec pattern '{spec}': {source}")]
    InvalidFilespec {
        spec: String,
        source: glob::PatternError,
    },

    /// Scoped to one file; the run continues without it.
    #[error("Unable to read file: {}: {source}", .path.display())]
    FileRead { path: PathBuf, source: io::Error },

    #[error("Failed to process directory: {}: {source}", .path.display())]
    Traversal { path: PathBuf, source: io::Error },

    #[error("Failed to start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, CountError>;
