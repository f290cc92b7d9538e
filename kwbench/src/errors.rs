/// Error types for kwbench.
///
/// Two families live here. `BenchError` covers failures that abort a whole run
/// or a whole strategy: no input files, no keywords, a worker that never
/// delivered its partial result. `UnreadableReason` classifies a single file
/// that could not be searched; it never leaves the matcher as an error, the
/// file is logged and skipped instead.
use std::fmt;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Result type for benchmark operations
pub type SearchResult<T> = Result<T, BenchError>;

/// Errors that can occur while dispatching or aggregating a benchmark run
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("No files provided")]
    NoFiles,
    #[error("No keywords are provided")]
    NoKeywords,
    #[error("Worker for partition {partition} failed: {message}")]
    Worker { partition: usize, message: String },
    #[error("Strategy {strategy} received {received} of {expected} partial results")]
    MissingResults {
        strategy: String,
        expected: usize,
        received: usize,
    },
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl BenchError {
    pub fn worker(partition: usize, message: impl Into<String>) -> Self {
        Self::Worker {
            partition,
            message: message.into(),
        }
    }

    pub fn missing_results(strategy: impl Into<String>, expected: usize, received: usize) -> Self {
        Self::MissingResults {
            strategy: strategy.into(),
            expected,
            received,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Why a file contributed no matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnreadableReason {
    NotFound,
    IsDirectory,
    PermissionDenied,
    InvalidEncoding,
    /// Any other I/O failure
    Io,
}

impl UnreadableReason {
    /// Classifies an I/O error raised while opening or reading `path`.
    ///
    /// Directories are checked on the path itself, since not every platform
    /// reports `IsADirectory` from `read`.
    pub fn classify(path: &Path, err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::InvalidData => Self::InvalidEncoding,
            _ if path.is_dir() => Self::IsDirectory,
            _ => Self::Io,
        }
    }
}

impl fmt::Display for UnreadableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotFound => "file not found",
            Self::IsDirectory => "is a directory",
            Self::PermissionDenied => "permission denied",
            Self::InvalidEncoding => "invalid UTF-8",
            Self::Io => "I/O error",
        };
        f.write_str(text)
    }
}
