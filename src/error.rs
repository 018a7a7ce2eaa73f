use std::path::PathBuf;

use thiserror::Error;

/// Main error type for encapp-search
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid value '{token}': {reason}")]
    Parse { token: String, reason: String },

    #[error("Failed to read result record {path:?}: {reason}")]
    RecordRead { path: PathBuf, reason: String },

    #[error("Index error: {0}")]
    IndexLoad(#[from] IndexLoadError),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Device error: {0}")]
    Device(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Index file load errors
#[derive(Error, Debug, Clone)]
pub enum IndexLoadError {
    #[error("index file {0:?} does not exist")]
    Missing(PathBuf),

    #[error("index file {path:?} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("could not rebuild index file {path:?}: {reason}")]
    RebuildFailed { path: PathBuf, reason: String },
}

impl SearchError {
    /// Shorthand for a token that failed to parse.
    pub fn parse(token: impl Into<String>, reason: impl Into<String>) -> Self {
        SearchError::Parse {
            token: token.into(),
            reason: reason.into(),
        }
    }

    pub fn record_read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SearchError::RecordRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SearchError>;
