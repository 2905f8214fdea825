//! Errors for everything around the engine that touches the host.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Document exceeds the configured size cap
    #[error("{} is {size} bytes, over the {limit} byte limit", path.display())]
    InputTooLarge { path: PathBuf, size: u64, limit: usize },

    /// Document is not valid UTF-8 text
    #[error("{} is not UTF-8 text", path.display())]
    NotUtf8 { path: PathBuf },

    /// A date argument did not parse as YYYY-MM-DD
    #[error("invalid date {value:?}: expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// Configuration is unusable
    #[error("config error: {message}")]
    Config { message: String },
}

impl From<std::io::Error> for ExtractError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl ExtractError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
