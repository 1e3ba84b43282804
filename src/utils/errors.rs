//! Custom error types for the update packager.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackagerError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Scan error at {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Build error: {0}")]
    Build(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Operation cancelled")]
    Cancelled,
}

impl PackagerError {
    /// Build a scan error carrying the offending path.
    pub fn scan(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Scan {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PackagerError>;
