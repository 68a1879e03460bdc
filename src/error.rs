//! Error taxonomy for the record source.
//!
//! Only `SourceError` is fatal. `DecodeError` describes one bad line and is counted
//! and skipped by every pass; it never aborts a scan.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The source cannot be opened or read at all.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source not found: {path}")]
    NotFound { path: PathBuf },

    #[error("source unreadable: {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SourceError {
    pub(crate) fn from_io(path: impl Into<PathBuf>, e: io::Error) -> Self {
        let path = path.into();
        if e.kind() == io::ErrorKind::NotFound {
            SourceError::NotFound { path }
        } else {
            SourceError::Unreadable { path, source: e }
        }
    }
}

/// One line that could not be turned into a record.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("line {line}: invalid JSON: {source}")]
    Json {
        line: u64,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: expected a JSON object, found {found}")]
    NotAnObject { line: u64, found: &'static str },
}

impl DecodeError {
    /// 1-based line number of the offending line.
    pub fn line(&self) -> u64 {
        match self {
            DecodeError::Json { line, .. } | DecodeError::NotAnObject { line, .. } => *line,
        }
    }
}
