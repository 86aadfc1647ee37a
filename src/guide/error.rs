//! Error types for guide ingestion

use std::path::PathBuf;
use thiserror::Error;

/// Result type for guide operations
pub type GuideResult<T> = Result<T, GuideError>;

/// Errors fetching or storing guide files
#[derive(Error, Debug)]
pub enum GuideError {
    /// A required guide file does not exist
    #[error("Guide file not found: {}", path.display())]
    Missing { path: PathBuf },

    /// A guide file is not a JSON array of records
    #[error("Invalid guide JSON in {}: {reason}", path.display())]
    InvalidJson { path: PathBuf, reason: String },

    /// Filesystem error
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP client error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Guide server answered with a non-success status
    #[error("Guide server returned status {status}")]
    Status { status: u16 },

    /// Guide response body is not a JSON array
    #[error("Guide response is not a JSON array: {reason}")]
    InvalidResponse { reason: String },

    /// Guide URL cannot be parsed
    #[error("Invalid guide URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl GuideError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether a later run may succeed without operator action
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Io { .. } => true,
            Self::Status { status } => *status == 429 || *status >= 500,
            Self::Missing { .. }
            | Self::InvalidJson { .. }
            | Self::InvalidResponse { .. }
            | Self::InvalidUrl { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_recoverability() {
        assert!(GuideError::Status { status: 503 }.is_recoverable());
        assert!(GuideError::Status { status: 429 }.is_recoverable());
        assert!(!GuideError::Status { status: 401 }.is_recoverable());
    }

    #[test]
    fn test_missing_message_has_path() {
        let err = GuideError::Missing {
            path: PathBuf::from("/data/info_progs.json"),
        };
        assert!(err.to_string().contains("info_progs.json"));
        assert!(!err.is_recoverable());
    }
}
