//! Unified error handling for the freebox-select crate
//!
//! This module provides a unified error type that consolidates all domain-specific
//! errors into a single `Error` enum, while maintaining the ability to use
//! domain-specific errors when needed.
//!
//! # Architecture
//!
//! - [`SelectErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use freebox_select::error::{Error, SelectErrorTrait};
//!
//! fn handle_error(err: Error) {
//!     if err.is_recoverable() {
//!         println!("Will retry on next run: {}", err);
//!     } else {
//!         eprintln!("Fatal error ({:?}): {}", err.category(), err);
//!     }
//! }
//! ```

use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::channels::ChannelError;
pub use crate::guide::GuideError;
pub use crate::models::RecordError;
pub use crate::scheduler::SchedulerError;

/// Common trait for all freebox-select error types
pub trait SelectErrorTrait: std::error::Error {
    /// Check if this error is recoverable (a later run may succeed)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Guide download errors
    Network,
    /// Malformed guide data
    Parsing,
    /// Data files and I/O errors
    Storage,
    /// Configuration and validation errors
    Config,
    /// Scheduling errors
    Scheduler,
}

impl ErrorCategory {
    /// Short description for the category
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "network error",
            Self::Parsing => "parsing error",
            Self::Storage => "storage error",
            Self::Config => "configuration error",
            Self::Scheduler => "scheduler error",
        }
    }
}

/// Unified error type for the freebox-select crate
#[derive(Error, Debug)]
pub enum Error {
    /// Scheduling errors
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// Guide download and storage errors
    #[error("Guide error: {0}")]
    Guide(#[from] GuideError),

    /// Channel table errors
    #[error("Channel table error: {0}")]
    Channel(#[from] ChannelError),

    /// Invalid configuration values
    #[error("Config error: {0}")]
    Config(String),
}

impl SelectErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Scheduler(e) => e.is_recoverable(),
            Self::Guide(e) => e.is_recoverable(),
            Self::Channel(ChannelError::Io { .. }) => true,
            Self::Channel(ChannelError::Parse { .. }) => false,
            Self::Config(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Scheduler(e) => match e {
                SchedulerError::MalformedCandidate { .. }
                | SchedulerError::MalformedCommitted { .. }
                | SchedulerError::Serialization { .. } => ErrorCategory::Parsing,
                SchedulerError::InvalidCapacity { .. } | SchedulerError::UnknownPolicy { .. } => {
                    ErrorCategory::Config
                }
                SchedulerError::Io { .. } => ErrorCategory::Storage,
                SchedulerError::LookbackUnderflow { .. } => ErrorCategory::Scheduler,
            },
            Self::Guide(e) => match e {
                GuideError::Http(_) | GuideError::Status { .. } => ErrorCategory::Network,
                GuideError::InvalidJson { .. } | GuideError::InvalidResponse { .. } => {
                    ErrorCategory::Parsing
                }
                GuideError::Missing { .. } | GuideError::Io { .. } => ErrorCategory::Storage,
                GuideError::InvalidUrl { .. } => ErrorCategory::Config,
            },
            Self::Channel(_) | Self::Config(_) => ErrorCategory::Config,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category() {
        let err = Error::Guide(GuideError::Status { status: 502 });
        assert_eq!(err.category(), ErrorCategory::Network);

        let err = Error::Scheduler(SchedulerError::malformed_candidate(
            0,
            RecordError::MissingField("start"),
        ));
        assert_eq!(err.category(), ErrorCategory::Parsing);

        let err = Error::Scheduler(SchedulerError::InvalidCapacity { capacity: 0 });
        assert_eq!(err.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_is_recoverable() {
        let err = Error::Guide(GuideError::Status { status: 503 });
        assert!(err.is_recoverable());

        let err = Error::Scheduler(SchedulerError::InvalidCapacity { capacity: 0 });
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_error_conversion() {
        let unified: Error = SchedulerError::UnknownPolicy {
            name: String::from("fifo"),
        }
        .into();
        assert!(matches!(unified, Error::Scheduler(_)));
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("max_simultaneous_recordings must be greater than 0");
        assert_eq!(err.category(), ErrorCategory::Config);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_invalid_config_categorized() {
        let mut config = crate::config::Config::with_capacity(1);
        config.scheduler.timezone = String::from("Mars/Olympus");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.category(), ErrorCategory::Config);
        assert_eq!(err.category().description(), "configuration error");
    }
}
