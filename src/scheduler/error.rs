//! Error types for the scheduler module

use thiserror::Error;

use crate::models::RecordError;

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scheduler-specific errors
///
/// Input and configuration variants are fatal to a scheduling pass.
/// Per-candidate outcomes such as an unknown channel or a full capacity are
/// decisions, not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// A pending guide entry cannot be parsed
    #[error("Malformed candidate #{index}: {source}")]
    MalformedCandidate {
        index: usize,
        #[source]
        source: RecordError,
    },

    /// An entry of the last submitted guide cannot be parsed
    #[error("Malformed committed recording #{index}: {source}")]
    MalformedCommitted {
        index: usize,
        #[source]
        source: RecordError,
    },

    /// Capacity must be a positive number of streams
    #[error("Invalid capacity {capacity}: at least one simultaneous recording is required")]
    InvalidCapacity { capacity: usize },

    /// Look-back requested on fewer windows than the capacity
    #[error("Look-back of {capacity} positions requested on {held} windows")]
    LookbackUnderflow { held: usize, capacity: usize },

    /// Unknown admission policy name
    #[error("Unknown admission policy '{name}'. Valid options: legacy, interval")]
    UnknownPolicy { name: String },

    /// Plan serialization/deserialization error
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// IO error while reading or writing a plan
    #[error("IO error during '{operation}': {reason}")]
    Io { operation: String, reason: String },
}

impl SchedulerError {
    /// Create a malformed candidate error
    pub fn malformed_candidate(index: usize, source: RecordError) -> Self {
        Self::MalformedCandidate { index, source }
    }

    /// Create a malformed committed recording error
    pub fn malformed_committed(index: usize, source: RecordError) -> Self {
        Self::MalformedCommitted { index, source }
    }

    /// Create an IO error with context
    pub fn io_error(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Io {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Whether the operation can be retried as-is
    ///
    /// Bad input data and bad configuration stay bad on retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_candidate_message() {
        let err = SchedulerError::malformed_candidate(4, RecordError::MissingField("start"));
        let msg = err.to_string();
        assert!(msg.contains("#4"));
        assert!(msg.contains("start"));
    }

    #[test]
    fn test_lookback_underflow_message() {
        let err = SchedulerError::LookbackUnderflow {
            held: 1,
            capacity: 2,
        };
        assert!(err.to_string().contains("2 positions"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_io_error_is_recoverable() {
        let err = SchedulerError::io_error("save_plan", "disk full");
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("save_plan"));
    }

    #[test]
    fn test_unknown_policy_lists_options() {
        let err = SchedulerError::UnknownPolicy {
            name: "fifo".to_string(),
        };
        assert!(err.to_string().contains("legacy"));
        assert!(err.to_string().contains("interval"));
    }
}
