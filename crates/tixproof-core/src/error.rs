//! Error types module
//!
//! All engine failures are unified under the `EngineError` enum. Variants
//! self-describe how they should be surfaced through `ErrorMetadata`: only
//! capacity and submission failures are meant for the user, the rest are
//! developer diagnostics that the flow controller logs and swallows.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected rejections like invalid artifacts
    Debug,
    /// Warning level - for recoverable issues like a failed submission
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "CAPACITY_EXCEEDED")
    fn error_code(&self) -> &'static str;

    /// Whether the user may retry the same action
    fn is_recoverable(&self) -> bool;

    /// Whether the host should show this error to the user
    fn is_user_visible(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// User-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Capacity exceeded: all {max_quantity} slots are filled")]
    CapacityExceeded { max_quantity: u32 },

    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("Submission failed (status {status:?}): {message}")]
    SubmissionFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("Delete of slot {slot} failed: {message}")]
    PerSlotDeleteFailed { slot: u32, message: String },

    #[error("Slot {slot} is outside 1..={max_quantity}")]
    SlotOutOfRange { slot: u32, max_quantity: u32 },

    #[error("Slot {0} is already filled")]
    SlotOccupied(u32),

    #[error("Delete already in flight for slot {0}")]
    DeleteInFlight(u32),

    #[error("Illegal transition on slot {slot}: {action} from {from}")]
    IllegalTransition {
        slot: u32,
        from: String,
        action: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::InvalidArtifact(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant:
/// (error_code, recoverable, user_visible, suggested_action, log_level).
fn engine_error_static_metadata(
    err: &EngineError,
) -> (&'static str, bool, bool, Option<&'static str>, LogLevel) {
    match err {
        EngineError::CapacityExceeded { .. } => (
            "CAPACITY_EXCEEDED",
            false,
            true,
            Some("Remove a file from a slot before adding another"),
            LogLevel::Debug,
        ),
        EngineError::InvalidArtifact(_) => (
            "INVALID_ARTIFACT",
            false,
            false,
            Some("Check the file type and size"),
            LogLevel::Debug,
        ),
        EngineError::SubmissionFailed { .. } => (
            "SUBMISSION_FAILED",
            true,
            true,
            Some("Retry the submission"),
            LogLevel::Warn,
        ),
        EngineError::PerSlotDeleteFailed { .. } => (
            "SLOT_DELETE_FAILED",
            true,
            false,
            None,
            LogLevel::Warn,
        ),
        EngineError::SlotOutOfRange { .. } => (
            "SLOT_OUT_OF_RANGE",
            false,
            false,
            None,
            LogLevel::Debug,
        ),
        EngineError::SlotOccupied(_) => (
            "SLOT_OCCUPIED",
            false,
            false,
            Some("Empty the slot first"),
            LogLevel::Debug,
        ),
        EngineError::DeleteInFlight(_) => (
            "DELETE_IN_FLIGHT",
            true,
            false,
            Some("Wait for the pending delete to finish"),
            LogLevel::Debug,
        ),
        EngineError::IllegalTransition { .. } => (
            "ILLEGAL_TRANSITION",
            false,
            false,
            None,
            LogLevel::Error,
        ),
        EngineError::InvalidInput(_) => (
            "INVALID_INPUT",
            false,
            false,
            Some("Check the session data and try again"),
            LogLevel::Debug,
        ),
        EngineError::Internal(_) => ("INTERNAL_ERROR", false, false, None, LogLevel::Error),
    }
}

impl EngineError {
    /// Get the error type name for diagnostics
    pub fn error_type(&self) -> &str {
        match self {
            EngineError::CapacityExceeded { .. } => "CapacityExceeded",
            EngineError::InvalidArtifact(_) => "InvalidArtifact",
            EngineError::SubmissionFailed { .. } => "SubmissionFailed",
            EngineError::PerSlotDeleteFailed { .. } => "PerSlotDeleteFailed",
            EngineError::SlotOutOfRange { .. } => "SlotOutOfRange",
            EngineError::SlotOccupied(_) => "SlotOccupied",
            EngineError::DeleteInFlight(_) => "DeleteInFlight",
            EngineError::IllegalTransition { .. } => "IllegalTransition",
            EngineError::InvalidInput(_) => "InvalidInput",
            EngineError::Internal(_) => "Internal",
        }
    }
}

impl ErrorMetadata for EngineError {
    fn error_code(&self) -> &'static str {
        engine_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        engine_error_static_metadata(self).1
    }

    fn is_user_visible(&self) -> bool {
        engine_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        engine_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        engine_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            EngineError::CapacityExceeded { max_quantity } => {
                format!("You can only upload {} ticket(s)", max_quantity)
            }
            EngineError::SubmissionFailed { .. } => {
                "Failed to save your changes, please try again".to_string()
            }
            EngineError::InvalidInput(ref msg) => msg.clone(),
            _ => "Something went wrong".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_exceeded_is_user_visible() {
        let err = EngineError::CapacityExceeded { max_quantity: 2 };
        assert_eq!(err.error_code(), "CAPACITY_EXCEEDED");
        assert!(err.is_user_visible());
        assert!(!err.is_recoverable());
        assert!(err.client_message().contains('2'));
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_submission_failed_is_retryable() {
        let err = EngineError::SubmissionFailed {
            status: Some(500),
            message: "boom".to_string(),
        };
        assert_eq!(err.error_code(), "SUBMISSION_FAILED");
        assert!(err.is_user_visible());
        assert!(err.is_recoverable());
        assert_eq!(err.suggested_action(), Some("Retry the submission"));
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_diagnostic_errors_are_hidden() {
        let hidden = [
            EngineError::InvalidArtifact("empty".to_string()),
            EngineError::PerSlotDeleteFailed {
                slot: 1,
                message: "timeout".to_string(),
            },
            EngineError::SlotOccupied(3),
            EngineError::DeleteInFlight(3),
        ];
        for err in hidden {
            assert!(!err.is_user_visible(), "{} should be hidden", err.error_type());
        }
    }

    #[test]
    fn test_display_includes_context() {
        let err = EngineError::SlotOutOfRange {
            slot: 7,
            max_quantity: 3,
        };
        assert_eq!(err.to_string(), "Slot 7 is outside 1..=3");
    }
}
