//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use cadet_console_client::ClientError;

use crate::validation::FieldErrorSet;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Local field errors; the request never left the form.
    #[error("Validation failed: {0}")]
    Validation(FieldErrorSet),

    /// Edit, view or delete target no longer exists on the server.
    #[error("{label} '{id}' not found")]
    NotFoundOnAction { label: String, id: String },

    /// Submit without an open, loaded form.
    #[error("No form is open")]
    NoActiveForm,

    /// Confirmation resolved with nothing pending.
    #[error("No action is awaiting confirmation")]
    NoPendingAction,

    /// Operation not allowed in the current list phase.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Malformed resource schema (bad pattern, unknown field).
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// Token or config persistence failed.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Resource client error (converted from library)
    #[error("{0}")]
    Client(#[from] ClientError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, missing record, etc.), used for log levels.
    ///
    /// Level `warn` for `true`, `error` for `false`.
    /// **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Validation(_)
            | Self::NotFoundOnAction { .. }
            | Self::NoActiveForm
            | Self::NoPendingAction
            | Self::InvalidState(_) => true,
            Self::Client(e) => e.is_expected(),
            _ => false,
        }
    }

    /// Text for the operator-facing notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(_) => "Please correct the highlighted fields.".to_string(),
            Self::NotFoundOnAction { label, .. } => format!("{label} not found"),
            Self::Client(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_convert_and_keep_detail() {
        let err: CoreError = ClientError::HttpError {
            resource: "schools".to_string(),
            status: 500,
            message: "db down".to_string(),
        }
        .into();
        assert_eq!(err.user_message(), "db down");
        assert!(!err.is_expected());
    }

    #[test]
    fn not_found_on_action_message() {
        let err = CoreError::NotFoundOnAction {
            label: "School".to_string(),
            id: "4".to_string(),
        };
        assert_eq!(err.to_string(), "School '4' not found");
        assert_eq!(err.user_message(), "School not found");
        assert!(err.is_expected());
    }

    #[test]
    fn serializes_with_code_and_details() {
        let json = serde_json::to_value(CoreError::NoPendingAction).unwrap();
        assert_eq!(json["code"], "NoPendingAction");
    }
}
