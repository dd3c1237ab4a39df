use serde::{Deserialize, Serialize};

/// Unified error type for all resource client operations.
///
/// Each variant carries the `resource` key (e.g. `schools`) of the client
/// that produced it. Every failure surfaces immediately: the client never
/// retries, the caller decides whether to notify the operator and abort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ClientError {
    /// Transport failure (DNS resolution, connection refused, reset, etc.).
    NetworkError {
        /// Resource that produced the error.
        resource: String,
        /// Error details.
        detail: String,
    },

    /// The request did not complete within the configured timeout.
    Timeout {
        /// Resource that produced the error.
        resource: String,
        /// Error details.
        detail: String,
    },

    /// The server answered with a non-success status.
    HttpError {
        /// Resource that produced the error.
        resource: String,
        /// HTTP status code.
        status: u16,
        /// Server-supplied message, or `HTTP error, status N`.
        message: String,
    },

    /// The target record does not exist (404 on get, update or delete).
    NotFound {
        /// Resource that produced the error.
        resource: String,
        /// Id that was requested.
        id: String,
        /// Server-supplied message, if any.
        raw_message: Option<String>,
    },

    /// A success status arrived with a body that could not be decoded.
    DecodeError {
        /// Resource that produced the error.
        resource: String,
        /// Details about the decode failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Resource that produced the error.
        resource: String,
        /// Details about the serialization failure.
        detail: String,
    },
}

impl ClientError {
    /// Whether this is expected behavior (bad input, missing record, 4xx), used for log levels.
    ///
    /// `true` should be logged at `warn`, `false` at `error`.
    /// **Keep in sync when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::HttpError { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }

    /// The text shown to the operator.
    ///
    /// For `HttpError` this is exactly the server-supplied message, so a
    /// backend answering `{"detail":"db down"}` surfaces as `db down`.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NetworkError { .. } => {
                "Error connecting to server. Please try again.".to_string()
            }
            Self::Timeout { .. } => "The server took too long to respond.".to_string(),
            Self::HttpError { message, .. } => message.clone(),
            Self::NotFound {
                raw_message: Some(msg),
                ..
            } => msg.clone(),
            Self::NotFound { id, .. } => format!("Record '{id}' not found"),
            Self::DecodeError { .. } => {
                "The server sent a response that could not be read.".to_string()
            }
            Self::SerializationError { detail, .. } => {
                format!("Could not encode request: {detail}")
            }
        }
    }

    /// Resource key that produced the error.
    #[must_use]
    pub fn resource(&self) -> &str {
        match self {
            Self::NetworkError { resource, .. }
            | Self::Timeout { resource, .. }
            | Self::HttpError { resource, .. }
            | Self::NotFound { resource, .. }
            | Self::DecodeError { resource, .. }
            | Self::SerializationError { resource, .. } => resource,
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { resource, detail } => {
                write!(f, "[{resource}] Network error: {detail}")
            }
            Self::Timeout { resource, detail } => {
                write!(f, "[{resource}] Request timeout: {detail}")
            }
            Self::HttpError {
                resource,
                status,
                message,
            } => {
                write!(f, "[{resource}] HTTP {status}: {message}")
            }
            Self::NotFound {
                resource,
                id,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{resource}] Record '{id}' not found: {msg}")
                } else {
                    write!(f, "[{resource}] Record '{id}' not found")
                }
            }
            Self::DecodeError { resource, detail } => {
                write!(f, "[{resource}] Decode error: {detail}")
            }
            Self::SerializationError { resource, detail } => {
                write!(f, "[{resource}] Serialization error: {detail}")
            }
        }
    }
}

impl std::error::Error for ClientError {}

/// Convenience type alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;
