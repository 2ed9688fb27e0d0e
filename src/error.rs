//! Error types for the chat client

use std::time::Duration;
use thiserror::Error;

/// Message shown to users when the backend gave us nothing better
pub const GENERIC_MESSAGE: &str = "Something went wrong";

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Token decode error: {0}")]
    TokenDecode(String),

    /// Non-2xx response, or an envelope with `status: false`
    #[error("{message}")]
    Server { status: Option<u16>, message: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Token refresh timed out after {0:?}")]
    RefreshTimeout(Duration),

    #[error("Nothing to update!")]
    NothingToUpdate,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Message suitable for showing to the user.
    ///
    /// Server-provided messages pass through; transport and local failures
    /// collapse to a generic message.
    pub fn message(&self) -> String {
        match self {
            ClientError::Server { message, .. } if !message.is_empty() => message.clone(),
            ClientError::NothingToUpdate => self.to_string(),
            _ => GENERIC_MESSAGE.to_string(),
        }
    }

    /// HTTP status code, where one is known
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => *status,
            ClientError::HttpRequest(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Cloneable form of a refresh failure.
///
/// A failed refresh is published to every caller waiting on the same flight,
/// so the error has to be `Clone`, which `ClientError` is not.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SharedError {
    Server { status: Option<u16>, message: String },
    Timeout(Duration),
    Other(String),
}

impl From<&ClientError> for SharedError {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::Server { status, message } => SharedError::Server {
                status: *status,
                message: message.clone(),
            },
            ClientError::RefreshTimeout(after) => SharedError::Timeout(*after),
            other => SharedError::Other(other.to_string()),
        }
    }
}

impl From<SharedError> for ClientError {
    fn from(err: SharedError) -> Self {
        match err {
            SharedError::Server { status, message } => ClientError::Server { status, message },
            SharedError::Timeout(after) => ClientError::RefreshTimeout(after),
            SharedError::Other(message) => ClientError::Authentication(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_passes_through() {
        let err = ClientError::Server {
            status: Some(401),
            message: "Invalid credentials".to_string(),
        };
        assert_eq!(err.message(), "Invalid credentials");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_local_errors_use_generic_message() {
        let err = ClientError::Configuration("missing base url".to_string());
        assert_eq!(err.message(), GENERIC_MESSAGE);
        assert_eq!(err.status(), None);

        let err = ClientError::Server {
            status: Some(500),
            message: String::new(),
        };
        assert_eq!(err.message(), GENERIC_MESSAGE);
    }

    #[test]
    fn test_shared_error_keeps_server_details() {
        let err = ClientError::Server {
            status: Some(403),
            message: "Session expired".to_string(),
        };
        let shared = SharedError::from(&err);
        match ClientError::from(shared) {
            ClientError::Server { status, message } => {
                assert_eq!(status, Some(403));
                assert_eq!(message, "Session expired");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_shared_error_keeps_timeout() {
        let err = ClientError::RefreshTimeout(Duration::from_secs(5));
        let back = ClientError::from(SharedError::from(&err));
        assert!(matches!(back, ClientError::RefreshTimeout(d) if d == Duration::from_secs(5)));
    }
}
