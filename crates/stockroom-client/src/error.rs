//! # Client Error Types
//!
//! Error types for everything that crosses the network or touches disk.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Transport      │  │   Server        │  │     Session             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Network        │  │  Server{status, │  │  Unauthorized (401      │ │
//! │  │  (incl. timeout)│  │   message}      │  │   after a replay)       │ │
//! │  │                 │  │  Decode         │  │  SessionExpired         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │  Configuration  │  │     Local       │                              │
//! │  │                 │  │                 │                              │
//! │  │  InvalidConfig  │  │  Storage        │                              │
//! │  │  InvalidUrl     │  │  Serialization  │                              │
//! │  │  ConfigLoad/Save│  │  Validation     │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! State containers never surface these to a UI directly; they store
//! [`ClientError::display_message`] in their `error` field.

use stockroom_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never produced an HTTP response (DNS, refused, timeout).
    #[error("Network error: {0}")]
    Network(String),

    // =========================================================================
    // Server Errors
    // =========================================================================
    /// Non-2xx response, or a 2xx whose envelope says `success: false`.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A 2xx body that does not match the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// 401 on a request that was already replayed with a fresh token.
    #[error("Unauthorized")]
    Unauthorized,

    /// The refresh token was rejected or missing; the session is gone.
    #[error("Session expired, please log in again")]
    SessionExpired,

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Local Errors
    // =========================================================================
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            // A 2xx with `success: false` is reported like any other refusal.
            CoreError::Rejected { message } => ClientError::Server {
                status: 200,
                message,
            },
            CoreError::Malformed(reason) => ClientError::Decode(reason),
            CoreError::Validation(e) => ClientError::Validation(e),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true when the user has to log in again.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::Unauthorized | ClientError::SessionExpired)
    }

    /// Returns true if repeating the same call later could succeed.
    ///
    /// Nothing in this crate retries on its own; this is for callers that
    /// offer a "try again" action.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_) => true,
            ClientError::Server { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// HTTP status, when the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            ClientError::Unauthorized => Some(401),
            _ => None,
        }
    }

    /// Human-readable text for a state container's `error` field.
    ///
    /// Server-provided messages win; otherwise the caller's `fallback`
    /// ("Failed to fetch products") is used, except for session errors whose
    /// own text is more useful than any fallback.
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Server { message, .. } if !message.trim().is_empty() => message.clone(),
            ClientError::Unauthorized | ClientError::SessionExpired => self.to_string(),
            ClientError::Validation(e) => e.to_string(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(ClientError::Network("connection refused".into()).is_retryable());
        assert!(ClientError::Server {
            status: 503,
            message: String::new()
        }
        .is_retryable());

        assert!(!ClientError::Server {
            status: 404,
            message: "Not found".into()
        }
        .is_retryable());
        assert!(!ClientError::SessionExpired.is_retryable());
    }

    #[test]
    fn test_auth_failures() {
        assert!(ClientError::Unauthorized.is_auth_failure());
        assert!(ClientError::SessionExpired.is_auth_failure());
        assert!(!ClientError::Network("x".into()).is_auth_failure());
    }

    #[test]
    fn test_display_message_prefers_server_text() {
        let err = ClientError::Server {
            status: 422,
            message: "SKU already exists".into(),
        };
        assert_eq!(err.display_message("Failed to create product"), "SKU already exists");

        let err = ClientError::Server {
            status: 500,
            message: " ".into(),
        };
        assert_eq!(err.display_message("Failed to create product"), "Failed to create product");

        let err = ClientError::Network("timeout".into());
        assert_eq!(err.display_message("Failed to fetch"), "Failed to fetch");
    }

    #[test]
    fn test_rejected_envelope_maps_to_server_error() {
        let err: ClientError = CoreError::Rejected {
            message: "Invalid credentials".into(),
        }
        .into();
        assert_eq!(err.status(), Some(200));
        assert_eq!(err.display_message("Login failed"), "Invalid credentials");
    }
}
