//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - Envelope / decoding level failures             │
//! │  └── ValidationError  - Input rejected before a request is built       │
//! │                                                                         │
//! │  stockroom-client errors (separate crate)                              │
//! │  └── ClientError      - Network, Server, Unauthorized, SessionExpired  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → State `error` field │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Failures that can be detected without any I/O.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The backend answered 2xx but flagged the call as failed
    /// (`{"success": false, "message": "..."}`).
    #[error("{message}")]
    Rejected { message: String },

    /// A payload did not have the expected shape.
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before a request is issued, so the backend never sees a filter or
/// identifier it would reject anyway.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Invalid format (e.g., an unparseable date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
