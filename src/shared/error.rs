//! Shared Error Types
//!
//! This module defines error types that are shared between the server and
//! its clients, plus the JSON error body every failed API call returns.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - Field-level input validation failures
//!
//! # Usage
//!
//! ```rust
//! use blogify::shared::error::SharedError;
//!
//! let error = SharedError::validation("name", "Blog name must be at least 3 characters");
//! assert_eq!(error.field(), Some("name"));
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shared error types that can occur on both sides of the API
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("{message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The offending field, for validation errors
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValidationError { field, .. } => Some(field),
            Self::SerializationError { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

/// Body of every non-2xx API response
///
/// `message` is a short summary ("Validation failed", "Not authorized"),
/// `error` the detail that clients show to the end user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: String,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = SharedError::validation("email", "Invalid email format");
        match &error {
            SharedError::ValidationError { field, message } => {
                assert_eq!(field, "email");
                assert_eq!(message, "Invalid email format");
            }
            _ => panic!("Expected ValidationError"),
        }
        assert_eq!(error.to_string(), "Invalid email format");
        assert_eq!(error.field(), Some("email"));
    }

    #[test]
    fn test_from_serde_error() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("{ invalid json }");
        let shared_error: SharedError = result.unwrap_err().into();

        match shared_error {
            SharedError::SerializationError { .. } => {}
            _ => panic!("Expected SerializationError from serde error"),
        }
        assert!(shared_error.field().is_none());
    }

    #[test]
    fn test_error_body_omits_missing_field() {
        let body = ErrorBody {
            message: "Not found".to_string(),
            error: "Collection not found".to_string(),
            field: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("field").is_none());
        assert_eq!(json["error"], "Collection not found");
    }
}
