/**
 * Backend Error Types
 *
 * This module defines the error type every backend handler returns.
 * Each variant maps onto exactly one HTTP status of the API's error
 * taxonomy and renders as a `{message, error}` JSON body.
 *
 * # Error Categories
 *
 * - `HandlerError` - explicit status + summary + detail (403, 404, 409, ...)
 * - `ValidationError` - field-level input failures (400)
 * - `AuthError` - auth gate rejections (401, or 500 for internal faults)
 * - `StoreError` - persistence failures (409 on duplicates, 400 for a
 *   search pattern the database rejects, 500 otherwise)
 */

use thiserror::Error;
use axum::{extract::rejection::JsonRejection, http::StatusCode};
use crate::backend::middleware::auth::AuthRejection;
use crate::backend::store::{StoreError, UniqueField};
use crate::shared::SharedError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use blogify::backend::error::BackendError;
///
/// let err = BackendError::not_found("Collection not found", "The requested blog collection does not exist");
/// assert_eq!(err.status_code().as_u16(), 404);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with an explicit status code
    #[error("{message}: {detail}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Short summary
        message: String,
        /// Human-readable detail shown to the end user
        detail: String,
    },

    /// Field validation error
    #[error(transparent)]
    ValidationError(#[from] SharedError),

    /// Bearer credential rejected by the auth gate
    #[error(transparent)]
    AuthError(#[from] AuthRejection),

    /// Persistence error
    #[error(transparent)]
    StoreError(#[from] StoreError),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
            detail: detail.into(),
        }
    }

    /// 400 with a custom summary (e.g. "Registration failed")
    pub fn bad_request(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message, detail)
    }

    /// 403 for a mutation attempted by someone other than the owner
    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, "Not authorized", detail)
    }

    /// 404
    pub fn not_found(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message, detail)
    }

    /// 409
    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::handler(StatusCode::CONFLICT, "Conflict", detail)
    }

    /// 500
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::handler(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", detail)
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `ValidationError` - 400 Bad Request
    /// - `AuthError` - 401, or 500 for an internal fault inside the gate
    /// - `StoreError` - 409 for unique-constraint failures, 400 for rejected
    ///   search patterns, 500 otherwise
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::AuthError(rejection) => rejection.status_code(),
            Self::StoreError(StoreError::Duplicate(_)) => StatusCode::CONFLICT,
            Self::StoreError(StoreError::InvalidPattern(_)) => StatusCode::BAD_REQUEST,
            Self::StoreError(StoreError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short summary placed in the `message` key
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::ValidationError(_) => "Validation failed".to_string(),
            Self::AuthError(rejection) => rejection.summary().to_string(),
            Self::StoreError(StoreError::Duplicate(_)) => "Conflict".to_string(),
            Self::StoreError(StoreError::InvalidPattern(_)) => "Validation failed".to_string(),
            Self::StoreError(StoreError::Database(_)) => "Internal server error".to_string(),
        }
    }

    /// Detail placed in the `error` key
    ///
    /// Database detail is never exposed to clients.
    pub fn detail(&self) -> String {
        match self {
            Self::HandlerError { detail, .. } => detail.clone(),
            Self::ValidationError(err) => err.to_string(),
            Self::AuthError(rejection) => rejection.to_string(),
            Self::StoreError(StoreError::Duplicate(field)) => duplicate_detail(*field).to_string(),
            Self::StoreError(StoreError::InvalidPattern(reason)) => format!("Invalid search pattern: {reason}"),
            Self::StoreError(StoreError::Database(_)) => "An unexpected error occurred".to_string(),
        }
    }

    /// Offending field, for validation errors
    pub fn field(&self) -> Option<String> {
        match self {
            Self::ValidationError(err) => err.field().map(str::to_string),
            Self::StoreError(StoreError::InvalidPattern(_)) => Some("search".to_string()),
            _ => None,
        }
    }
}

impl From<JsonRejection> for BackendError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        Self::bad_request("Invalid request body", rejection.body_text())
    }
}

fn duplicate_detail(field: UniqueField) -> &'static str {
    match field {
        UniqueField::Email => "User with this email already exists",
        UniqueField::Username => "Username is already taken",
        UniqueField::Subdomain => "This subdomain is already taken",
        UniqueField::CollectionSlug => "A blog collection with this slug already exists",
        UniqueField::ArticleSlug => "An article with this slug already exists in this collection",
    }
}
