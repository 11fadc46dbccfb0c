/**
 * Authentication Extractors
 *
 * This module turns a bearer credential into a resolved identity. The gate
 * runs five checks in order and rejects with a distinct reason at the
 * first one that fails:
 *
 * 1. `Authorization` header present
 * 2. header has the `Bearer <token>` shape
 * 3. token signature and expiry verify
 * 4. the user id in the token resolves to a stored user
 * 5. that user carries a non-empty username
 *
 * Every rejection is a 401 except an internal fault during the lookup,
 * which is a 500.
 *
 * `AuthUser` requires the gate to pass. `Viewer` runs the same gate but
 * keeps the outcome, so public reads can ignore a bad credential and only
 * private resources demand one.
 */

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::sessions::SessionError;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Why the gate rejected a request
#[derive(Debug, Error)]
pub enum AuthRejection {
    #[error("No authentication token, access denied")]
    MissingHeader,
    #[error("Invalid authorization header format")]
    MalformedHeader,
    #[error("Token is invalid or expired: {0}")]
    InvalidToken(SessionError),
    #[error("User not found")]
    UserNotFound,
    #[error("User profile incomplete. Please update your profile with a username.")]
    IncompleteIdentity,
    #[error("Authentication failed due to an internal error")]
    Internal,
}

impl AuthRejection {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Self::Internal => "Internal server error",
            _ => "Authentication failed",
        }
    }
}

/// Identity attached to an authenticated request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub email: String,
}

impl AuthenticatedUser {
    pub fn owns(&self, owner_id: Uuid) -> bool {
        self.user_id == owner_id
    }
}

/// Extract the raw token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let header = headers.get(AUTHORIZATION).ok_or_else(|| {
        tracing::debug!("Missing Authorization header");
        AuthRejection::MissingHeader
    })?;

    let value = header.to_str().map_err(|_| {
        tracing::warn!("Authorization header is not valid ASCII");
        AuthRejection::MalformedHeader
    })?;

    let token = value.strip_prefix("Bearer ").map(str::trim).unwrap_or_default();
    if token.is_empty() {
        tracing::warn!("Invalid Authorization header format");
        return Err(AuthRejection::MalformedHeader);
    }
    Ok(token)
}

/// Run the full gate against the request headers
pub async fn authenticate(parts: &Parts, state: &AppState) -> Result<AuthenticatedUser, AuthRejection> {
    let token = bearer_token(&parts.headers)?;

    let claims = state.sessions.verify_token(token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        AuthRejection::InvalidToken(e)
    })?;

    let user_id = claims.user_id().map_err(AuthRejection::InvalidToken)?;

    let user = state
        .store
        .user_by_id(user_id)
        .await
        .map_err(|e| {
            tracing::error!("User lookup failed during authentication: {:?}", e);
            AuthRejection::Internal
        })?
        .ok_or_else(|| {
            tracing::warn!("Token references unknown user {}", user_id);
            AuthRejection::UserNotFound
        })?;

    if user.username.trim().is_empty() {
        tracing::warn!("User {} has no username", user.id);
        return Err(AuthRejection::IncompleteIdentity);
    }

    Ok(AuthenticatedUser {
        user_id: user.id,
        username: user.username,
        name: user.name,
        email: user.email,
    })
}

/// Axum extractor for routes that require authentication
///
/// ```rust,ignore
/// async fn handler(AuthUser(user): AuthUser) -> String {
///     user.username
/// }
/// ```
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        Ok(AuthUser(user))
    }
}

/// Axum extractor for routes readable by anyone
///
/// Holds the gate outcome without rejecting the request.
#[derive(Debug)]
pub struct Viewer(Result<AuthenticatedUser, AuthRejection>);

impl Viewer {
    /// The identity, or the reason there is none
    pub fn require(self) -> Result<AuthenticatedUser, BackendError> {
        self.0.map_err(BackendError::from)
    }

    /// The identity if the credential was valid
    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.0.as_ref().ok()
    }

    /// Gate for resources visible only to `owner_id`
    ///
    /// No identity is a 401, another identity is a 403.
    pub fn require_owner(self, owner_id: Uuid, detail: &str) -> Result<AuthenticatedUser, BackendError> {
        let user = self.require()?;
        if !user.owns(owner_id) {
            return Err(BackendError::forbidden(detail));
        }
        Ok(user)
    }
}

impl FromRequestParts<AppState> for Viewer {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Viewer(authenticate(parts, state).await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use chrono::{Duration, Utc};

    use crate::backend::server::state::AppState;
    use crate::backend::store::{MemoryStore, NewUser, Store};

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("http://example.com/api/auth/me");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    async fn state_with_user(username: &str) -> (AppState, Uuid) {
        let store = MemoryStore::new();
        let user = store
            .insert_user(NewUser {
                email: "a@b.com".to_string(),
                password_hash: "hash".to_string(),
                name: "A".to_string(),
                username: username.to_string(),
            })
            .await
            .unwrap();
        (AppState::for_tests(store), user.id)
    }

    #[tokio::test]
    async fn test_missing_header() {
        let (state, _) = state_with_user("a_b").await;
        let result = authenticate(&parts_with(None), &state).await;
        assert!(matches!(result, Err(AuthRejection::MissingHeader)));
    }

    #[tokio::test]
    async fn test_malformed_header() {
        let (state, _) = state_with_user("a_b").await;
        for header in ["Token abc", "Bearer ", "bearer abc"] {
            let result = authenticate(&parts_with(Some(header)), &state).await;
            assert!(matches!(result, Err(AuthRejection::MalformedHeader)), "{header}");
        }
    }

    #[tokio::test]
    async fn test_invalid_and_expired_token() {
        let (state, user_id) = state_with_user("a_b").await;

        let result = authenticate(&parts_with(Some("Bearer not.a.token")), &state).await;
        assert!(matches!(result, Err(AuthRejection::InvalidToken(SessionError::Invalid))));

        let stale = state
            .sessions
            .create_token_at(user_id, Utc::now() - Duration::days(8))
            .unwrap();
        let result = authenticate(&parts_with(Some(&format!("Bearer {stale}"))), &state).await;
        assert!(matches!(result, Err(AuthRejection::InvalidToken(SessionError::Expired))));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let (state, _) = state_with_user("a_b").await;
        let token = state.sessions.create_token(Uuid::new_v4()).unwrap();
        let result = authenticate(&parts_with(Some(&format!("Bearer {token}"))), &state).await;
        assert!(matches!(result, Err(AuthRejection::UserNotFound)));
    }

    #[tokio::test]
    async fn test_incomplete_identity() {
        let (state, user_id) = state_with_user("").await;
        let token = state.sessions.create_token(user_id).unwrap();
        let result = authenticate(&parts_with(Some(&format!("Bearer {token}"))), &state).await;
        assert!(matches!(result, Err(AuthRejection::IncompleteIdentity)));
    }

    #[tokio::test]
    async fn test_valid_token_resolves_identity() {
        let (state, user_id) = state_with_user("a_b").await;
        let token = state.sessions.create_token(user_id).unwrap();
        let user = authenticate(&parts_with(Some(&format!("Bearer {token}"))), &state)
            .await
            .unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.username, "a_b");
        assert_eq!(user.email, "a@b.com");
    }

    #[test]
    fn test_rejection_status_codes() {
        assert_eq!(AuthRejection::MissingHeader.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthRejection::IncompleteIdentity.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthRejection::Internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
