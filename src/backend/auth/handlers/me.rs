/**
 * Get Current User Handler
 *
 * `GET /api/auth/me`. Verifies the bearer token itself rather than going
 * through the full gate, so a token for a deleted user is a 404 here.
 */

use axum::{extract::State, http::HeaderMap, Json};

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::auth::{bearer_token, AuthRejection};
use crate::backend::server::state::AppState;
use crate::shared::auth::{MeResponse, UserResponse};

/// Get current user handler
///
/// # Errors
///
/// * `401 Unauthorized` - missing, malformed, invalid or expired token
/// * `404 Not Found` - token is valid but the user no longer exists
/// * `500 Internal Server Error` - store failure
pub async fn get_me(State(state): State<AppState>, headers: HeaderMap) -> BackendResult<Json<MeResponse>> {
    let token = bearer_token(&headers)?;

    let claims = state.sessions.verify_token(token).map_err(|e| {
        tracing::warn!("Invalid token on /me: {:?}", e);
        AuthRejection::InvalidToken(e)
    })?;
    let user_id = claims.user_id().map_err(AuthRejection::InvalidToken)?;

    let user = state.store.user_by_id(user_id).await?.ok_or_else(|| {
        tracing::warn!("User not found: {}", user_id);
        BackendError::not_found("User not found", "The user for this token no longer exists")
    })?;

    Ok(Json(MeResponse {
        user: UserResponse::from(&user),
    }))
}
