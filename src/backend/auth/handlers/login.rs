/**
 * Login Handler
 *
 * This module implements the user authentication handler for
 * `POST /api/auth/login`.
 *
 * # Security
 *
 * An unknown email and a wrong password produce the same 401 body.
 */

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use crate::backend::auth::users::{normalize_email, verify_password};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;
use crate::shared::auth::{AuthResponse, LoginRequest, UserResponse};

const FAILED: &str = "Login failed";

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - email or password missing
/// * `401 Unauthorized` - no such user or wrong password
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> BackendResult<Json<AuthResponse>> {
    let Json(request) = payload?;
    let email = normalize_email(&request.email);

    if email.is_empty() || request.password.is_empty() {
        return Err(BackendError::bad_request(FAILED, "Email and password are required"));
    }

    let invalid = || {
        BackendError::handler(StatusCode::UNAUTHORIZED, FAILED, "Invalid email or password")
    };

    let user = match state.store.user_by_email(&email).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Login failed: no user with email {}", email);
            return Err(invalid());
        }
    };

    if !verify_password(&request.password, &user.password_hash) {
        tracing::warn!("Login failed: incorrect password for {}", email);
        return Err(invalid());
    }

    let token = state.sessions.create_token(user.id).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        BackendError::internal("Error logging in")
    })?;

    tracing::info!("User logged in successfully: {}", email);

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(&user),
    }))
}
