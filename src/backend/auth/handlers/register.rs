/**
 * Register Handler
 *
 * This module implements the user registration handler for
 * `POST /api/auth/register`.
 *
 * # Registration Process
 *
 * 1. Validate all fields, normalise email and username
 * 2. Check that email and username are free
 * 3. Hash password using bcrypt
 * 4. Create the user
 * 5. Issue a bearer token
 *
 * # Errors
 *
 * Every failure the caller can fix, including a taken email or username,
 * is a 400 with `message: "Registration failed"`.
 */

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use crate::backend::auth::users::{hash_password, validate_registration};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;
use crate::backend::store::{NewUser, StoreError, UniqueField};
use crate::shared::auth::{AuthResponse, RegisterRequest, UserResponse};

const FAILED: &str = "Registration failed";

/// Register handler
///
/// # Example Request
///
/// ```http
/// POST /api/auth/register HTTP/1.1
/// Content-Type: application/json
///
/// {"email": "a@b.com", "password": "secret1", "name": "A", "username": "a_b"}
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
///   "user": {"id": "...", "email": "a@b.com", "name": "A", "username": "a_b"}
/// }
/// ```
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> BackendResult<(StatusCode, Json<AuthResponse>)> {
    let Json(request) = payload?;

    let registration = validate_registration(&request).map_err(|e| {
        tracing::warn!("Registration rejected: {}", e);
        BackendError::bad_request(FAILED, e.to_string())
    })?;

    tracing::info!(
        "Register request for username: {}, email: {}",
        registration.username,
        registration.email
    );

    if state.store.user_by_email(&registration.email).await?.is_some() {
        tracing::warn!("Email already exists: {}", registration.email);
        return Err(BackendError::bad_request(FAILED, "User with this email already exists"));
    }

    let password_hash = hash_password(&registration.password, state.bcrypt_cost).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        BackendError::internal("Error creating user")
    })?;

    let user = state
        .store
        .insert_user(NewUser {
            email: registration.email,
            password_hash,
            name: registration.name,
            username: registration.username,
        })
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(UniqueField::Email) => {
                BackendError::bad_request(FAILED, "User with this email already exists")
            }
            StoreError::Duplicate(UniqueField::Username) => {
                BackendError::bad_request(FAILED, "Username is already taken")
            }
            other => BackendError::from(other),
        })?;

    let token = state.sessions.create_token(user.id).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        BackendError::internal("Error creating user")
    })?;

    tracing::info!("User registered successfully: {} ({})", user.email, user.username);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserResponse::from(&user),
        }),
    ))
}
