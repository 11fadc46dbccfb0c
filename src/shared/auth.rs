//! Authentication wire types
//!
//! Request and response bodies for `/api/auth/*`, shared by the server
//! handlers and the API client.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration request
///
/// Fields default to empty so that a missing field is reported as a
/// validation error rather than a JSON rejection.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct RegisterRequest {
    /// User's email address (stored lowercase)
    #[serde(default)]
    pub email: String,
    /// User's password (hashed before storage)
    #[serde(default)]
    pub password: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Public author identifier, `[a-zA-Z0-9_-]+`
    #[serde(default)]
    pub username: String,
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Returned by register and login.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    /// Bearer token (7-day expiration)
    pub token: String,
    /// User information (without sensitive data)
    pub user: UserResponse,
}

/// User information that is safe to return to clients
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    /// Display name
    pub name: String,
    pub username: String,
}

/// Body of `GET /api/auth/me`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MeResponse {
    pub user: UserResponse,
}
