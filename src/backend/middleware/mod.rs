//! Middleware Module
//!
//! This module contains request-processing code that runs before handlers.
//!
//! # Architecture
//!
//! The middleware module currently provides:
//!
//! - **`auth`** - Bearer-token gate and the `AuthUser` / `Viewer` extractors
//!
//! # Example
//!
//! ```rust,ignore
//! use blogify::backend::middleware::AuthUser;
//!
//! async fn my_collections(AuthUser(user): AuthUser) { /* ... */ }
//! ```

pub mod auth;

pub use auth::{AuthRejection, AuthUser, AuthenticatedUser, Viewer};
