//! Authentication Handlers Module
//!
//! This module contains all HTTP handlers for authentication endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs        - Module exports and documentation
//! ├── register.rs   - User registration handler
//! ├── login.rs      - User authentication handler
//! └── me.rs         - Get current user handler
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register - User registration
//! - **`login`** - POST /api/auth/login - User authentication
//! - **`get_me`** - GET /api/auth/me - Get current user info
//!
//! Request and response bodies live in `shared::auth` so the API client
//! uses the same types.

/// Register handler
pub mod register;

/// Login handler
pub mod login;

/// Get current user handler
pub mod me;

pub use login::login;
pub use me::get_me;
pub use register::register;
