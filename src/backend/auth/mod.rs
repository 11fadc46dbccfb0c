//! Authentication Module
//!
//! This module handles user registration, login and session tokens.
//!
//! # Architecture
//!
//! The auth module is organized into focused submodules:
//!
//! - **`users`** - Input validation, normalisation, password hashing
//! - **`sessions`** - JWT token generation and validation
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User input rules and password hashing
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs      - Handler exports
//!     ├── register.rs - User registration handler
//!     ├── login.rs    - User authentication handler
//!     └── me.rs       - Get current user handler
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: email, password, name, username → user created → token returned
//! 2. **Login**: email and password → credentials verified → token returned
//! 3. **Get Me**: token → verified → user info returned
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt before storage
//! - Tokens carry only the user id and expire after 7 days
//! - Invalid credentials return 401 without saying which part was wrong

/// User input rules and password hashing
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{get_me, login, register};
pub use sessions::{Claims, SessionError, SessionManager};
