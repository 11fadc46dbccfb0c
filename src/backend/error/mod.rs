//! Backend Error Module
//!
//! This module defines the error type returned by HTTP handlers and its
//! conversion into JSON responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! # Error Taxonomy
//!
//! | Kind | Status |
//! |------|--------|
//! | validation | 400 |
//! | authentication | 401 |
//! | authorization | 403 |
//! | not found | 404 |
//! | conflict | 409 |
//! | internal | 500 |
//!
//! The retired legacy article route answers 410 with its own body rather
//! than through this type.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;

/// Result alias for handlers
pub type BackendResult<T> = Result<T, BackendError>;
