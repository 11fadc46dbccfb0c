//! Shared Module
//!
//! This module contains types that are shared between the server and its
//! clients. All types are designed for serialization and transmission over
//! the REST API.

/// Authentication request/response bodies
pub mod auth;

/// Collection and article payloads
pub mod blog;

/// Shared error types
pub mod error;

/// Client configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use error::{ErrorBody, SharedError};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use blog::SharePlatform;
