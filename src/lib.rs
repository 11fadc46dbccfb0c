//! Blogify - Main Library
//!
//! Blogify is a multi-tenant blogging platform: users register, create named
//! blog collections (each bound to a unique subdomain), and publish, edit and
//! delete articles inside those collections. A REST API backs a single-page
//! browser client.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types shared between the server and its clients
//!   - Auth request/response bodies, collection and article payloads
//!   - Field validation errors
//!   - Client configuration
//!
//! - **`backend`** - Server-side code (only compiled with the `ssr` feature)
//!   - Axum HTTP server, routes and the bearer auth gate
//!   - Slug and subdomain assignment
//!   - Storage behind the `Store` trait (Postgres or in-memory)
//!
//! - **`client`** - Async typed API client with a file-backed token store
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend modules and their dependencies
//!
//! # Usage
//!
//! ```rust,no_run
//! use blogify::backend::server::{init::create_app, config::ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(&config).await;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

/// HTTP client for the REST API
pub mod client;
