//! Backend Module
//!
//! This module contains all server-side code for Blogify: an Axum HTTP
//! server exposing the REST API for users, blog collections and articles.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Configuration, application state, app creation
//! - **`routes`** - HTTP route table and router assembly
//! - **`auth`** - Registration, login, JWT sessions, password hashing
//! - **`middleware`** - Bearer token gate (`AuthUser`, `Viewer`)
//! - **`collections`** - Blog collection handlers and validation
//! - **`articles`** - Article handlers, feed search, share counters
//! - **`slug`** - Slug and subdomain assignment
//! - **`store`** - `Store` trait with PostgreSQL and in-memory backends
//! - **`error`** - Backend error taxonomy and JSON rendering
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request extractors
//! ├── collections/    - Blog collections
//! ├── articles/       - Articles
//! ├── slug.rs         - Slugs and subdomains
//! ├── store/          - Persistence
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` holds the store behind `Arc<dyn Store>`, the session manager
//! and the bcrypt cost. Handlers take it whole through `State<AppState>`.
//!
//! # Error Handling
//!
//! Handlers return `BackendResult<T>`; every error renders as
//! `{"message", "error", "field"?}` with its HTTP status.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication and user management
pub mod auth;

/// Request extractors
pub mod middleware;

/// Blog collections
pub mod collections;

/// Articles inside collections
pub mod articles;

/// Slug and subdomain assignment
pub mod slug;

/// Persistence
pub mod store;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use error::BackendError;
pub use server::create_app;
