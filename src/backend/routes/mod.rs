//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Architecture
//!
//! - **`router`** - Router assembly, layers and fallback
//! - **`api_routes`** - The `/api` route table
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - API endpoint table
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use blogify::backend::routes::create_router;
//! use blogify::backend::server::{config::ServerConfig, state::AppState};
//! use blogify::backend::auth::SessionManager;
//! use blogify::backend::store::MemoryStore;
//!
//! let config = ServerConfig::default();
//! let sessions = SessionManager::new(&config.jwt_secret, config.token_ttl);
//! let state = AppState::new(Arc::new(MemoryStore::new()), sessions, config.bcrypt_cost);
//! let router = create_router(state, &config);
//! ```

/// Main router creation
pub mod router;

/// API endpoint table
pub mod api_routes;

pub use router::create_router;
