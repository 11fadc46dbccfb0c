//! Server Module
//!
//! This module contains the code that initializes and configures the Axum
//! HTTP server.
//!
//! # Architecture
//!
//! The server module is organized into focused submodules:
//!
//! - **`state`** - Application state shared by the handlers
//! - **`config`** - Environment configuration and database loading
//! - **`init`** - Store selection and app creation
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState
//! ├── config.rs       - ServerConfig and load_database
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `ServerConfig::from_env`
//! 2. **Store Selection**: PostgreSQL when reachable, memory otherwise
//! 3. **Router Creation**: Configures all routes and layers
//!
//! # Example
//!
//! ```rust,no_run
//! use blogify::backend::server::{config::ServerConfig, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(&config).await;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use config::{ServerConfig, MAX_BCRYPT_COST, MIN_BCRYPT_COST};
pub use init::{app_with_store, create_app};
pub use state::AppState;
