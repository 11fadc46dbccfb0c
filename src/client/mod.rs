//! API Client Module
//!
//! Async typed client for the Blogify REST API.
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs          - Module exports and documentation
//! ├── api.rs          - BlogifyClient, one method per endpoint
//! ├── error.rs        - ClientError
//! └── token_store.rs  - Bearer token persistence
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use blogify::client::BlogifyClient;
//! use blogify::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let client = BlogifyClient::connect(&config).await?;
//! client.login("ann@example.com", "secret1").await?;
//! let mine = client.my_collections().await?;
//! # Ok(())
//! # }
//! ```

/// REST API client
pub mod api;

/// Client error types
pub mod error;

/// Token persistence
pub mod token_store;

pub use api::{BlogifyClient, LegacyLookup};
pub use error::{ClientError, ClientResult};
pub use token_store::TokenStore;
