/**
 * Server Initialization
 *
 * This module builds the Axum application from a `ServerConfig`.
 *
 * # Initialization Process
 *
 * 1. Connect to PostgreSQL and run migrations, if configured
 * 2. Fall back to the in-memory store otherwise
 * 3. Build the session manager from the JWT secret and token lifetime
 * 4. Create the router with all routes and layers
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::auth::sessions::SessionManager;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;
use crate::backend::store::{MemoryStore, PgStore, Store};

/// Create and configure the Axum application
///
/// # Error Handling
///
/// The function is designed to be resilient:
/// - Missing database: the in-memory store is used
/// - Migration failures: logged, startup continues
pub async fn create_app(config: &ServerConfig) -> Router<()> {
    tracing::info!("Initializing blogify backend server");

    let store: Arc<dyn Store> = match load_database(config.database_url.as_deref()).await {
        Some(pool) => {
            tracing::info!("Using PostgreSQL store");
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::info!("Using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    app_with_store(config, store)
}

/// Build the application around an existing store
pub fn app_with_store(config: &ServerConfig, store: Arc<dyn Store>) -> Router<()> {
    let sessions = SessionManager::new(&config.jwt_secret, config.token_ttl);
    let app_state = AppState::new(store, sessions, config.bcrypt_cost);

    let app = create_router(app_state, config);
    tracing::info!("Router configured");
    app
}
