/**
 * Application State Management
 *
 * This module defines the state shared by every handler.
 *
 * # Architecture
 *
 * The `AppState` struct holds:
 * - the `Store` every handler persists through
 * - the `SessionManager` that issues and verifies bearer tokens
 * - the bcrypt cost used for new password hashes
 *
 * # Example
 *
 * ```rust,ignore
 * use axum::extract::State;
 * use blogify::backend::server::state::AppState;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let user = state.store.user_by_email("a@b.com").await;
 * }
 * ```
 */

use std::sync::Arc;

use crate::backend::auth::sessions::SessionManager;
use crate::backend::store::Store;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend
    pub store: Arc<dyn Store>,

    /// Bearer token issuer and verifier
    pub sessions: SessionManager,

    /// bcrypt cost for new password hashes
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, sessions: SessionManager, bcrypt_cost: u32) -> Self {
        Self {
            store,
            sessions,
            bcrypt_cost,
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(store: impl Store + 'static) -> Self {
        Self::new(
            Arc::new(store),
            SessionManager::new("test-secret", chrono::Duration::days(7)),
            crate::backend::server::config::MIN_BCRYPT_COST,
        )
    }
}
