/**
 * API Route Table
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /api/auth/register` - User registration
 * - `POST /api/auth/login` - User login
 * - `GET  /api/auth/me` - Current user (bearer)
 *
 * ## Blog collections
 * - `GET|POST /api/blog-collections`
 * - `GET /api/blog-collections/my-collections` (bearer)
 * - `GET /api/blog-collections/by-subdomain/{subdomain}`
 * - `GET|PUT|DELETE /api/blog-collections/{id}`
 *
 * ## Articles
 * - `GET /api/blogs` - public feed
 * - `GET /api/blogs/{legacy_id}` - retired single-id lookup (301/410)
 * - `POST /api/blogs/{collection_id}` - create an article (bearer)
 * - `GET|PATCH|DELETE /api/blogs/{collection_id}/{slug}`
 * - `POST /api/blogs/{collection_id}/{slug}/share`
 */

use axum::{
    routing::{get, post},
    Router,
};

use crate::backend::articles::{
    create_article, delete_article, get_article, legacy_article, list_articles, share_article,
    update_article,
};
use crate::backend::auth::{get_me, login, register};
use crate::backend::collections::{
    create_collection, delete_collection, get_collection, get_collection_by_subdomain,
    list_collections, my_collections, update_collection,
};
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// Authentication is checked per handler through the `AuthUser` and
/// `Viewer` extractors, so every route is registered on the same router.
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Authentication endpoints
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(get_me))
        // Blog collections
        .route(
            "/api/blog-collections",
            get(list_collections).post(create_collection),
        )
        .route("/api/blog-collections/my-collections", get(my_collections))
        .route(
            "/api/blog-collections/by-subdomain/{subdomain}",
            get(get_collection_by_subdomain),
        )
        .route(
            "/api/blog-collections/{id}",
            get(get_collection)
                .put(update_collection)
                .delete(delete_collection),
        )
        // Articles
        .route("/api/blogs", get(list_articles))
        // Single-segment GET is the retired lookup, POST creates in that collection.
        // Sibling routes must share the parameter name.
        .route(
            "/api/blogs/{collection_id}",
            get(legacy_article).post(create_article),
        )
        .route(
            "/api/blogs/{collection_id}/{article_slug}",
            get(get_article).patch(update_article).delete(delete_article),
        )
        .route(
            "/api/blogs/{collection_id}/{article_slug}/share",
            post(share_article),
        )
}
