/**
 * Router Configuration
 *
 * This module combines the API routes, the HTTP layers and the static
 * client into a single Axum router.
 *
 * # Route Order
 *
 * 1. API routes (auth, collections, articles)
 * 2. Fallback: unknown `/api/...` paths get a JSON 404, everything else is
 *    served from the static directory, with `index.html` for client-side
 *    routes
 *
 * # Layers
 *
 * - `TraceLayer` for request spans
 * - `CorsLayer` for the configured browser origins
 */

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, Method},
    response::{IntoResponse, Response},
    Router,
};
use tower::ServiceExt;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Store, session manager and hashing cost
/// * `config` - CORS origins and static directory
pub fn create_router(app_state: AppState, config: &ServerConfig) -> Router<()> {
    let static_files = ServeDir::new(&config.static_dir)
        .fallback(ServeFile::new(config.static_dir.join("index.html")));

    let router = configure_api_routes(Router::new());

    router
        .fallback(move |request: Request| {
            let static_files = static_files.clone();
            async move { fallback(static_files, request).await }
        })
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn fallback(static_files: ServeDir<ServeFile>, request: Request<Body>) -> Response {
    let path = request.uri().path();
    if path == "/api" || path.starts_with("/api/") {
        tracing::debug!("No API route for {} {}", request.method(), path);
        return BackendError::not_found(
            "Not found",
            format!("No API endpoint at {} {}", request.method(), path),
        )
        .into_response();
    }

    match static_files.oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}
