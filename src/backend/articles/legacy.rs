/**
 * Legacy Article Lookup
 *
 * `GET /api/blogs/{legacy_id}` predates collections. Ids that still resolve
 * to an article answer `301` with the new location in the body only (no
 * `Location` header, so clients do not follow it blindly); everything
 * else answers `410 Gone`. Articles in a private collection resolve only
 * for its owner, anyone else gets the same `410` as an unknown id.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::backend::error::BackendResult;
use crate::backend::middleware::Viewer;
use crate::backend::server::state::AppState;
use crate::shared::blog::{LegacyGoneResponse, LegacyRedirectResponse};

pub const MOVED_CODE: &str = "REDIRECT_TO_NEW_FORMAT";
pub const GONE_CODE: &str = "API_STRUCTURE_CHANGED";

/// `GET /api/blogs/{legacy_id}`
pub async fn legacy_article(
    State(state): State<AppState>,
    Path(legacy_id): Path<String>,
    viewer: Viewer,
) -> BackendResult<Response> {
    let store = state.store.as_ref();

    if let Ok(id) = Uuid::parse_str(&legacy_id) {
        if let Some(article) = store.article_by_id(id).await? {
            if let Some(collection) = store
                .collection_by_id(article.collection_id)
                .await?
                .filter(|c| c.is_public || viewer.user().is_some_and(|u| u.owns(c.owner_id)))
            {
                let new_url = format!("/blogs/{}/{}", collection.id, article.slug);
                tracing::info!("Redirecting legacy article id {} to {}", legacy_id, new_url);

                let body = LegacyRedirectResponse {
                    code: MOVED_CODE.to_string(),
                    message: "This article is now available at a new URL".to_string(),
                    new_url,
                    collection_id: collection.id,
                    article_slug: article.slug,
                    collection_name: collection.name,
                };
                return Ok((StatusCode::MOVED_PERMANENTLY, Json(body)).into_response());
            }
        }
    }

    tracing::debug!("Legacy article id {} no longer resolves", legacy_id);

    let body = LegacyGoneResponse {
        code: GONE_CODE.to_string(),
        message: format!("The blog ID format {legacy_id} you're using is deprecated"),
        error: "This endpoint is no longer supported. Blogs are now accessed via collection ID and article slug: /api/blogs/:collectionId/:articleSlug".to_string(),
        legacy_id,
    };
    Ok((StatusCode::GONE, Json(body)).into_response())
}
