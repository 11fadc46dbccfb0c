/**
 * Article Handlers
 *
 * # Routes
 *
 * - `GET    /api/blogs?page&limit&search` - feed across public collections
 * - `GET    /api/blogs/{collection_id}/{slug}` - one article
 * - `POST   /api/blogs/{collection_id}` - create (bearer, owner)
 * - `PATCH  /api/blogs/{collection_id}/{slug}` - update (bearer, owner)
 * - `DELETE /api/blogs/{collection_id}/{slug}` - delete (bearer, owner)
 * - `POST   /api/blogs/{collection_id}/{slug}/share` - count a share (no auth)
 *
 * Articles are addressed by `(collection_id, slug)`. A changed title gives
 * the article a new slug, and the old one stops resolving.
 */

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::backend::articles::validation::{search_pattern, validate_create, validate_patch};
use crate::backend::collections::handlers::{
    collection_not_found, load_collection, load_owned_collection, parse_collection_id,
};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::auth::{AuthUser, Viewer};
use crate::backend::server::state::AppState;
use crate::backend::slug::with_unique_slug;
use crate::backend::store::{
    Article, ArticleChanges, ArticleSearch, NewArticle, Page, Store, StoreError, UniqueField,
};
use crate::shared::blog::{
    total_pages, ArticleCreatedResponse, ArticleDetailResponse, ArticleListItem,
    ArticleListResponse, ArticleResponse, ArticleUpdatedResponse, CreateArticleRequest, ListQuery,
    MessageResponse, ShareRequest, UpdateArticleRequest,
};
use crate::shared::SharePlatform;

fn article_not_found() -> BackendError {
    BackendError::not_found(
        "Article not found",
        "The specified article does not exist in this collection",
    )
}

async fn load_article(store: &dyn Store, collection_id: Uuid, slug: &str) -> BackendResult<Article> {
    store
        .article_by_slug(collection_id, slug)
        .await?
        .ok_or_else(article_not_found)
}

/// `GET /api/blogs?page&limit&search`
///
/// `search` is a case-insensitive regular expression matched against
/// title and content.
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> BackendResult<Json<ArticleListResponse>> {
    let page = Page::new(query.page(), query.limit());
    let pattern = query.search().map(search_pattern).transpose()?;

    let result = state
        .store
        .search_public_articles(ArticleSearch { page, pattern })
        .await?;

    tracing::debug!(
        "Retrieved {} articles (page {}, limit {})",
        result.items.len(),
        page.page,
        page.limit
    );

    Ok(Json(ArticleListResponse {
        articles: result.items.into_iter().map(ArticleListItem::from).collect(),
        current_page: page.page,
        total_pages: total_pages(result.total, page.limit),
        total_articles: result.total,
    }))
}

/// `GET /api/blogs/{collection_id}/{slug}`
///
/// Articles of a private collection follow the collection's visibility.
pub async fn get_article(
    State(state): State<AppState>,
    Path((collection_id, slug)): Path<(String, String)>,
    viewer: Viewer,
) -> BackendResult<Json<ArticleDetailResponse>> {
    let collection_id = parse_collection_id(&collection_id)?;
    let store = state.store.as_ref();
    let collection = load_collection(store, collection_id).await?;

    if !collection.is_public {
        viewer.require_owner(collection.owner_id, "This blog collection is private")?;
    }

    let article = load_article(store, collection.id, &slug).await?;

    Ok(Json(ArticleDetailResponse {
        article: ArticleResponse::from(article),
        collection_name: collection.name,
        owner_username: collection.owner_username,
    }))
}

/// `POST /api/blogs/{collection_id}`
///
/// # Errors
///
/// * `400 Bad Request` - missing or invalid title/content
/// * `403 Forbidden` - caller does not own the collection
/// * `404 Not Found` - no such collection
pub async fn create_article(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(collection_id): Path<String>,
    payload: Result<Json<CreateArticleRequest>, JsonRejection>,
) -> BackendResult<(StatusCode, Json<ArticleCreatedResponse>)> {
    let Json(request) = payload?;
    let collection_id = parse_collection_id(&collection_id)?;
    let store = state.store.as_ref();

    let collection = load_owned_collection(
        store,
        collection_id,
        &user,
        "You can only create articles in your own blog collections",
    )
    .await?;

    let input = validate_create(&request)?;

    let article = with_unique_slug(&input.title, UniqueField::ArticleSlug, |slug| {
        let new = NewArticle {
            collection_id,
            title: input.title.clone(),
            slug,
            content: input.content.clone(),
        };
        async move { store.insert_article(new).await }
    })
    .await?;

    tracing::info!(
        "Article {} created in collection {} by {}",
        article.slug,
        collection.id,
        user.username
    );

    Ok((
        StatusCode::CREATED,
        Json(ArticleCreatedResponse {
            article: ArticleResponse::from(article),
            collection_name: collection.name,
            collection_slug: collection.slug,
            subdomain: collection.subdomain,
        }),
    ))
}

/// `PATCH /api/blogs/{collection_id}/{slug}`
///
/// A title that differs from the current one regenerates the slug; the new
/// slug never equals the old one.
pub async fn update_article(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((collection_id, slug)): Path<(String, String)>,
    payload: Result<Json<UpdateArticleRequest>, JsonRejection>,
) -> BackendResult<Json<ArticleUpdatedResponse>> {
    let Json(request) = payload?;
    let collection_id = parse_collection_id(&collection_id)?;
    let store = state.store.as_ref();

    let collection = load_owned_collection(
        store,
        collection_id,
        &user,
        "You can only update articles in your own blog collections",
    )
    .await?;

    let current = load_article(store, collection.id, &slug).await?;
    let patch = validate_patch(&request)?;

    let retitled = patch.title.clone().filter(|title| *title != current.title);
    let changes = ArticleChanges {
        title: patch.title,
        slug: None,
        content: patch.content,
    };

    let updated = match retitled {
        Some(title) => {
            let old_slug = current.slug.as_str();
            with_unique_slug(&title, UniqueField::ArticleSlug, |new_slug| {
                let changes = ArticleChanges {
                    slug: Some(new_slug.clone()),
                    ..changes.clone()
                };
                async move {
                    if new_slug == old_slug {
                        return Err(StoreError::Duplicate(UniqueField::ArticleSlug));
                    }
                    store.update_article(collection_id, old_slug, changes).await
                }
            })
            .await?
        }
        None => store.update_article(collection_id, &current.slug, changes).await?,
    }
    .ok_or_else(article_not_found)?;

    tracing::info!(
        "Article {} updated in collection {} (was {})",
        updated.slug,
        collection.id,
        current.slug
    );

    Ok(Json(ArticleUpdatedResponse {
        article: ArticleResponse::from(updated),
        collection_name: collection.name,
    }))
}

/// `DELETE /api/blogs/{collection_id}/{slug}`
pub async fn delete_article(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((collection_id, slug)): Path<(String, String)>,
) -> BackendResult<Json<MessageResponse>> {
    let collection_id = parse_collection_id(&collection_id)?;
    let store = state.store.as_ref();

    load_owned_collection(
        store,
        collection_id,
        &user,
        "You can only delete articles in your own blog collections",
    )
    .await?;

    if !store.delete_article(collection_id, &slug).await? {
        return Err(article_not_found());
    }

    tracing::info!("Article {} deleted from collection {} by {}", slug, collection_id, user.username);

    Ok(Json(MessageResponse::new("Article deleted successfully")))
}

/// `POST /api/blogs/{collection_id}/{slug}/share`
///
/// Unauthenticated. The body is optional; an unknown `platform` only
/// increments the total.
// TODO: rate-limit per client once a limiter layer exists; anonymous callers can inflate counters.
pub async fn share_article(
    State(state): State<AppState>,
    Path((collection_id, slug)): Path<(String, String)>,
    body: Bytes,
) -> BackendResult<Json<MessageResponse>> {
    let collection_id = parse_collection_id(&collection_id)?;

    let request: ShareRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ShareRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!("Invalid share body: {}", e);
            BackendError::bad_request("Invalid request body", e.to_string())
        })?
    };
    let platform = request.platform.as_deref().and_then(SharePlatform::from_tag);

    let store = state.store.as_ref();
    if store.collection_by_id(collection_id).await?.is_none() {
        return Err(collection_not_found());
    }

    if !store.increment_share(collection_id, &slug, platform).await? {
        return Err(article_not_found());
    }

    tracing::debug!(
        "Share recorded for {}/{} (platform {:?})",
        collection_id,
        slug,
        request.platform
    );

    Ok(Json(MessageResponse::new("Share count updated successfully")))
}
