/**
 * Blog Collection Handlers
 *
 * # Routes
 *
 * - `GET    /api/blog-collections` - public collections, newest first
 * - `POST   /api/blog-collections` - create (bearer)
 * - `GET    /api/blog-collections/my-collections` - caller's collections (bearer)
 * - `GET    /api/blog-collections/{id}` - one collection with its articles
 * - `GET    /api/blog-collections/by-subdomain/{subdomain}` - same, by subdomain
 * - `PUT    /api/blog-collections/{id}` - update (bearer, owner)
 * - `DELETE /api/blog-collections/{id}` - delete with its articles (bearer, owner)
 *
 * Private collections are readable only by their owner.
 */

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::backend::collections::validation::{validate_create, validate_update};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::auth::{AuthUser, AuthenticatedUser, Viewer};
use crate::backend::server::state::AppState;
use crate::backend::slug::{validate_subdomain, with_unique_slug};
use crate::backend::store::{
    Collection, CollectionChanges, NewCollection, Page, Store, UniqueField,
};
use crate::shared::blog::{
    total_pages, CollectionListResponse, CollectionResponse, CreateCollectionRequest, ListQuery,
    MessageResponse, UpdateCollectionRequest,
};
use crate::shared::SharedError;

const PRIVATE_DETAIL: &str = "This blog collection is private";

/// Parse a collection id from the path; anything malformed is a 404
pub(crate) fn parse_collection_id(raw: &str) -> BackendResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| collection_not_found())
}

pub(crate) fn collection_not_found() -> BackendError {
    BackendError::not_found(
        "Blog collection not found",
        "The specified blog collection does not exist",
    )
}

/// Load a collection or fail with 404
pub(crate) async fn load_collection(store: &dyn Store, id: Uuid) -> BackendResult<Collection> {
    store.collection_by_id(id).await?.ok_or_else(collection_not_found)
}

/// Load a collection the caller must own, failing with 404 or 403
pub(crate) async fn load_owned_collection(
    store: &dyn Store,
    id: Uuid,
    user: &AuthenticatedUser,
    detail: &str,
) -> BackendResult<Collection> {
    let collection = load_collection(store, id).await?;
    if !user.owns(collection.owner_id) {
        tracing::warn!(
            "User {} attempted to modify collection {} owned by {}",
            user.user_id,
            collection.id,
            collection.owner_id
        );
        return Err(BackendError::forbidden(detail));
    }
    Ok(collection)
}

/// Full single-collection response with articles
async fn with_articles(store: &dyn Store, collection: Collection) -> BackendResult<CollectionResponse> {
    let articles = store.articles_in_collection(collection.id).await?;
    Ok(collection.into_response_with(articles))
}

/// `GET /api/blog-collections?page&limit`
pub async fn list_collections(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> BackendResult<Json<CollectionListResponse>> {
    let page = Page::new(query.page(), query.limit());
    let result = state.store.public_collections(page).await?;

    tracing::debug!("Listed {} public collections (page {})", result.items.len(), page.page);

    Ok(Json(CollectionListResponse {
        collections: result.items.into_iter().map(Collection::into_response).collect(),
        current_page: page.page,
        total_pages: total_pages(result.total, page.limit),
        total_collections: result.total,
    }))
}

/// `POST /api/blog-collections`
///
/// # Errors
///
/// * `400 Bad Request` - invalid name, description, cover image or subdomain
/// * `401 Unauthorized` - no valid bearer token
/// * `409 Conflict` - the subdomain (explicit or derived) is already taken
pub async fn create_collection(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<CreateCollectionRequest>, JsonRejection>,
) -> BackendResult<(StatusCode, Json<CollectionResponse>)> {
    let Json(request) = payload?;
    let input = validate_create(&request)?;
    let store = state.store.as_ref();

    let template = NewCollection {
        name: input.name.clone(),
        slug: String::new(),
        subdomain: input.subdomain,
        description: input.description,
        owner_id: user.user_id,
        is_public: input.is_public,
        cover_image: input.cover_image,
    };

    let collection = with_unique_slug(&input.name, UniqueField::CollectionSlug, |slug| {
        let new = NewCollection {
            slug,
            ..template.clone()
        };
        async move { store.insert_collection(new).await }
    })
    .await
    .map_err(|e| {
        tracing::warn!("Failed to create collection {:?} for {}: {}", template.name, user.username, e);
        BackendError::from(e)
    })?;

    tracing::info!(
        "Collection created: {} (slug {}, subdomain {}) by {}",
        collection.name,
        collection.slug,
        collection.subdomain,
        user.username
    );

    Ok((StatusCode::CREATED, Json(collection.into_response_with(Vec::new()))))
}

/// `GET /api/blog-collections/my-collections`
pub async fn my_collections(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> BackendResult<Json<Vec<CollectionResponse>>> {
    let collections = state.store.collections_by_owner(user.user_id).await?;
    Ok(Json(collections.into_iter().map(Collection::into_response).collect()))
}

/// `GET /api/blog-collections/{id}`
pub async fn get_collection(
    State(state): State<AppState>,
    Path(id): Path<String>,
    viewer: Viewer,
) -> BackendResult<Json<CollectionResponse>> {
    let id = parse_collection_id(&id)?;
    let store = state.store.as_ref();
    let collection = load_collection(store, id).await?;

    if !collection.is_public {
        viewer.require_owner(collection.owner_id, PRIVATE_DETAIL)?;
    }

    Ok(Json(with_articles(store, collection).await?))
}

/// `GET /api/blog-collections/by-subdomain/{subdomain}`
pub async fn get_collection_by_subdomain(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
    viewer: Viewer,
) -> BackendResult<Json<CollectionResponse>> {
    let store = state.store.as_ref();
    let collection = store
        .collection_by_subdomain(&subdomain.trim().to_lowercase())
        .await?
        .ok_or_else(collection_not_found)?;

    if !collection.is_public {
        viewer.require_owner(collection.owner_id, PRIVATE_DETAIL)?;
    }

    Ok(Json(with_articles(store, collection).await?))
}

/// `PUT /api/blog-collections/{id}`
///
/// A changed name regenerates the slug. The subdomain cannot change.
pub async fn update_collection(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCollectionRequest>, JsonRejection>,
) -> BackendResult<Json<CollectionResponse>> {
    let Json(request) = payload?;
    let id = parse_collection_id(&id)?;
    let store = state.store.as_ref();

    let current = load_owned_collection(
        store,
        id,
        &user,
        "You can only update your own blog collections",
    )
    .await?;

    let patch = validate_update(&request)?;

    if let Some(requested) = &patch.subdomain {
        let requested = validate_subdomain(requested)?;
        if requested != current.subdomain {
            return Err(SharedError::validation(
                "subdomain",
                "Subdomain cannot be changed once it has been set",
            )
            .into());
        }
    }

    let renamed = patch.name.clone().filter(|name| *name != current.name);
    let changes = CollectionChanges {
        name: patch.name,
        slug: None,
        description: patch.description,
        is_public: patch.is_public,
        cover_image: patch.cover_image,
    };

    let updated = match renamed {
        Some(name) => {
            with_unique_slug(&name, UniqueField::CollectionSlug, |slug| {
                let changes = CollectionChanges {
                    slug: Some(slug),
                    ..changes.clone()
                };
                async move { store.update_collection(id, changes).await }
            })
            .await?
        }
        None if changes.is_empty() => Some(current),
        None => store.update_collection(id, changes).await?,
    }
    .ok_or_else(collection_not_found)?;

    tracing::info!("Collection {} updated by {}", updated.id, user.username);

    Ok(Json(with_articles(store, updated).await?))
}

/// `DELETE /api/blog-collections/{id}`
///
/// Deletes the collection and every article in it.
pub async fn delete_collection(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> BackendResult<Json<MessageResponse>> {
    let id = parse_collection_id(&id)?;
    let store = state.store.as_ref();

    load_owned_collection(
        store,
        id,
        &user,
        "You can only delete your own blog collections",
    )
    .await?;

    if !store.delete_collection(id).await? {
        return Err(collection_not_found());
    }

    tracing::info!("Collection {} deleted by {}", id, user.username);

    Ok(Json(MessageResponse::new("Blog collection deleted successfully")))
}
