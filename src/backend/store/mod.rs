//! Store Module
//!
//! Persistence for users, blog collections and articles behind a single
//! `Store` trait. Handlers only see `Arc<dyn Store>`, so the same routes run
//! against PostgreSQL in production and against memory in development and
//! tests.
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── mod.rs       - Store trait and error types
//! ├── models.rs    - Row types and insert/patch payloads
//! ├── postgres.rs  - PgStore (sqlx)
//! └── memory.rs    - MemoryStore (tokio RwLock)
//! ```
//!
//! # Uniqueness
//!
//! Both implementations enforce the same constraints and report a violation
//! as `StoreError::Duplicate` naming the field:
//!
//! - user email, user username
//! - collection slug, collection subdomain
//! - article slug within its collection
//!
//! Articles are stored as their own records, so writes to two articles of
//! the same collection never overwrite each other. Deleting a collection
//! deletes its articles.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::shared::SharePlatform;

/// Row types and payloads
pub mod models;

/// PostgreSQL implementation
pub mod postgres;

/// In-memory implementation
pub mod memory;

pub use memory::MemoryStore;
pub use models::{
    Article, ArticleChanges, ArticleSearch, ArticleShares, Collection, CollectionChanges,
    NewArticle, NewCollection, NewUser, Page, Paged, PublicArticle, User,
};
pub use postgres::PgStore;

/// Field whose uniqueness constraint was violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Username,
    CollectionSlug,
    Subdomain,
    ArticleSlug,
}

impl UniqueField {
    /// Map a PostgreSQL constraint name from the migrations
    pub fn from_constraint(name: &str) -> Option<Self> {
        match name {
            "users_email_key" => Some(Self::Email),
            "users_username_key" => Some(Self::Username),
            "blog_collections_slug_key" => Some(Self::CollectionSlug),
            "blog_collections_subdomain_key" => Some(Self::Subdomain),
            "articles_collection_slug_key" => Some(Self::ArticleSlug),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Username => "username",
            Self::CollectionSlug => "slug",
            Self::Subdomain => "subdomain",
            Self::ArticleSlug => "slug",
        }
    }
}

/// Persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate {}", .0.as_str())]
    Duplicate(UniqueField),
    /// Search pattern the database regex engine refused
    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),
    #[error("database error: {0}")]
    Database(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations used by the HTTP handlers
///
/// Listing methods return newest first. `None` / `false` results mean the
/// addressed row does not exist.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;
    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn insert_collection(&self, collection: NewCollection) -> StoreResult<Collection>;
    async fn collection_by_id(&self, id: Uuid) -> StoreResult<Option<Collection>>;
    async fn collection_by_subdomain(&self, subdomain: &str) -> StoreResult<Option<Collection>>;
    /// Public collections only
    async fn public_collections(&self, page: Page) -> StoreResult<Paged<Collection>>;
    /// Every collection of `owner_id`, public or not
    async fn collections_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Collection>>;
    async fn update_collection(&self, id: Uuid, changes: CollectionChanges) -> StoreResult<Option<Collection>>;
    /// Deletes the collection and all of its articles
    async fn delete_collection(&self, id: Uuid) -> StoreResult<bool>;

    async fn insert_article(&self, article: NewArticle) -> StoreResult<Article>;
    /// Articles of one collection in creation order
    async fn articles_in_collection(&self, collection_id: Uuid) -> StoreResult<Vec<Article>>;
    async fn article_by_slug(&self, collection_id: Uuid, slug: &str) -> StoreResult<Option<Article>>;
    async fn article_by_id(&self, id: Uuid) -> StoreResult<Option<Article>>;
    async fn update_article(
        &self,
        collection_id: Uuid,
        slug: &str,
        changes: ArticleChanges,
    ) -> StoreResult<Option<Article>>;
    async fn delete_article(&self, collection_id: Uuid, slug: &str) -> StoreResult<bool>;
    /// Atomically bumps the total and, for a known platform, its counter
    async fn increment_share(
        &self,
        collection_id: Uuid,
        slug: &str,
        platform: Option<SharePlatform>,
    ) -> StoreResult<bool>;
    /// Articles of public collections, optionally filtered
    async fn search_public_articles(&self, search: ArticleSearch) -> StoreResult<Paged<PublicArticle>>;
}
