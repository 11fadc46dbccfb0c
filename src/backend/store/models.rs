/**
 * Persistence Models
 *
 * Row types shared by every `Store` implementation, plus the insert/patch
 * payloads handlers hand to the store. Conversions into the wire types of
 * `shared::auth` and `shared::blog` live here so handlers never build
 * responses field by field.
 */

use chrono::{DateTime, Utc};
use regex::Regex;
use uuid::Uuid;

use crate::shared::auth::UserResponse;
use crate::shared::blog::{ArticleListItem, ArticleResponse, CollectionResponse, ShareCounts};

/// User row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    /// Trimmed, lowercase
    pub email: String,
    pub password_hash: String,
    /// Display name
    pub name: String,
    /// Lowercase, `[a-z0-9_-]+`
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            username: user.username.clone(),
        }
    }
}

/// Insert payload for a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub username: String,
}

/// Collection row with its read-time joins
///
/// `owner_username` is resolved through `owner_id` on every read.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub subdomain: String,
    pub description: String,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub is_public: bool,
    pub cover_image: Option<String>,
    pub article_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    /// List representation (no embedded articles)
    pub fn into_response(self) -> CollectionResponse {
        CollectionResponse {
            id: self.id,
            name: self.name,
            slug: self.slug,
            subdomain: self.subdomain,
            description: self.description,
            owner_id: self.owner_id,
            owner_username: self.owner_username,
            is_public: self.is_public,
            cover_image: self.cover_image,
            article_count: self.article_count,
            articles: None,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Single-collection representation with its articles
    pub fn into_response_with(self, articles: Vec<Article>) -> CollectionResponse {
        let mut response = self.into_response();
        response.articles = Some(articles.into_iter().map(ArticleResponse::from).collect());
        response
    }
}

/// Insert payload for a collection
#[derive(Debug, Clone)]
pub struct NewCollection {
    pub name: String,
    pub slug: String,
    pub subdomain: String,
    pub description: String,
    pub owner_id: Uuid,
    pub is_public: bool,
    pub cover_image: Option<String>,
}

/// Partial update of a collection; `None` leaves a column untouched
#[derive(Debug, Clone, Default)]
pub struct CollectionChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    /// `Some(None)` clears the cover image
    pub cover_image: Option<Option<String>>,
}

impl CollectionChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.slug.is_none()
            && self.description.is_none()
            && self.is_public.is_none()
            && self.cover_image.is_none()
    }
}

/// Per-platform share counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct ArticleShares {
    #[sqlx(rename = "shares_twitter")]
    pub twitter: i64,
    #[sqlx(rename = "shares_facebook")]
    pub facebook: i64,
    #[sqlx(rename = "shares_linkedin")]
    pub linkedin: i64,
    #[sqlx(rename = "shares_copy_link")]
    pub copy_link: i64,
}

/// Article row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Article {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub title: String,
    /// Unique within `collection_id`
    pub slug: String,
    pub content: String,
    pub share_count: i64,
    #[sqlx(flatten)]
    pub shares: ArticleShares,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            title: article.title,
            slug: article.slug,
            content: article.content,
            share_count: article.share_count,
            shares: ShareCounts {
                twitter: article.shares.twitter,
                facebook: article.shares.facebook,
                linkedin: article.shares.linkedin,
                copy_link: article.shares.copy_link,
            },
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

/// Insert payload for an article
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub collection_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
}

/// Partial update of an article
#[derive(Debug, Clone, Default)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
}

/// One article of the public feed, flattened with its collection
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PublicArticle {
    pub collection_id: Uuid,
    pub collection_name: String,
    pub collection_slug: String,
    pub owner_username: String,
    pub article_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub share_count: i64,
}

impl From<PublicArticle> for ArticleListItem {
    fn from(row: PublicArticle) -> Self {
        Self {
            collection_id: row.collection_id,
            collection_name: row.collection_name,
            collection_slug: row.collection_slug,
            owner_username: row.owner_username,
            article_id: row.article_id,
            title: row.title,
            slug: row.slug,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
            share_count: row.share_count,
        }
    }
}

/// Skip/limit window, 1-based page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Public feed query
///
/// `pattern` is matched case-insensitively against title and content.
#[derive(Debug, Clone)]
pub struct ArticleSearch {
    pub page: Page,
    pub pattern: Option<Regex>,
}

/// A page of results plus the unpaged total
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        assert_eq!(Page::new(1, 10).offset(), 0);
        assert_eq!(Page::new(3, 10).offset(), 20);
        assert_eq!(Page::new(0, 0), Page::new(1, 1));
    }

    #[test]
    fn test_collection_changes_empty() {
        assert!(CollectionChanges::default().is_empty());
        let changes = CollectionChanges {
            cover_image: Some(None),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
