//! Blog collection and article wire types
//!
//! All bodies use camelCase keys, matching what the browser client sends
//! and expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default page size for list endpoints
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Upper bound on `limit`
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Social platforms with their own share counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SharePlatform {
    Twitter,
    Facebook,
    Linkedin,
    CopyLink,
}

impl SharePlatform {
    /// Parse the tag sent by share buttons. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "twitter" => Some(Self::Twitter),
            "facebook" => Some(Self::Facebook),
            "linkedin" => Some(Self::Linkedin),
            "copyLink" => Some(Self::CopyLink),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::Linkedin => "linkedin",
            Self::CopyLink => "copyLink",
        }
    }
}

/// Per-platform share counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareCounts {
    pub twitter: i64,
    pub facebook: i64,
    pub linkedin: i64,
    pub copy_link: i64,
}

/// An article as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub share_count: i64,
    pub shares: ShareCounts,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A blog collection as returned to clients
///
/// `articles` is only present on single-collection responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResponse {
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articles: Option<Vec<ArticleResponse>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/blog-collections`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Omit to derive the subdomain from the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
}

/// Body of `PUT /api/blog-collections/:id`; absent fields are left untouched.
///
/// An empty `coverImage` clears the cover image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollectionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Accepted only when equal to the current subdomain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
}

/// Body of `GET /api/blog-collections`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionListResponse {
    pub collections: Vec<CollectionResponse>,
    pub current_page: u32,
    pub total_pages: u64,
    pub total_collections: u64,
}

/// Body of `POST /api/blogs/:collectionId`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateArticleRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Body of `PATCH /api/blogs/:collectionId/:articleSlug`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateArticleRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Body of `POST /api/blogs/:collectionId/:articleSlug/share`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

/// One entry of the flattened cross-collection article feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListItem {
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

/// Body of `GET /api/blogs`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListResponse {
    pub articles: Vec<ArticleListItem>,
    pub current_page: u32,
    pub total_pages: u64,
    pub total_articles: u64,
}

/// Body of `GET /api/blogs/:collectionId/:articleSlug`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetailResponse {
    pub article: ArticleResponse,
    pub collection_name: String,
    pub owner_username: String,
}

/// Body of a successful article creation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleCreatedResponse {
    pub article: ArticleResponse,
    pub collection_name: String,
    pub collection_slug: String,
    pub subdomain: String,
}

/// Body of a successful article update
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleUpdatedResponse {
    pub article: ArticleResponse,
    pub collection_name: String,
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 301 body of the retired `GET /api/blogs/:legacyId` route
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRedirectResponse {
    pub code: String,
    pub message: String,
    pub new_url: String,
    pub collection_id: Uuid,
    pub article_slug: String,
    pub collection_name: String,
}

/// 410 body of the retired `GET /api/blogs/:legacyId` route
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyGoneResponse {
    pub code: String,
    pub message: String,
    pub error: String,
    pub legacy_id: String,
}

/// Query string of the paginated list endpoints
///
/// Values are kept as strings so that garbage falls back to defaults
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListQuery {
    /// 1-based page number, defaulting to 1
    pub fn page(&self) -> u32 {
        parse_positive(self.page.as_deref()).unwrap_or(1)
    }

    /// Page size, defaulting to [`DEFAULT_PAGE_LIMIT`] and capped at [`MAX_PAGE_LIMIT`]
    pub fn limit(&self) -> u32 {
        parse_positive(self.limit.as_deref())
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .min(MAX_PAGE_LIMIT)
    }

    /// Non-blank search pattern
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

fn parse_positive(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
}

/// Number of pages needed for `total` items at `limit` per page
pub fn total_pages(total: u64, limit: u32) -> u64 {
    let limit = u64::from(limit.max(1));
    total.div_ceil(limit)
}
