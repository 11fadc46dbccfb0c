/**
 * In-Memory Store
 *
 * `Store` implementation used when no database is configured and by the
 * test-suite. All tables sit behind one `tokio::sync::RwLock`, so every
 * uniqueness check runs under the same write guard as its insert.
 *
 * Rows are kept in insertion order; "newest first" listings iterate in
 * reverse.
 */

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::store::{
    Article, ArticleChanges, ArticleSearch, ArticleShares, Collection, CollectionChanges,
    NewArticle, NewCollection, NewUser, Page, Paged, PublicArticle, Store, StoreError,
    StoreResult, UniqueField, User,
};
use crate::shared::SharePlatform;

#[derive(Debug, Clone)]
struct CollectionRecord {
    id: Uuid,
    name: String,
    slug: String,
    subdomain: String,
    description: String,
    owner_id: Uuid,
    is_public: bool,
    cover_image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    collections: Vec<CollectionRecord>,
    articles: Vec<Article>,
}

impl Tables {
    fn owner_username(&self, owner_id: Uuid) -> String {
        self.users
            .iter()
            .find(|u| u.id == owner_id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    fn collection_view(&self, record: &CollectionRecord) -> Collection {
        let article_count = self
            .articles
            .iter()
            .filter(|a| a.collection_id == record.id)
            .count() as i64;

        Collection {
            id: record.id,
            name: record.name.clone(),
            slug: record.slug.clone(),
            subdomain: record.subdomain.clone(),
            description: record.description.clone(),
            owner_id: record.owner_id,
            owner_username: self.owner_username(record.owner_id),
            is_public: record.is_public,
            cover_image: record.cover_image.clone(),
            article_count,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    fn touch_collection(&mut self, id: Uuid, now: DateTime<Utc>) {
        if let Some(record) = self.collections.iter_mut().find(|c| c.id == id) {
            record.updated_at = now;
        }
    }

    fn article_slug_taken(&self, collection_id: Uuid, slug: &str, except: Option<Uuid>) -> bool {
        self.articles
            .iter()
            .any(|a| a.collection_id == collection_id && a.slug == slug && Some(a.id) != except)
    }
}

/// In-memory store
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(UniqueField::Email));
        }
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate(UniqueField::Username));
        }

        let row = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            username: user.username,
            created_at: Utc::now(),
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_collection(&self, collection: NewCollection) -> StoreResult<Collection> {
        let mut tables = self.tables.write().await;

        if tables.collections.iter().any(|c| c.subdomain == collection.subdomain) {
            return Err(StoreError::Duplicate(UniqueField::Subdomain));
        }
        if tables.collections.iter().any(|c| c.slug == collection.slug) {
            return Err(StoreError::Duplicate(UniqueField::CollectionSlug));
        }

        let now = Utc::now();
        let record = CollectionRecord {
            id: Uuid::new_v4(),
            name: collection.name,
            slug: collection.slug,
            subdomain: collection.subdomain,
            description: collection.description,
            owner_id: collection.owner_id,
            is_public: collection.is_public,
            cover_image: collection.cover_image,
            created_at: now,
            updated_at: now,
        };
        let view = tables.collection_view(&record);
        tables.collections.push(record);
        Ok(view)
    }

    async fn collection_by_id(&self, id: Uuid) -> StoreResult<Option<Collection>> {
        let tables = self.tables.read().await;
        Ok(tables
            .collections
            .iter()
            .find(|c| c.id == id)
            .map(|c| tables.collection_view(c)))
    }

    async fn collection_by_subdomain(&self, subdomain: &str) -> StoreResult<Option<Collection>> {
        let tables = self.tables.read().await;
        Ok(tables
            .collections
            .iter()
            .find(|c| c.subdomain == subdomain)
            .map(|c| tables.collection_view(c)))
    }

    async fn public_collections(&self, page: Page) -> StoreResult<Paged<Collection>> {
        let tables = self.tables.read().await;
        let public: Vec<&CollectionRecord> =
            tables.collections.iter().rev().filter(|c| c.is_public).collect();

        let items = public
            .iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .map(|c| tables.collection_view(c))
            .collect();

        Ok(Paged {
            items,
            total: public.len() as u64,
        })
    }

    async fn collections_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Collection>> {
        let tables = self.tables.read().await;
        Ok(tables
            .collections
            .iter()
            .rev()
            .filter(|c| c.owner_id == owner_id)
            .map(|c| tables.collection_view(c))
            .collect())
    }

    async fn update_collection(&self, id: Uuid, changes: CollectionChanges) -> StoreResult<Option<Collection>> {
        let mut tables = self.tables.write().await;

        if let Some(slug) = &changes.slug {
            if tables.collections.iter().any(|c| c.id != id && &c.slug == slug) {
                return Err(StoreError::Duplicate(UniqueField::CollectionSlug));
            }
        }

        let Some(index) = tables.collections.iter().position(|c| c.id == id) else {
            return Ok(None);
        };

        let record = &mut tables.collections[index];
        if let Some(name) = changes.name {
            record.name = name;
        }
        if let Some(slug) = changes.slug {
            record.slug = slug;
        }
        if let Some(description) = changes.description {
            record.description = description;
        }
        if let Some(is_public) = changes.is_public {
            record.is_public = is_public;
        }
        if let Some(cover_image) = changes.cover_image {
            record.cover_image = cover_image;
        }
        record.updated_at = Utc::now();

        let record = record.clone();
        Ok(Some(tables.collection_view(&record)))
    }

    async fn delete_collection(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.collections.len();
        tables.collections.retain(|c| c.id != id);
        if tables.collections.len() == before {
            return Ok(false);
        }
        tables.articles.retain(|a| a.collection_id != id);
        Ok(true)
    }

    async fn insert_article(&self, article: NewArticle) -> StoreResult<Article> {
        let mut tables = self.tables.write().await;

        if !tables.collections.iter().any(|c| c.id == article.collection_id) {
            return Err(StoreError::Database(format!(
                "collection {} does not exist",
                article.collection_id
            )));
        }
        if tables.article_slug_taken(article.collection_id, &article.slug, None) {
            return Err(StoreError::Duplicate(UniqueField::ArticleSlug));
        }

        let now = Utc::now();
        let row = Article {
            id: Uuid::new_v4(),
            collection_id: article.collection_id,
            title: article.title,
            slug: article.slug,
            content: article.content,
            share_count: 0,
            shares: ArticleShares::default(),
            created_at: now,
            updated_at: now,
        };
        tables.articles.push(row.clone());
        tables.touch_collection(row.collection_id, now);
        Ok(row)
    }

    async fn articles_in_collection(&self, collection_id: Uuid) -> StoreResult<Vec<Article>> {
        let tables = self.tables.read().await;
        Ok(tables
            .articles
            .iter()
            .filter(|a| a.collection_id == collection_id)
            .cloned()
            .collect())
    }

    async fn article_by_slug(&self, collection_id: Uuid, slug: &str) -> StoreResult<Option<Article>> {
        let tables = self.tables.read().await;
        Ok(tables
            .articles
            .iter()
            .find(|a| a.collection_id == collection_id && a.slug == slug)
            .cloned())
    }

    async fn article_by_id(&self, id: Uuid) -> StoreResult<Option<Article>> {
        let tables = self.tables.read().await;
        Ok(tables.articles.iter().find(|a| a.id == id).cloned())
    }

    async fn update_article(
        &self,
        collection_id: Uuid,
        slug: &str,
        changes: ArticleChanges,
    ) -> StoreResult<Option<Article>> {
        let mut tables = self.tables.write().await;

        let Some(index) = tables
            .articles
            .iter()
            .position(|a| a.collection_id == collection_id && a.slug == slug)
        else {
            return Ok(None);
        };

        if let Some(new_slug) = &changes.slug {
            let id = tables.articles[index].id;
            if tables.article_slug_taken(collection_id, new_slug, Some(id)) {
                return Err(StoreError::Duplicate(UniqueField::ArticleSlug));
            }
        }

        let now = Utc::now();
        let article = &mut tables.articles[index];
        if let Some(title) = changes.title {
            article.title = title;
        }
        if let Some(slug) = changes.slug {
            article.slug = slug;
        }
        if let Some(content) = changes.content {
            article.content = content;
        }
        article.updated_at = now;
        Ok(Some(article.clone()))
    }

    async fn delete_article(&self, collection_id: Uuid, slug: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.articles.len();
        tables
            .articles
            .retain(|a| !(a.collection_id == collection_id && a.slug == slug));
        Ok(tables.articles.len() < before)
    }

    async fn increment_share(
        &self,
        collection_id: Uuid,
        slug: &str,
        platform: Option<SharePlatform>,
    ) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(article) = tables
            .articles
            .iter_mut()
            .find(|a| a.collection_id == collection_id && a.slug == slug)
        else {
            return Ok(false);
        };

        article.share_count += 1;
        match platform {
            Some(SharePlatform::Twitter) => article.shares.twitter += 1,
            Some(SharePlatform::Facebook) => article.shares.facebook += 1,
            Some(SharePlatform::Linkedin) => article.shares.linkedin += 1,
            Some(SharePlatform::CopyLink) => article.shares.copy_link += 1,
            None => {}
        }
        Ok(true)
    }

    async fn search_public_articles(&self, search: ArticleSearch) -> StoreResult<Paged<PublicArticle>> {
        let tables = self.tables.read().await;

        let mut matches: Vec<PublicArticle> = tables
            .articles
            .iter()
            .filter(|a| match &search.pattern {
                Some(re) => re.is_match(&a.title) || re.is_match(&a.content),
                None => true,
            })
            .filter_map(|a| {
                let collection = tables
                    .collections
                    .iter()
                    .find(|c| c.id == a.collection_id && c.is_public)?;
                Some(PublicArticle {
                    collection_id: collection.id,
                    collection_name: collection.name.clone(),
                    collection_slug: collection.slug.clone(),
                    owner_username: tables.owner_username(collection.owner_id),
                    article_id: a.id,
                    title: a.title.clone(),
                    slug: a.slug.clone(),
                    content: a.content.clone(),
                    created_at: a.created_at,
                    updated_at: a.updated_at,
                    share_count: a.share_count,
                })
            })
            .collect();
        matches.reverse();

        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(search.page.offset() as usize)
            .take(search.page.limit as usize)
            .collect();

        Ok(Paged { items, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;

    async fn seed_user(store: &MemoryStore, username: &str) -> User {
        store
            .insert_user(NewUser {
                email: format!("{username}@example.com"),
                password_hash: "hash".to_string(),
                name: username.to_string(),
                username: username.to_string(),
            })
            .await
            .unwrap()
    }

    fn new_collection(owner_id: Uuid, slug: &str, subdomain: &str, is_public: bool) -> NewCollection {
        NewCollection {
            name: slug.to_string(),
            slug: slug.to_string(),
            subdomain: subdomain.to_string(),
            description: "a collection used in tests".to_string(),
            owner_id,
            is_public,
            cover_image: None,
        }
    }

    fn new_article(collection_id: Uuid, title: &str, slug: &str) -> NewArticle {
        NewArticle {
            collection_id,
            title: title.to_string(),
            slug: slug.to_string(),
            content: format!("{title} body text"),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_and_username() {
        let store = MemoryStore::new();
        seed_user(&store, "alice").await;

        let err = store
            .insert_user(NewUser {
                email: "alice@example.com".to_string(),
                password_hash: "hash".to_string(),
                name: "Other".to_string(),
                username: "other".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(UniqueField::Email)));

        let err = store
            .insert_user(NewUser {
                email: "other@example.com".to_string(),
                password_hash: "hash".to_string(),
                name: "Other".to_string(),
                username: "alice".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(UniqueField::Username)));
    }

    #[tokio::test]
    async fn test_duplicate_subdomain_persists_nothing() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "alice").await;
        store
            .insert_collection(new_collection(owner.id, "notes-0001", "notes", true))
            .await
            .unwrap();

        let err = store
            .insert_collection(new_collection(owner.id, "notes-0002", "notes", true))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(UniqueField::Subdomain)));
        assert_eq!(store.collections_by_owner(owner.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_owner_username_and_article_count_are_read_time() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "alice").await;
        let collection = store
            .insert_collection(new_collection(owner.id, "notes-0001", "notes", true))
            .await
            .unwrap();
        assert_eq!(collection.owner_username, "alice");
        assert_eq!(collection.article_count, 0);

        store
            .insert_article(new_article(collection.id, "First", "first-0001"))
            .await
            .unwrap();
        store
            .insert_article(new_article(collection.id, "Second", "second-0001"))
            .await
            .unwrap();

        let reloaded = store.collection_by_id(collection.id).await.unwrap().unwrap();
        assert_eq!(reloaded.article_count, 2);
    }

    #[tokio::test]
    async fn test_article_slug_unique_per_collection() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "alice").await;
        let first = store
            .insert_collection(new_collection(owner.id, "one-0001", "one", true))
            .await
            .unwrap();
        let second = store
            .insert_collection(new_collection(owner.id, "two-0001", "two", true))
            .await
            .unwrap();

        store.insert_article(new_article(first.id, "Hello", "hello-0001")).await.unwrap();
        store.insert_article(new_article(second.id, "Hello", "hello-0001")).await.unwrap();

        let err = store
            .insert_article(new_article(first.id, "Hello", "hello-0001"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(UniqueField::ArticleSlug)));
    }

    #[tokio::test]
    async fn test_delete_collection_cascades() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "alice").await;
        let collection = store
            .insert_collection(new_collection(owner.id, "notes-0001", "notes", true))
            .await
            .unwrap();
        let article = store
            .insert_article(new_article(collection.id, "Hello", "hello-0001"))
            .await
            .unwrap();

        assert!(store.delete_collection(collection.id).await.unwrap());
        assert!(store.article_by_id(article.id).await.unwrap().is_none());
        assert!(!store.delete_collection(collection.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_increment_share_counts_platform() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "alice").await;
        let collection = store
            .insert_collection(new_collection(owner.id, "notes-0001", "notes", true))
            .await
            .unwrap();
        store
            .insert_article(new_article(collection.id, "Hello", "hello-0001"))
            .await
            .unwrap();

        for _ in 0..3 {
            store
                .increment_share(collection.id, "hello-0001", Some(SharePlatform::Twitter))
                .await
                .unwrap();
        }
        store.increment_share(collection.id, "hello-0001", None).await.unwrap();

        let article = store
            .article_by_slug(collection.id, "hello-0001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(article.share_count, 4);
        assert_eq!(article.shares.twitter, 3);
        assert_eq!(article.shares.facebook, 0);

        assert!(!store.increment_share(collection.id, "missing", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_appends_and_shares_keep_every_write() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "alice").await;
        let collection = store
            .insert_collection(new_collection(owner.id, "notes-0001", "notes", true))
            .await
            .unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for n in 0..20 {
            let store = store.clone();
            tasks.spawn(async move {
                let slug = format!("post-{n:04}");
                store
                    .insert_article(new_article(collection.id, "Post", &slug))
                    .await
                    .unwrap();
                store
                    .increment_share(collection.id, &slug, Some(SharePlatform::Linkedin))
                    .await
                    .unwrap()
            });
        }
        while let Some(shared) = tasks.join_next().await {
            assert!(shared.unwrap());
        }

        let reloaded = store.collection_by_id(collection.id).await.unwrap().unwrap();
        assert_eq!(reloaded.article_count, 20);
        let articles = store.articles_in_collection(collection.id).await.unwrap();
        assert_eq!(articles.len(), 20);
        assert!(articles.iter().all(|a| a.share_count == 1 && a.shares.linkedin == 1));
    }

    #[tokio::test]
    async fn test_search_skips_private_and_filters_articles() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "alice").await;
        let public = store
            .insert_collection(new_collection(owner.id, "pub-0001", "pub", true))
            .await
            .unwrap();
        let private = store
            .insert_collection(new_collection(owner.id, "priv-0001", "priv", false))
            .await
            .unwrap();

        store.insert_article(new_article(public.id, "Rust tips", "rust-0001")).await.unwrap();
        store.insert_article(new_article(public.id, "Cooking", "cook-0001")).await.unwrap();
        store.insert_article(new_article(private.id, "Rust secrets", "rust-0002")).await.unwrap();

        let all = store
            .search_public_articles(ArticleSearch {
                page: Page::new(1, 10),
                pattern: None,
            })
            .await
            .unwrap();
        assert_eq!(all.total, 2);
        assert_eq!(all.items[0].title, "Cooking");

        let pattern = RegexBuilder::new("RUST").case_insensitive(true).build().unwrap();
        let found = store
            .search_public_articles(ArticleSearch {
                page: Page::new(1, 10),
                pattern: Some(pattern),
            })
            .await
            .unwrap();
        assert_eq!(found.total, 1);
        assert_eq!(found.items[0].title, "Rust tips");
        assert_eq!(found.items[0].owner_username, "alice");
    }

    #[tokio::test]
    async fn test_public_collections_newest_first_and_paged() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "alice").await;
        for n in 0..3 {
            store
                .insert_collection(new_collection(owner.id, &format!("c{n}-0001"), &format!("sub{n}"), true))
                .await
                .unwrap();
        }
        store
            .insert_collection(new_collection(owner.id, "hidden-0001", "hidden", false))
            .await
            .unwrap();

        let page = store.public_collections(Page::new(1, 2)).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].subdomain, "sub2");

        let rest = store.public_collections(Page::new(2, 2)).await.unwrap();
        assert_eq!(rest.items.len(), 1);
        assert_eq!(rest.items[0].subdomain, "sub0");
    }
}
