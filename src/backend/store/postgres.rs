/**
 * PostgreSQL Store
 *
 * `Store` implementation over a sqlx `PgPool`. Schema lives in
 * `migrations/` and is applied at start-up by `server::config`.
 *
 * Collections are always read through `COLLECTION_SELECT`, which joins the
 * owner's current username and counts the collection's articles.
 */

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::store::{
    Article, ArticleChanges, ArticleSearch, Collection, CollectionChanges, NewArticle,
    NewCollection, NewUser, Page, Paged, PublicArticle, Store, StoreError, StoreResult,
    UniqueField, User,
};
use crate::shared::SharePlatform;

const USER_COLUMNS: &str = "id, email, password_hash, name, username, created_at";

const COLLECTION_SELECT: &str = r#"
    SELECT c.id, c.name, c.slug, c.subdomain, c.description, c.owner_id,
           u.username AS owner_username, c.is_public, c.cover_image,
           (SELECT COUNT(*) FROM articles a WHERE a.collection_id = c.id) AS article_count,
           c.created_at, c.updated_at
    FROM blog_collections c
    JOIN users u ON u.id = c.owner_id
"#;

const ARTICLE_COLUMNS: &str = "id, collection_id, title, slug, content, share_count, \
     shares_twitter, shares_facebook, shares_linkedin, shares_copy_link, created_at, updated_at";

const UNIQUE_VIOLATION: &str = "23505";
const INVALID_REGULAR_EXPRESSION: &str = "2201B";

/// Map a Postgres SQLSTATE to the store errors callers act on
fn classify(code: &str, constraint: Option<&str>, message: &str) -> Option<StoreError> {
    match code {
        UNIQUE_VIOLATION => constraint
            .and_then(UniqueField::from_constraint)
            .map(StoreError::Duplicate),
        INVALID_REGULAR_EXPRESSION => Some(StoreError::InvalidPattern(message.to_string())),
        _ => None,
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(code) = db_err.code() {
                if let Some(mapped) = classify(&code, db_err.constraint(), db_err.message()) {
                    return mapped;
                }
            }
        }
        tracing::error!("Database error: {:?}", err);
        StoreError::Database(err.to_string())
    }
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (id, email, password_hash, name, username) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(&user.username)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_collection(&self, collection: NewCollection) -> StoreResult<Collection> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO blog_collections (id, name, slug, subdomain, description, owner_id, is_public, cover_image)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(id)
        .bind(&collection.name)
        .bind(&collection.slug)
        .bind(&collection.subdomain)
        .bind(&collection.description)
        .bind(collection.owner_id)
        .bind(collection.is_public)
        .bind(&collection.cover_image)
        .execute(&self.pool)
        .await?;

        self.collection_by_id(id)
            .await?
            .ok_or_else(|| StoreError::Database(format!("collection {id} missing after insert")))
    }

    async fn collection_by_id(&self, id: Uuid) -> StoreResult<Option<Collection>> {
        let sql = format!("{COLLECTION_SELECT} WHERE c.id = $1");
        let row = sqlx::query_as::<_, Collection>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn collection_by_subdomain(&self, subdomain: &str) -> StoreResult<Option<Collection>> {
        let sql = format!("{COLLECTION_SELECT} WHERE c.subdomain = $1");
        let row = sqlx::query_as::<_, Collection>(&sql)
            .bind(subdomain)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn public_collections(&self, page: Page) -> StoreResult<Paged<Collection>> {
        let sql = format!(
            "{COLLECTION_SELECT} WHERE c.is_public ORDER BY c.created_at DESC, c.id LIMIT $1 OFFSET $2"
        );
        let items = sqlx::query_as::<_, Collection>(&sql)
            .bind(i64::from(page.limit))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blog_collections WHERE is_public")
            .fetch_one(&self.pool)
            .await?;

        Ok(Paged {
            items,
            total: total.max(0) as u64,
        })
    }

    async fn collections_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Collection>> {
        let sql = format!("{COLLECTION_SELECT} WHERE c.owner_id = $1 ORDER BY c.created_at DESC, c.id");
        let rows = sqlx::query_as::<_, Collection>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_collection(&self, id: Uuid, changes: CollectionChanges) -> StoreResult<Option<Collection>> {
        let (cover_changed, cover_image) = match changes.cover_image {
            Some(value) => (true, value),
            None => (false, None),
        };

        let updated = sqlx::query(
            r#"
            UPDATE blog_collections
            SET name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                is_public = COALESCE($5, is_public),
                cover_image = CASE WHEN $6 THEN $7 ELSE cover_image END,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.slug)
        .bind(&changes.description)
        .bind(changes.is_public)
        .bind(cover_changed)
        .bind(&cover_image)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.collection_by_id(id).await
    }

    async fn delete_collection(&self, id: Uuid) -> StoreResult<bool> {
        let deleted = sqlx::query("DELETE FROM blog_collections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(deleted.rows_affected() > 0)
    }

    async fn insert_article(&self, article: NewArticle) -> StoreResult<Article> {
        // Insert and collection touch commit together.
        let sql = format!(
            "WITH inserted AS ( \
                 INSERT INTO articles (id, collection_id, title, slug, content) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING {ARTICLE_COLUMNS} \
             ), touched AS ( \
                 UPDATE blog_collections SET updated_at = NOW() \
                 WHERE id = (SELECT collection_id FROM inserted) \
             ) \
             SELECT {ARTICLE_COLUMNS} FROM inserted"
        );
        let row = sqlx::query_as::<_, Article>(&sql)
            .bind(Uuid::new_v4())
            .bind(article.collection_id)
            .bind(&article.title)
            .bind(&article.slug)
            .bind(&article.content)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    async fn articles_in_collection(&self, collection_id: Uuid) -> StoreResult<Vec<Article>> {
        let sql = format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE collection_id = $1 ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, Article>(&sql)
            .bind(collection_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn article_by_slug(&self, collection_id: Uuid, slug: &str) -> StoreResult<Option<Article>> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE collection_id = $1 AND slug = $2");
        let row = sqlx::query_as::<_, Article>(&sql)
            .bind(collection_id)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn article_by_id(&self, id: Uuid) -> StoreResult<Option<Article>> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1");
        let row = sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_article(
        &self,
        collection_id: Uuid,
        slug: &str,
        changes: ArticleChanges,
    ) -> StoreResult<Option<Article>> {
        let sql = format!(
            r#"
            UPDATE articles
            SET title = COALESCE($3, title),
                slug = COALESCE($4, slug),
                content = COALESCE($5, content),
                updated_at = NOW()
            WHERE collection_id = $1 AND slug = $2
            RETURNING {ARTICLE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Article>(&sql)
            .bind(collection_id)
            .bind(slug)
            .bind(&changes.title)
            .bind(&changes.slug)
            .bind(&changes.content)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_article(&self, collection_id: Uuid, slug: &str) -> StoreResult<bool> {
        let deleted = sqlx::query("DELETE FROM articles WHERE collection_id = $1 AND slug = $2")
            .bind(collection_id)
            .bind(slug)
            .execute(&self.pool)
            .await?;
        Ok(deleted.rows_affected() > 0)
    }

    async fn increment_share(
        &self,
        collection_id: Uuid,
        slug: &str,
        platform: Option<SharePlatform>,
    ) -> StoreResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE articles
            SET share_count = share_count + 1,
                shares_twitter = shares_twitter + CASE WHEN $3 = 'twitter' THEN 1 ELSE 0 END,
                shares_facebook = shares_facebook + CASE WHEN $3 = 'facebook' THEN 1 ELSE 0 END,
                shares_linkedin = shares_linkedin + CASE WHEN $3 = 'linkedin' THEN 1 ELSE 0 END,
                shares_copy_link = shares_copy_link + CASE WHEN $3 = 'copyLink' THEN 1 ELSE 0 END
            WHERE collection_id = $1 AND slug = $2
            "#,
        )
        .bind(collection_id)
        .bind(slug)
        .bind(platform.map(|p| p.as_tag()))
        .execute(&self.pool)
        .await?;
        Ok(updated.rows_affected() > 0)
    }

    async fn search_public_articles(&self, search: ArticleSearch) -> StoreResult<Paged<PublicArticle>> {
        let pattern = search.pattern.as_ref().map(|re| re.as_str().to_string());

        let items = sqlx::query_as::<_, PublicArticle>(
            r#"
            SELECT c.id AS collection_id, c.name AS collection_name, c.slug AS collection_slug,
                   u.username AS owner_username, a.id AS article_id, a.title, a.slug, a.content,
                   a.created_at, a.updated_at, a.share_count
            FROM articles a
            JOIN blog_collections c ON c.id = a.collection_id
            JOIN users u ON u.id = c.owner_id
            WHERE c.is_public
              AND ($1::TEXT IS NULL OR a.title ~* $1 OR a.content ~* $1)
            ORDER BY a.created_at DESC, a.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(i64::from(search.page.limit))
        .bind(search.page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM articles a
            JOIN blog_collections c ON c.id = a.collection_id
            WHERE c.is_public
              AND ($1::TEXT IS NULL OR a.title ~* $1 OR a.content ~* $1)
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok(Paged {
            items,
            total: total.max(0) as u64,
        })
    }
}
