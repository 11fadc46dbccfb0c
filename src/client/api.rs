/**
 * REST API Client
 *
 * One async method per endpoint. The stored bearer token is attached to
 * every request when present; register and login save the returned token,
 * `logout` clears it.
 *
 * Non-2xx answers become `ClientError::Api` with the server's
 * `{message, error}` body. Nothing is retried.
 */

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::client::error::{ClientError, ClientResult};
use crate::client::token_store::TokenStore;
use crate::shared::auth::{AuthResponse, LoginRequest, MeResponse, RegisterRequest, UserResponse};
use crate::shared::blog::{
    ArticleCreatedResponse, ArticleDetailResponse, ArticleListResponse, ArticleUpdatedResponse,
    CollectionListResponse, CollectionResponse, CreateArticleRequest, CreateCollectionRequest,
    LegacyGoneResponse, LegacyRedirectResponse, ListQuery, MessageResponse, ShareRequest,
    UpdateArticleRequest, UpdateCollectionRequest,
};
use crate::shared::{AppConfig, ErrorBody, SharePlatform};

/// Answer of the retired single-id article lookup
#[derive(Debug, Clone)]
pub enum LegacyLookup {
    Moved(LegacyRedirectResponse),
    Gone(LegacyGoneResponse),
}

pub struct BlogifyClient {
    base: Url,
    http: Client,
    tokens: TokenStore,
    token: RwLock<Option<String>>,
}

impl BlogifyClient {
    /// Build a client and load any previously stored token
    pub async fn connect(config: &AppConfig) -> ClientResult<Self> {
        let tokens = TokenStore::resolve(config.token_path.as_deref())?;
        Self::with_token_store(config, tokens).await
    }

    pub async fn with_token_store(config: &AppConfig, tokens: TokenStore) -> ClientResult<Self> {
        let base = Url::parse(&config.api_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", config.api_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.api_url.clone()));
        }

        // The legacy lookup answers 301 with a JSON body for the caller to read.
        let http = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let token = tokens.load().await?;
        Ok(Self {
            base,
            http,
            tokens,
            token: RwLock::new(token),
        })
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    // Auth

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        let auth: AuthResponse = self
            .send(self.request(Method::POST, &["api", "auth", "register"]).await?.json(request))
            .await?;
        self.store_token(&auth.token).await?;
        Ok(auth)
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self
            .send(self.request(Method::POST, &["api", "auth", "login"]).await?.json(&body))
            .await?;
        self.store_token(&auth.token).await?;
        Ok(auth)
    }

    pub async fn logout(&self) -> ClientResult<()> {
        *self.token.write().await = None;
        self.tokens.clear().await
    }

    pub async fn me(&self) -> ClientResult<UserResponse> {
        let me: MeResponse = self
            .send(self.request(Method::GET, &["api", "auth", "me"]).await?)
            .await?;
        Ok(me.user)
    }

    // Collections

    pub async fn list_collections(&self, page: u32, limit: u32) -> ClientResult<CollectionListResponse> {
        let query = ListQuery {
            page: Some(page.to_string()),
            limit: Some(limit.to_string()),
            search: None,
        };
        self.send(
            self.request(Method::GET, &["api", "blog-collections"])
                .await?
                .query(&query),
        )
        .await
    }

    pub async fn create_collection(
        &self,
        request: &CreateCollectionRequest,
    ) -> ClientResult<CollectionResponse> {
        self.send(
            self.request(Method::POST, &["api", "blog-collections"])
                .await?
                .json(request),
        )
        .await
    }

    pub async fn my_collections(&self) -> ClientResult<Vec<CollectionResponse>> {
        self.send(
            self.request(Method::GET, &["api", "blog-collections", "my-collections"])
                .await?,
        )
        .await
    }

    pub async fn collection(&self, id: Uuid) -> ClientResult<CollectionResponse> {
        let id = id.to_string();
        self.send(self.request(Method::GET, &["api", "blog-collections", &id]).await?)
            .await
    }

    pub async fn collection_by_subdomain(&self, subdomain: &str) -> ClientResult<CollectionResponse> {
        self.send(
            self.request(
                Method::GET,
                &["api", "blog-collections", "by-subdomain", subdomain],
            )
            .await?,
        )
        .await
    }

    pub async fn update_collection(
        &self,
        id: Uuid,
        request: &UpdateCollectionRequest,
    ) -> ClientResult<CollectionResponse> {
        let id = id.to_string();
        self.send(
            self.request(Method::PUT, &["api", "blog-collections", &id])
                .await?
                .json(request),
        )
        .await
    }

    pub async fn delete_collection(&self, id: Uuid) -> ClientResult<MessageResponse> {
        let id = id.to_string();
        self.send(self.request(Method::DELETE, &["api", "blog-collections", &id]).await?)
            .await
    }

    // Articles

    /// Public feed; `search` is a case-insensitive regular expression
    pub async fn list_articles(
        &self,
        page: u32,
        limit: u32,
        search: Option<&str>,
    ) -> ClientResult<ArticleListResponse> {
        let query = ListQuery {
            page: Some(page.to_string()),
            limit: Some(limit.to_string()),
            search: search.map(str::to_string),
        };
        self.send(self.request(Method::GET, &["api", "blogs"]).await?.query(&query))
            .await
    }

    pub async fn article(&self, collection_id: Uuid, slug: &str) -> ClientResult<ArticleDetailResponse> {
        let collection_id = collection_id.to_string();
        self.send(
            self.request(Method::GET, &["api", "blogs", &collection_id, slug])
                .await?,
        )
        .await
    }

    pub async fn create_article(
        &self,
        collection_id: Uuid,
        request: &CreateArticleRequest,
    ) -> ClientResult<ArticleCreatedResponse> {
        let collection_id = collection_id.to_string();
        self.send(
            self.request(Method::POST, &["api", "blogs", &collection_id])
                .await?
                .json(request),
        )
        .await
    }

    pub async fn update_article(
        &self,
        collection_id: Uuid,
        slug: &str,
        request: &UpdateArticleRequest,
    ) -> ClientResult<ArticleUpdatedResponse> {
        let collection_id = collection_id.to_string();
        self.send(
            self.request(Method::PATCH, &["api", "blogs", &collection_id, slug])
                .await?
                .json(request),
        )
        .await
    }

    pub async fn delete_article(&self, collection_id: Uuid, slug: &str) -> ClientResult<MessageResponse> {
        let collection_id = collection_id.to_string();
        self.send(
            self.request(Method::DELETE, &["api", "blogs", &collection_id, slug])
                .await?,
        )
        .await
    }

    pub async fn share_article(
        &self,
        collection_id: Uuid,
        slug: &str,
        platform: Option<SharePlatform>,
    ) -> ClientResult<MessageResponse> {
        let collection_id = collection_id.to_string();
        let body = ShareRequest {
            platform: platform.map(|p| p.as_tag().to_string()),
        };
        self.send(
            self.request(Method::POST, &["api", "blogs", &collection_id, slug, "share"])
                .await?
                .json(&body),
        )
        .await
    }

    /// Resolve a pre-collection article id
    pub async fn legacy_article(&self, legacy_id: &str) -> ClientResult<LegacyLookup> {
        let response = self
            .request(Method::GET, &["api", "blogs", legacy_id])
            .await?
            .send()
            .await?;

        match response.status() {
            StatusCode::MOVED_PERMANENTLY => Ok(LegacyLookup::Moved(decode(response).await?)),
            StatusCode::GONE => Ok(LegacyLookup::Gone(decode(response).await?)),
            _ => Err(api_error(response).await),
        }
    }

    // Plumbing

    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        let builder = self.http.request(method, self.url(segments)?);
        Ok(match self.token.read().await.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        decode(response).await
    }

    async fn store_token(&self, token: &str) -> ClientResult<()> {
        *self.token.write().await = Some(token.to_string());
        self.tokens.save(token).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

async fn api_error(response: Response) -> ClientError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let (message, error) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => (body.message, body.error),
        Err(_) => (
            status.canonical_reason().unwrap_or("Request failed").to_string(),
            if text.is_empty() { status.to_string() } else { text },
        ),
    };

    tracing::debug!("API error {}: {} - {}", status.as_u16(), message, error);

    ClientError::Api {
        status: status.as_u16(),
        message,
        error,
    }
}
