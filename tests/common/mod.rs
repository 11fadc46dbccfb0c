//! Common test utilities
//!
//! `TestApp` runs the full router over the in-memory store, with the
//! cheapest bcrypt cost, behind an `axum_test::TestServer`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};
use uuid::Uuid;

use blogify::backend::auth::SessionManager;
use blogify::backend::server::{app_with_store, ServerConfig, MIN_BCRYPT_COST};
use blogify::backend::store::MemoryStore;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "secret1";

pub struct TestApp {
    pub server: TestServer,
    /// Same secret and lifetime as the server, for minting tokens directly
    pub sessions: SessionManager,
}

/// A registered user
#[derive(Debug, Clone)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let config = ServerConfig {
            jwt_secret: TEST_SECRET.to_string(),
            bcrypt_cost: MIN_BCRYPT_COST,
            static_dir: std::env::temp_dir().join("blogify-no-static"),
            ..ServerConfig::default()
        };
        let router = app_with_store(&config, Arc::new(MemoryStore::new()));

        Self {
            server: TestServer::new(router).unwrap(),
            sessions: SessionManager::new(&config.jwt_secret, config.token_ttl),
        }
    }

    pub async fn register(&self, username: &str) -> Author {
        let email = format!("{username}@example.com");
        let response = self
            .server
            .post("/api/auth/register")
            .json(&json!({
                "email": email,
                "password": PASSWORD,
                "name": format!("{username} name"),
                "username": username,
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED, "{}", response.text());

        let body: Value = response.json();
        Author {
            id: body["user"]["id"].as_str().unwrap().parse().unwrap(),
            username: body["user"]["username"].as_str().unwrap().to_string(),
            email,
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn try_create_collection(&self, author: &Author, body: Value) -> TestResponse {
        self.server
            .post("/api/blog-collections")
            .authorization_bearer(&author.token)
            .json(&body)
            .await
    }

    /// Create a public collection and return its JSON
    pub async fn create_collection(&self, author: &Author, name: &str) -> Value {
        let response = self
            .try_create_collection(
                author,
                json!({"name": name, "description": format!("All about {name} and more")}),
            )
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED, "{}", response.text());
        response.json()
    }

    pub async fn create_private_collection(&self, author: &Author, name: &str) -> Value {
        let response = self
            .try_create_collection(
                author,
                json!({
                    "name": name,
                    "description": "Only for my own eyes",
                    "isPublic": false,
                }),
            )
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED, "{}", response.text());
        response.json()
    }

    /// Create an article and return the `article` object
    pub async fn create_article(&self, author: &Author, collection_id: &str, title: &str) -> Value {
        let response = self
            .server
            .post(&format!("/api/blogs/{collection_id}"))
            .authorization_bearer(&author.token)
            .json(&json!({"title": title, "content": format!("{title} body text, long enough")}))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED, "{}", response.text());
        let body: Value = response.json();
        body["article"].clone()
    }
}

pub fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

pub fn slug_of(value: &Value) -> String {
    value["slug"].as_str().unwrap().to_string()
}

/// `{stem}-NNNN`
pub fn assert_suffixed(slug: &str, stem: &str) {
    let (head, suffix) = slug.rsplit_once('-').unwrap();
    assert_eq!(head, stem, "slug {slug}");
    assert_eq!(suffix.len(), 4, "slug {slug}");
    assert!(suffix.chars().all(|c| c.is_ascii_digit()), "slug {slug}");
}
