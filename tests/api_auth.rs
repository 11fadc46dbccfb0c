//! Authentication API integration tests
//!
//! Registration, login, the bearer gate and token lifetime.

#![cfg(feature = "ssr")]

mod common;

use axum::http::{header, HeaderValue, StatusCode};
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{TestApp, PASSWORD};

#[tokio::test]
async fn test_register_login_me() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "email": "  Ann@Example.com ",
            "password": PASSWORD,
            "name": "Ann",
            "username": "Ann_W"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let registered: Value = response.json();
    assert!(registered["token"].as_str().is_some());
    assert_eq!(registered["user"]["email"], "ann@example.com");
    assert_eq!(registered["user"]["username"], "ann_w");
    assert_eq!(registered["user"]["name"], "Ann");
    assert!(registered["user"].get("password").is_none());

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({"email": "ann@example.com", "password": PASSWORD}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let logged_in: Value = response.json();
    assert_eq!(logged_in["user"], registered["user"]);

    let response = app
        .server
        .get("/api/auth/me")
        .authorization_bearer(logged_in["token"].as_str().unwrap())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let me: Value = response.json();
    assert_eq!(me["user"], registered["user"]);
}

#[tokio::test]
async fn test_short_email_account_round_trip() {
    let app = TestApp::new();
    let credentials = json!({"email": "a@b.com", "password": "secret1"});

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({"email": "a@b.com", "password": "secret1", "name": "A", "username": "a_b"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = app.server.post("/api/auth/login").json(&credentials).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();

    let me: Value = app
        .server
        .get("/api/auth/me")
        .authorization_bearer(body["token"].as_str().unwrap())
        .await
        .json();
    assert_eq!(me["user"]["username"], "a_b");
    assert_eq!(me["user"]["email"], "a@b.com");
}

#[tokio::test]
async fn test_duplicate_email_and_username_rejected() {
    let app = TestApp::new();
    app.register("ann").await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "email": "ANN@example.com",
            "password": PASSWORD,
            "name": "Other Ann",
            "username": "someone"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Registration failed");
    assert_eq!(body["error"], "User with this email already exists");

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "email": "other@example.com",
            "password": PASSWORD,
            "name": "Other Ann",
            "username": "ANN"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Username is already taken");
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new();

    for body in [
        json!({"email": "a@example.com", "password": PASSWORD, "name": "A"}),
        json!({"email": "not-an-email", "password": PASSWORD, "name": "A", "username": "a"}),
        json!({"email": "a@example.com", "password": "12345", "name": "A", "username": "a"}),
        json!({"email": "a@example.com", "password": PASSWORD, "name": "A", "username": "a b"}),
    ] {
        let response = app.server.post("/api/auth/register").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{body}");
    }
}

#[tokio::test]
async fn test_login_failures() {
    let app = TestApp::new();
    app.register("ann").await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({"email": "ann@example.com", "password": "wrong-password"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid email or password");

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({"email": "nobody@example.com", "password": PASSWORD}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({"email": "ann@example.com"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_me_rejects_bad_credentials() {
    let app = TestApp::new();

    let response = app.server.get("/api/auth/me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get("/api/auth/me")
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("Basic YWJjOmRlZg=="))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get("/api/auth/me")
        .authorization_bearer("not.a.token")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Authentication failed");
}

#[tokio::test]
async fn test_token_valid_for_seven_days() {
    let app = TestApp::new();
    let ann = app.register("ann").await;

    let almost_expired = app
        .sessions
        .create_token_at(ann.id, Utc::now() - Duration::days(7) + Duration::minutes(1))
        .unwrap();
    let response = app
        .server
        .get("/api/auth/me")
        .authorization_bearer(&almost_expired)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let expired = app
        .sessions
        .create_token_at(ann.id, Utc::now() - Duration::days(7) - Duration::minutes(1))
        .unwrap();
    let response = app
        .server
        .get("/api/auth/me")
        .authorization_bearer(&expired)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_unknown_user() {
    let app = TestApp::new();
    let token = app.sessions.create_token(Uuid::new_v4()).unwrap();

    let response = app.server.get("/api/auth/me").authorization_bearer(&token).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["message"], "User not found");

    let response = app
        .server
        .get("/api/blog-collections/my-collections")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_json_body() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/auth/login")
        .text("{not json")
        .content_type("application/json")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid request body");
}
