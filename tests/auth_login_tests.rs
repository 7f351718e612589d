//! Login flow against a mocked user table.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, MockDatabase};
use tower::ServiceExt;

use wimarc::db::enums::UserRole;

mod common;

fn login_request(username: &str, password: &str) -> Request<Body> {
    let payload = serde_json::json!({ "username": username, "password": password });
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn valid_credentials_issue_token_and_cookie() {
    let hash = bcrypt::hash("correct horse battery", bcrypt::DEFAULT_COST).unwrap();
    let account = common::test_user("user-1", "user1", UserRole::User, &["weather-1"], &hash);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![account]])
        .into_connection();
    let (app, _config) = common::create_test_app(db);

    let response = app
        .oneshot(login_request("user1", "correct horse battery"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets the auth cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("HttpOnly"));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(payload["token"].as_str().unwrap().len() > 20);
    assert_eq!(payload["user"]["username"], "user1");
    assert_eq!(payload["user"]["permittedStationIds"][0], "weather-1");
    // The hash must never appear in a response.
    assert!(payload["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let hash = bcrypt::hash("correct horse battery", bcrypt::DEFAULT_COST).unwrap();
    let account = common::test_user("user-1", "user1", UserRole::User, &[], &hash);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![account]])
        .into_connection();
    let (app, _config) = common::create_test_app(db);

    let response = app
        .oneshot(login_request("user1", "wrong password"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_user_is_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<wimarc::db::entities::user::Model>::new()])
        .into_connection();
    let (app, _config) = common::create_test_app(db);

    let response = app
        .oneshot(login_request("nobody", "whatever password"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn disabled_account_cannot_log_in() {
    let hash = bcrypt::hash("correct horse battery", bcrypt::DEFAULT_COST).unwrap();
    let mut account = common::test_user("user-1", "user1", UserRole::User, &[], &hash);
    account.is_enabled = false;
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![account]])
        .into_connection();
    let (app, _config) = common::create_test_app(db);

    let response = app
        .oneshot(login_request("user1", "correct horse battery"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_the_fresh_user_row() {
    let account = common::test_user(
        "user-1",
        "user1",
        UserRole::User,
        &["weather-1", "soil-1"],
        "unused",
    );
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![account]])
        .into_connection();
    let (app, config) = common::create_test_app(db);
    let token = common::create_test_jwt("user-1", "user1", UserRole::User, &config.jwt_secret);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload["username"], "user1");
    assert_eq!(payload["permittedStationIds"].as_array().unwrap().len(), 2);
}
