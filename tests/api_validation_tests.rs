//! Input validation: requests rejected before any database work.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;

use wimarc::db::enums::UserRole;

mod common;

fn admin_request(token: &str, method: &str, uri: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap()
}

#[tokio::test]
async fn unsupported_time_range_is_rejected() {
    let (app, config) = common::create_test_app(common::mock_db());
    let token = common::create_test_jwt("user-1", "admin", UserRole::Admin, &config.jwt_secret);

    let response = app
        .oneshot(admin_request(
            &token,
            "GET",
            "/api/stations/weather-1/readings?days=14",
            Body::empty(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn zero_limit_is_rejected() {
    let (app, config) = common::create_test_app(common::mock_db());
    let token = common::create_test_jwt("user-1", "admin", UserRole::Admin, &config.jwt_secret);

    let response = app
        .oneshot(admin_request(
            &token,
            "GET",
            "/api/stations/weather-1/readings?days=7&limit=0",
            Body::empty(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_sensor_column_is_rejected() {
    let (app, config) = common::create_test_app(common::mock_db());
    let token = common::create_test_jwt("user-1", "admin", UserRole::Admin, &config.jwt_secret);

    let response = app
        .oneshot(admin_request(
            &token,
            "GET",
            "/api/export/stations/weather-1/readings.csv?days=7&sensors=bogusField",
            Body::empty(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_requires_username_and_password() {
    let (app, _config) = common::create_test_app(common::mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"username":"","password":""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn activity_with_four_images_is_rejected() {
    let (app, config) = common::create_test_app(common::mock_db());
    let token = common::create_test_jwt("user-1", "admin", UserRole::Admin, &config.jwt_secret);

    let payload = serde_json::json!({
        "stationId": "weather-1",
        "date": "2026-08-01",
        "activityType": "Fertilizing",
        "description": "north rows",
        "images": ["/1.jpg", "/2.jpg", "/3.jpg", "/4.jpg"],
    });

    let response = app
        .oneshot(admin_request(
            &token,
            "POST",
            "/api/activities",
            Body::from(payload.to_string()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn short_password_on_user_create_is_rejected() {
    let (app, config) = common::create_test_app(common::mock_db());
    let token = common::create_test_jwt("user-1", "admin", UserRole::Admin, &config.jwt_secret);

    let payload = serde_json::json!({
        "username": "newuser",
        "password": "short",
        "role": "user",
        "name": "New User",
        "email": "new@example.com",
    });

    let response = app
        .oneshot(admin_request(
            &token,
            "POST",
            "/api/users",
            Body::from(payload.to_string()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
