//! Authentication middleware behavior: header and cookie token paths.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, MockDatabase};
use tower::ServiceExt;

use wimarc::db::entities::station;
use wimarc::db::enums::{StationStatus, StationType, UserRole};

mod common;

fn demo_station() -> station::Model {
    station::Model {
        id: "weather-1".to_string(),
        name: "Weather Station 1".to_string(),
        station_type: StationType::Weather,
        latitude: 13.7563,
        longitude: 100.5018,
        address: "North Field".to_string(),
        status: StationStatus::Online,
        last_data_time: None,
        sim_card_id: None,
        image_url: None,
        description: "demo".to_string(),
    }
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (app, _config) = common::create_test_app(common::mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/stations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let (app, _config) = common::create_test_app(common::mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/stations")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_wrong_secret_is_unauthorized() {
    let (app, _config) = common::create_test_app(common::mock_db());
    let token = common::create_test_jwt("user-1", "admin", UserRole::Admin, "some-other-secret");

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/stations")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bearer_token_grants_access() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![demo_station()]])
        .into_connection();
    let (app, config) = common::create_test_app(db);
    let token = common::create_test_jwt("user-1", "admin", UserRole::Admin, &config.jwt_secret);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/stations")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let stations: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(stations[0]["id"], "weather-1");
    assert_eq!(stations[0]["type"], "weather");
    assert_eq!(stations[0]["location"]["lat"], 13.7563);
}

#[tokio::test]
async fn cookie_token_grants_access() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![demo_station()]])
        .into_connection();
    let (app, config) = common::create_test_app(db);
    let token = common::create_test_jwt("user-1", "admin", UserRole::Admin, &config.jwt_secret);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/stations")
                .header(header::COOKIE, format!("token={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_needs_no_token() {
    let (app, _config) = common::create_test_app(common::mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
