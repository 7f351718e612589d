//! Server-side role enforcement: guests are read-only, non-admins cannot
//! reach management surfaces, station scoping holds on reads.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, MockDatabase};
use tower::ServiceExt;

use wimarc::db::enums::UserRole;

mod common;

fn authed(token: &str, method: &str, uri: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap()
}

#[tokio::test]
async fn guest_cannot_ingest_readings() {
    let (app, config) = common::create_test_app(common::mock_db());
    let token = common::create_test_jwt("user-g", "guest1", UserRole::Guest, &config.jwt_secret);

    let response = app
        .oneshot(authed(
            &token,
            "POST",
            "/api/stations/weather-1/readings",
            Body::from(r#"{"airTemperature": 25.0}"#),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn guest_cannot_view_sim_payments() {
    let (app, config) = common::create_test_app(common::mock_db());
    let token = common::create_test_jwt("user-g", "guest1", UserRole::Guest, &config.jwt_secret);

    let response = app
        .oneshot(authed(&token, "GET", "/api/sim-payments", Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn non_admin_cannot_list_users() {
    let (app, config) = common::create_test_app(common::mock_db());
    let token = common::create_test_jwt("user-1", "user1", UserRole::User, &config.jwt_secret);

    let response = app
        .oneshot(authed(&token, "GET", "/api/users", Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn non_admin_cannot_create_stations() {
    let (app, config) = common::create_test_app(common::mock_db());
    let token = common::create_test_jwt("user-1", "user1", UserRole::User, &config.jwt_secret);

    let payload = serde_json::json!({
        "name": "Rogue Station",
        "type": "weather",
        "location": {"lat": 0.0, "lng": 0.0, "address": "nowhere"},
        "status": "online",
    });

    let response = app
        .oneshot(authed(
            &token,
            "POST",
            "/api/stations",
            Body::from(payload.to_string()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn non_admin_cannot_enumerate_permissions() {
    let (app, config) = common::create_test_app(common::mock_db());
    let token = common::create_test_jwt("user-1", "user1", UserRole::User, &config.jwt_secret);

    let response = app
        .oneshot(authed(&token, "GET", "/api/permissions", Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn non_admin_cannot_manage_sim_cards() {
    let (app, config) = common::create_test_app(common::mock_db());
    let token = common::create_test_jwt("user-1", "user1", UserRole::User, &config.jwt_secret);

    let response = app
        .oneshot(authed(&token, "GET", "/api/sim-cards", Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn user_cannot_read_station_outside_permitted_set() {
    // The scope lookup reads the caller's row; weather-2 is not granted.
    let caller = common::test_user("user-1", "user1", UserRole::User, &["weather-1"], "unused");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![caller]])
        .into_connection();
    let (app, config) = common::create_test_app(db);
    let token = common::create_test_jwt("user-1", "user1", UserRole::User, &config.jwt_secret);

    let response = app
        .oneshot(authed(&token, "GET", "/api/stations/weather-2", Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn user_station_listing_is_scoped_to_grants() {
    use wimarc::db::entities::station;
    use wimarc::db::enums::{StationStatus, StationType};

    let caller = common::test_user("user-1", "user1", UserRole::User, &["weather-1"], "unused");
    let granted = station::Model {
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
    };
    // First query: the caller's row; second: stations narrowed to the grants.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![caller]])
        .append_query_results([vec![granted]])
        .into_connection();
    let (app, config) = common::create_test_app(db);
    let token = common::create_test_jwt("user-1", "user1", UserRole::User, &config.jwt_secret);

    let response = app
        .oneshot(authed(&token, "GET", "/api/stations", Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let stations: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(stations.as_array().unwrap().len(), 1);
    assert_eq!(stations[0]["id"], "weather-1");
}
