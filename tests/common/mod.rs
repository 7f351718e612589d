use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::json;
use std::sync::Arc;

use wimarc::config::ServerConfig;
use wimarc::db::entities::user;
use wimarc::db::enums::UserRole;
use wimarc::services::auth_service;
use wimarc::web::create_axum_router;

/// Empty mock database; fine for requests rejected before any query runs.
#[allow(dead_code)]
pub fn mock_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

/// Builds the router over the given connection with test configuration.
#[allow(dead_code)]
pub fn create_test_app(db: DatabaseConnection) -> (axum::Router, Arc<ServerConfig>) {
    let config = Arc::new(ServerConfig::test_default());
    (create_axum_router(db, config.clone()), config)
}

#[allow(dead_code)]
pub fn test_user(
    id: &str,
    username: &str,
    role: UserRole,
    permitted: &[&str],
    password_hash: &str,
) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        role,
        full_name: format!("{username} test"),
        email: format!("{username}@example.com"),
        is_enabled: true,
        permitted_station_ids: json!(permitted),
        created_at: Utc::now(),
    }
}

/// A signed token for the given role, as the auth middleware expects it.
#[allow(dead_code)]
pub fn create_test_jwt(id: &str, username: &str, role: UserRole, jwt_secret: &str) -> String {
    let user = test_user(id, username, role, &[], "unused");
    auth_service::create_jwt_for_user(&user, jwt_secret)
        .expect("token creation")
        .token
}
