use axum::{
    Json, Router,
    extract::{Extension, State},
    http::{HeaderValue, Method},
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, AllowOrigin, CorsLayer};

use crate::config::ServerConfig;
use crate::db::models::UserDto;
use crate::db::services::user_service;
use crate::services::auth_service;
use crate::web::{
    middleware::auth,
    models::{AuthenticatedUser, LoginRequest},
    routes::{
        activity_routes, export_routes, reading_routes, sim_routes, station_routes, user_routes,
    },
};

pub mod error;
pub mod middleware;
pub mod models;
pub mod permissions;
pub mod routes;

pub use error::AppError;

pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<ServerConfig>,
}

async fn login_handler(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let login_response =
        auth_service::login_user(&app_state.db, payload, &app_state.config.jwt_secret).await?;

    let auth_cookie = Cookie::build(("token", login_response.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(true)
        .build();

    Ok((jar.add(auth_cookie), Json(login_response)))
}

async fn logout_handler(jar: CookieJar) -> impl IntoResponse {
    (
        jar.remove(Cookie::build(("token", "")).path("/").build()),
        Json(serde_json::json!({ "message": "logged out" })),
    )
}

/// Served fresh from the user row so permission edits show up without a
/// re-login.
async fn me_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<UserDto>, AppError> {
    let user = user_service::get_user_by_id(&app_state.db, &auth_user.id)
        .await?
        .ok_or(AppError::InvalidCredentials)?;
    Ok(Json(UserDto::from(user)))
}

async fn health_check_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn create_axum_router(db: DatabaseConnection, config: Arc<ServerConfig>) -> Router {
    let app_state = Arc::new(AppState { db, config });

    let allow_origin = match &app_state.config.cors_origin {
        Some(origin) => AllowOrigin::exact(
            origin
                .parse::<HeaderValue>()
                .expect("CORS_ORIGIN is not a valid header value"),
        ),
        None => AllowOrigin::any(),
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let auth_layer = axum_middleware::from_fn_with_state(app_state.clone(), auth::auth);

    Router::new()
        .route("/health", get(health_check_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/auth/me", get(me_handler).route_layer(auth_layer.clone()))
        .nest(
            "/api/stations",
            station_routes::station_router()
                .merge(reading_routes::reading_router())
                .route_layer(auth_layer.clone()),
        )
        .nest(
            "/api/activities",
            activity_routes::activity_router().route_layer(auth_layer.clone()),
        )
        .nest(
            "/api/users",
            user_routes::user_router().route_layer(auth_layer.clone()),
        )
        .merge(user_routes::permissions_router().route_layer(auth_layer.clone()))
        .merge(sim_routes::sim_router().route_layer(auth_layer.clone()))
        .merge(export_routes::export_router().route_layer(auth_layer))
        .with_state(app_state)
        .layer(cors)
}
