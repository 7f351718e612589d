use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use bcrypt::{DEFAULT_COST, hash};
use sea_orm::{ActiveModelTrait, Set};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::db::entities::user;
use crate::db::enums::UserRole;
use crate::db::models::{PermissionPair, UserDto};
use crate::db::services::{station_service, user_service};
use crate::web::error::conflict_on_unique_violation;
use crate::web::models::AuthenticatedUser;
use crate::web::permissions::require_admin;
use crate::web::{AppError, AppState};

const MIN_PASSWORD_LEN: usize = 8;

pub fn user_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_users_handler).post(create_user_handler))
        .route(
            "/{id}",
            put(update_user_handler).delete(delete_user_handler),
        )
        .route("/{id}/toggle", put(toggle_user_handler))
}

/// `GET /api/permissions` lives outside the `/api/users` nest but shares the
/// admin guard.
pub fn permissions_router() -> Router<Arc<AppState>> {
    Router::new().route("/api/permissions", get(list_permissions_handler))
}

async fn list_users_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserDto>>, AppError> {
    require_admin(&auth_user)?;
    let users = user_service::list_users(&app_state.db).await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: UserRole,
    pub name: String,
    pub email: String,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    #[serde(default)]
    pub permitted_station_ids: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

async fn create_user_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserDto>), AppError> {
    require_admin(&auth_user)?;

    if payload.username.is_empty() || payload.name.is_empty() || payload.email.is_empty() {
        return Err(AppError::InvalidInput(
            "username, name and email are required".to_string(),
        ));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password_hash = hash(&payload.password, DEFAULT_COST)
        .map_err(|e| AppError::PasswordHashingError(e.to_string()))?;

    let created = user_service::create_user(
        &app_state.db,
        &payload.username,
        &password_hash,
        payload.role,
        &payload.name,
        &payload.email,
        payload.is_enabled,
        &payload.permitted_station_ids,
    )
    .await
    .map_err(|e| conflict_on_unique_violation(e, "username already exists"))?;

    Ok((StatusCode::CREATED, Json(UserDto::from(created))))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_enabled: Option<bool>,
    pub permitted_station_ids: Option<Vec<String>>,
}

async fn update_user_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserDto>, AppError> {
    require_admin(&auth_user)?;

    let existing = user_service::get_user_by_id(&app_state.db, &user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    let mut active: user::ActiveModel = existing.into();
    if let Some(username) = payload.username {
        if username.is_empty() {
            return Err(AppError::InvalidInput("username cannot be empty".to_string()));
        }
        active.username = Set(username);
    }
    if let Some(password) = payload.password {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let password_hash =
            hash(&password, DEFAULT_COST).map_err(|e| AppError::PasswordHashingError(e.to_string()))?;
        active.password_hash = Set(password_hash);
    }
    if let Some(role) = payload.role {
        active.role = Set(role);
    }
    if let Some(name) = payload.name {
        active.full_name = Set(name);
    }
    if let Some(email) = payload.email {
        active.email = Set(email);
    }
    if let Some(is_enabled) = payload.is_enabled {
        active.is_enabled = Set(is_enabled);
    }
    if let Some(permitted) = payload.permitted_station_ids {
        active.permitted_station_ids = Set(json!(permitted));
    }

    let updated = active
        .update(&app_state.db)
        .await
        .map_err(|e| conflict_on_unique_violation(e, "username already exists"))?;
    Ok(Json(UserDto::from(updated)))
}

async fn delete_user_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&auth_user)?;

    if user_id == auth_user.id {
        return Err(AppError::InvalidInput(
            "cannot delete the signed-in account".to_string(),
        ));
    }

    let removed = user_service::delete_user(&app_state.db, &user_id).await?;
    if removed == 0 {
        return Err(AppError::NotFound("user not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_user_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserDto>, AppError> {
    require_admin(&auth_user)?;

    let existing = user_service::get_user_by_id(&app_state.db, &user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    let enabled = existing.is_enabled;
    let mut active: user::ActiveModel = existing.into();
    active.is_enabled = Set(!enabled);
    let updated = active.update(&app_state.db).await?;
    Ok(Json(UserDto::from(updated)))
}

/// Every user-to-station grant, flattened. An admin's empty permitted list
/// means "all stations", so it expands here.
async fn list_permissions_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<PermissionPair>>, AppError> {
    require_admin(&auth_user)?;

    let users = user_service::list_users(&app_state.db).await?;
    let all_station_ids: Vec<String> = station_service::list_stations(&app_state.db)
        .await?
        .into_iter()
        .map(|s| s.id)
        .collect();

    let pairs = users
        .iter()
        .flat_map(|user| {
            let permitted = user.permitted_ids();
            let station_ids = if user.role == UserRole::Admin && permitted.is_empty() {
                all_station_ids.clone()
            } else {
                permitted
            };
            station_ids.into_iter().map(|station_id| PermissionPair {
                user_id: user.id.clone(),
                station_id,
            })
        })
        .collect();

    Ok(Json(pairs))
}
