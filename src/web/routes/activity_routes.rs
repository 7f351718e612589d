use axum::{
    Json, Router,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, Set};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::db::entities::plot_activity;
use crate::db::models::PlotActivityDto;
use crate::db::new_id;
use crate::db::services::{activity_service, station_service, user_service};
use crate::web::models::AuthenticatedUser;
use crate::web::permissions::{self, PermissionScope, require_editor};
use crate::web::{AppError, AppState};

/// An activity records at most this many photos.
pub const MAX_ACTIVITY_IMAGES: usize = 3;

pub fn activity_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_activities_handler).post(create_activity_handler))
        .route(
            "/{id}",
            put(update_activity_handler).delete(delete_activity_handler),
        )
}

fn validate_images(images: &[String]) -> Result<(), AppError> {
    if images.len() > MAX_ACTIVITY_IMAGES {
        return Err(AppError::InvalidInput(format!(
            "an activity can carry at most {MAX_ACTIVITY_IMAGES} images"
        )));
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitiesQuery {
    pub station_id: Option<String>,
}

async fn list_activities_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<Vec<PlotActivityDto>>, AppError> {
    let scope = permissions::load_scope(&app_state.db, &auth_user).await?;
    if let Some(station_id) = &params.station_id {
        if !scope.can_access_station(station_id) {
            return Err(AppError::Forbidden("station not permitted".to_string()));
        }
    }

    let activities = activity_service::list_activities(
        &app_state.db,
        params.station_id.as_deref(),
        scope.station_filter(),
    )
    .await?;
    Ok(Json(
        activities.into_iter().map(PlotActivityDto::from).collect(),
    ))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    pub station_id: String,
    pub date: NaiveDate,
    pub activity_type: String,
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
}

async fn create_activity_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateActivityRequest>,
) -> Result<(StatusCode, Json<PlotActivityDto>), AppError> {
    require_editor(&auth_user)?;

    if payload.activity_type.is_empty() || payload.description.is_empty() {
        return Err(AppError::InvalidInput(
            "activity type and description are required".to_string(),
        ));
    }
    validate_images(&payload.images)?;

    // The creator's row supplies both the permitted set and the display name
    // stamped onto the activity.
    let creator = user_service::get_user_by_id(&app_state.db, &auth_user.id)
        .await?
        .ok_or(AppError::InvalidCredentials)?;
    let scope = PermissionScope::new(creator.role, creator.permitted_ids());
    if !scope.can_access_station(&payload.station_id) {
        return Err(AppError::Forbidden("station not permitted".to_string()));
    }

    if station_service::get_station(&app_state.db, &payload.station_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("station not found".to_string()));
    }

    let activity = activity_service::insert_activity(
        &app_state.db,
        plot_activity::ActiveModel {
            id: Set(new_id("activity")),
            station_id: Set(payload.station_id),
            date: Set(payload.date),
            activity_type: Set(payload.activity_type),
            description: Set(payload.description),
            created_by: Set(creator.id),
            created_by_name: Set(creator.full_name),
            images: Set(json!(payload.images)),
            created_at: Set(Utc::now()),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(PlotActivityDto::from(activity))))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityRequest {
    pub station_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub activity_type: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
}

async fn update_activity_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(activity_id): Path<String>,
    Json(payload): Json<UpdateActivityRequest>,
) -> Result<Json<PlotActivityDto>, AppError> {
    require_editor(&auth_user)?;
    if let Some(images) = &payload.images {
        validate_images(images)?;
    }

    let scope = permissions::load_scope(&app_state.db, &auth_user).await?;

    let activity = activity_service::get_activity(&app_state.db, &activity_id)
        .await?
        .ok_or_else(|| AppError::NotFound("activity not found".to_string()))?;
    if !scope.can_access_station(&activity.station_id) {
        return Err(AppError::Forbidden("station not permitted".to_string()));
    }

    // Moving the activity to another plot needs access to the target too.
    if let Some(station_id) = &payload.station_id {
        if !scope.can_access_station(station_id) {
            return Err(AppError::Forbidden("station not permitted".to_string()));
        }
        if station_service::get_station(&app_state.db, station_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("station not found".to_string()));
        }
    }

    let mut active: plot_activity::ActiveModel = activity.into();
    if let Some(station_id) = payload.station_id {
        active.station_id = Set(station_id);
    }
    if let Some(date) = payload.date {
        active.date = Set(date);
    }
    if let Some(activity_type) = payload.activity_type {
        active.activity_type = Set(activity_type);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(images) = payload.images {
        active.images = Set(json!(images));
    }

    let updated = active.update(&app_state.db).await?;
    Ok(Json(PlotActivityDto::from(updated)))
}

async fn delete_activity_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(activity_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_editor(&auth_user)?;

    let scope = permissions::load_scope(&app_state.db, &auth_user).await?;
    let activity = activity_service::get_activity(&app_state.db, &activity_id)
        .await?
        .ok_or_else(|| AppError::NotFound("activity not found".to_string()))?;
    if !scope.can_access_station(&activity.station_id) {
        return Err(AppError::Forbidden("station not permitted".to_string()));
    }

    activity_service::delete_activity(&app_state.db, &activity_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
