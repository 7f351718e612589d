use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use sea_orm::{ActiveModelTrait, Set};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::entities::station;
use crate::db::enums::{StationStatus, StationType};
use crate::db::models::{LocationDto, StationDto, StationImageDto, WeatherForecastDto};
use crate::db::new_id;
use crate::db::services::{forecast_service, station_service};
use crate::web::error::conflict_on_unique_violation;
use crate::web::models::AuthenticatedUser;
use crate::web::permissions::{self, require_admin};
use crate::web::{AppError, AppState};

pub fn station_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_stations_handler).post(create_station_handler))
        .route(
            "/{id}",
            get(get_station_handler)
                .put(update_station_handler)
                .delete(delete_station_handler),
        )
        .route("/{id}/images", get(list_station_images_handler))
        .route("/{id}/forecast", get(station_forecast_handler))
}

async fn list_stations_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<StationDto>>, AppError> {
    let scope = permissions::load_scope(&app_state.db, &auth_user).await?;
    let stations = match scope.station_filter() {
        None => station_service::list_stations(&app_state.db).await?,
        Some(ids) => station_service::list_stations_by_ids(&app_state.db, ids).await?,
    };
    Ok(Json(stations.into_iter().map(StationDto::from).collect()))
}

async fn get_station_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(station_id): Path<String>,
) -> Result<Json<StationDto>, AppError> {
    let scope = permissions::load_scope(&app_state.db, &auth_user).await?;
    if !scope.can_access_station(&station_id) {
        return Err(AppError::Forbidden("station not permitted".to_string()));
    }

    let station = station_service::get_station(&app_state.db, &station_id)
        .await?
        .ok_or_else(|| AppError::NotFound("station not found".to_string()))?;
    Ok(Json(StationDto::from(station)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStationRequest {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub station_type: StationType,
    pub location: LocationDto,
    pub status: StationStatus,
    pub sim_card_id: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: String,
}

async fn create_station_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateStationRequest>,
) -> Result<(StatusCode, Json<StationDto>), AppError> {
    require_admin(&auth_user)?;

    if payload.name.is_empty() {
        return Err(AppError::InvalidInput("station name is required".to_string()));
    }

    let station_id = payload.id.unwrap_or_else(|| new_id("station"));
    if station_service::get_station(&app_state.db, &station_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("station already exists".to_string()));
    }

    let station = station::ActiveModel {
        id: Set(station_id),
        name: Set(payload.name),
        station_type: Set(payload.station_type),
        latitude: Set(payload.location.lat),
        longitude: Set(payload.location.lng),
        address: Set(payload.location.address),
        status: Set(payload.status),
        last_data_time: Set(None),
        sim_card_id: Set(payload.sim_card_id),
        image_url: Set(payload.image_url),
        description: Set(payload.description),
    }
    .insert(&app_state.db)
    .await
    .map_err(|e| conflict_on_unique_violation(e, "station already exists"))?;

    Ok((StatusCode::CREATED, Json(StationDto::from(station))))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStationRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub station_type: Option<StationType>,
    pub location: Option<LocationDto>,
    pub status: Option<StationStatus>,
    pub sim_card_id: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub description: Option<String>,
}

async fn update_station_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(station_id): Path<String>,
    Json(payload): Json<UpdateStationRequest>,
) -> Result<Json<StationDto>, AppError> {
    require_admin(&auth_user)?;

    let station = station_service::get_station(&app_state.db, &station_id)
        .await?
        .ok_or_else(|| AppError::NotFound("station not found".to_string()))?;

    let mut active: station::ActiveModel = station.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(station_type) = payload.station_type {
        active.station_type = Set(station_type);
    }
    if let Some(location) = payload.location {
        active.latitude = Set(location.lat);
        active.longitude = Set(location.lng);
        active.address = Set(location.address);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(sim_card_id) = payload.sim_card_id {
        active.sim_card_id = Set(sim_card_id);
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(image_url);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }

    let updated = active.update(&app_state.db).await?;
    Ok(Json(StationDto::from(updated)))
}

async fn delete_station_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(station_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&auth_user)?;

    let removed = station_service::delete_station(&app_state.db, &station_id).await?;
    if removed == 0 {
        return Err(AppError::NotFound("station not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_station_images_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(station_id): Path<String>,
) -> Result<Json<Vec<StationImageDto>>, AppError> {
    let scope = permissions::load_scope(&app_state.db, &auth_user).await?;
    if !scope.can_access_station(&station_id) {
        return Err(AppError::Forbidden("station not permitted".to_string()));
    }
    if station_service::get_station(&app_state.db, &station_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("station not found".to_string()));
    }

    let images = station_service::list_station_images(&app_state.db, &station_id).await?;
    Ok(Json(images.into_iter().map(StationImageDto::from).collect()))
}

async fn station_forecast_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(station_id): Path<String>,
) -> Result<Json<Vec<WeatherForecastDto>>, AppError> {
    let scope = permissions::load_scope(&app_state.db, &auth_user).await?;
    if !scope.can_access_station(&station_id) {
        return Err(AppError::Forbidden("station not permitted".to_string()));
    }
    if station_service::get_station(&app_state.db, &station_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("station not found".to_string()));
    }

    let forecasts = forecast_service::list_forecasts_for_station(&app_state.db, &station_id).await?;
    Ok(Json(
        forecasts.into_iter().map(WeatherForecastDto::from).collect(),
    ))
}
