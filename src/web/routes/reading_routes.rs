use axum::{
    Json, Router,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::Set;
use serde::Deserialize;
use std::sync::Arc;

use crate::db::entities::sensor_reading;
use crate::db::models::SensorReadingDto;
use crate::db::new_id;
use crate::db::services::{reading_service, station_service};
use crate::services::agronomy;
use crate::services::aggregate::{self, DailyAggregate};
use crate::web::models::AuthenticatedUser;
use crate::web::permissions::{self, require_editor};
use crate::web::{AppError, AppState};

/// Query windows the dashboard offers; anything else is a client bug.
pub const ALLOWED_RANGES: [u32; 4] = [3, 7, 15, 30];

pub const DEFAULT_LIMIT: u64 = 1000;
pub const MAX_LIMIT: u64 = 5000;

pub fn reading_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/{id}/readings",
            get(list_readings_handler).post(create_reading_handler),
        )
        .route("/{id}/readings/latest", get(latest_reading_handler))
        .route("/{id}/daily", get(daily_aggregates_handler))
}

#[derive(Deserialize)]
pub struct ReadingsQuery {
    pub days: Option<u32>,
    pub limit: Option<u64>,
}

/// Validates a `days` query value against the offered windows (default 7).
pub fn resolve_range(days: Option<u32>) -> Result<u32, AppError> {
    let days = days.unwrap_or(7);
    if ALLOWED_RANGES.contains(&days) {
        Ok(days)
    } else {
        Err(AppError::InvalidInput(format!(
            "days must be one of 3, 7, 15, 30 (got {days})"
        )))
    }
}

/// Start of the query window: midnight UTC, `days` days back.
pub fn range_start(days: u32, now: DateTime<Utc>) -> DateTime<Utc> {
    (now - Duration::days(i64::from(days)))
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc()
}

fn resolve_limit(limit: Option<u64>) -> Result<u64, AppError> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if (1..=MAX_LIMIT).contains(&limit) {
        Ok(limit)
    } else {
        Err(AppError::InvalidInput(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )))
    }
}

async fn check_station_access(
    app_state: &AppState,
    auth_user: &AuthenticatedUser,
    station_id: &str,
) -> Result<(), AppError> {
    let scope = permissions::load_scope(&app_state.db, auth_user).await?;
    if !scope.can_access_station(station_id) {
        return Err(AppError::Forbidden("station not permitted".to_string()));
    }
    if station_service::get_station(&app_state.db, station_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("station not found".to_string()));
    }
    Ok(())
}

async fn list_readings_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(station_id): Path<String>,
    Query(params): Query<ReadingsQuery>,
) -> Result<Json<Vec<SensorReadingDto>>, AppError> {
    let days = resolve_range(params.days)?;
    let limit = resolve_limit(params.limit)?;
    check_station_access(&app_state, &auth_user, &station_id).await?;

    let start = range_start(days, Utc::now());
    let readings =
        reading_service::list_readings_since(&app_state.db, &station_id, start, limit).await?;
    Ok(Json(
        readings.into_iter().map(SensorReadingDto::from).collect(),
    ))
}

async fn latest_reading_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(station_id): Path<String>,
) -> Result<Json<Option<SensorReadingDto>>, AppError> {
    check_station_access(&app_state, &auth_user, &station_id).await?;

    let reading = reading_service::latest_reading(&app_state.db, &station_id).await?;
    Ok(Json(reading.map(SensorReadingDto::from)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReadingRequest {
    pub id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub air_temperature: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub light_intensity: Option<f64>,
    pub wind_direction: Option<f64>,
    pub wind_speed: Option<f64>,
    pub rainfall: Option<f64>,
    pub atmospheric_pressure: Option<f64>,
    pub vpd: Option<f64>,
    pub soil_moisture1: Option<f64>,
    pub soil_moisture2: Option<f64>,
}

async fn create_reading_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(station_id): Path<String>,
    Json(payload): Json<CreateReadingRequest>,
) -> Result<(StatusCode, Json<SensorReadingDto>), AppError> {
    require_editor(&auth_user)?;
    check_station_access(&app_state, &auth_user, &station_id).await?;

    // Derive VPD at ingest when the sample doesn't carry one.
    let vpd = payload.vpd.or_else(|| {
        match (payload.air_temperature, payload.relative_humidity) {
            (Some(temperature), Some(humidity)) => Some(agronomy::vpd(temperature, humidity)),
            _ => None,
        }
    });

    let reading = sensor_reading::ActiveModel {
        id: Set(payload.id.unwrap_or_else(|| new_id("reading"))),
        station_id: Set(station_id),
        timestamp: Set(payload.timestamp.unwrap_or_else(Utc::now)),
        air_temperature: Set(payload.air_temperature),
        relative_humidity: Set(payload.relative_humidity),
        light_intensity: Set(payload.light_intensity),
        wind_direction: Set(payload.wind_direction),
        wind_speed: Set(payload.wind_speed),
        rainfall: Set(payload.rainfall),
        atmospheric_pressure: Set(payload.atmospheric_pressure),
        vpd: Set(vpd),
        soil_moisture1: Set(payload.soil_moisture1),
        soil_moisture2: Set(payload.soil_moisture2),
    };

    let inserted = reading_service::insert_reading(&app_state.db, reading).await?;
    Ok((StatusCode::CREATED, Json(SensorReadingDto::from(inserted))))
}

async fn daily_aggregates_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(station_id): Path<String>,
    Query(params): Query<ReadingsQuery>,
) -> Result<Json<Vec<DailyAggregate>>, AppError> {
    let days = resolve_range(params.days)?;
    check_station_access(&app_state, &auth_user, &station_id).await?;

    let start = range_start(days, Utc::now());
    let readings =
        reading_service::list_readings_since(&app_state.db, &station_id, start, MAX_LIMIT).await?;
    Ok(Json(aggregate::aggregate_daily(&station_id, &readings)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_offered_windows_are_accepted() {
        assert_eq!(resolve_range(None).unwrap(), 7);
        for days in ALLOWED_RANGES {
            assert_eq!(resolve_range(Some(days)).unwrap(), days);
        }
        assert!(resolve_range(Some(0)).is_err());
        assert!(resolve_range(Some(14)).is_err());
        assert!(resolve_range(Some(365)).is_err());
    }

    #[test]
    fn range_starts_at_midnight_utc() {
        let now = chrono::NaiveDateTime::parse_from_str("2026-08-06 15:30:00", "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc();
        let start = range_start(7, now);
        assert_eq!(start.to_rfc3339(), "2026-07-30T00:00:00+00:00");
    }

    #[test]
    fn limit_bounds() {
        assert_eq!(resolve_limit(None).unwrap(), DEFAULT_LIMIT);
        assert_eq!(resolve_limit(Some(1)).unwrap(), 1);
        assert!(resolve_limit(Some(0)).is_err());
        assert!(resolve_limit(Some(MAX_LIMIT + 1)).is_err());
    }
}
