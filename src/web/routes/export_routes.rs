use axum::{
    Router,
    extract::{Extension, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::db::services::{activity_service, reading_service, station_service};
use crate::services::aggregate;
use crate::services::export_service::{self, UTF8_BOM};
use crate::web::models::AuthenticatedUser;
use crate::web::permissions;
use crate::web::routes::reading_routes::{MAX_LIMIT, range_start, resolve_range};
use crate::web::{AppError, AppState};

pub fn export_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/export/stations/{id}/readings.csv",
            get(export_readings_handler),
        )
        .route(
            "/api/export/stations/{id}/daily.csv",
            get(export_daily_handler),
        )
        .route("/api/export/activities.csv", get(export_activities_handler))
}

/// text/csv response with a BOM prefix and an attachment filename.
fn csv_response(filename: &str, csv: String) -> Response {
    let disposition = format!("attachment; filename=\"{filename}\"");
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        format!("{UTF8_BOM}{csv}"),
    )
        .into_response()
}

#[derive(Deserialize)]
pub struct ExportReadingsQuery {
    pub days: Option<u32>,
    pub sensors: Option<String>,
}

async fn export_readings_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(station_id): Path<String>,
    Query(params): Query<ExportReadingsQuery>,
) -> Result<Response, AppError> {
    let days = resolve_range(params.days)?;
    let sensors = export_service::parse_sensor_list(params.sensors.as_deref())
        .map_err(AppError::InvalidInput)?;

    let scope = permissions::load_scope(&app_state.db, &auth_user).await?;
    if !scope.can_access_station(&station_id) {
        return Err(AppError::Forbidden("station not permitted".to_string()));
    }
    let station = station_service::get_station(&app_state.db, &station_id)
        .await?
        .ok_or_else(|| AppError::NotFound("station not found".to_string()))?;

    let start = range_start(days, Utc::now());
    let readings =
        reading_service::list_readings_since(&app_state.db, &station_id, start, MAX_LIMIT).await?;

    let csv = export_service::readings_csv(&readings, &sensors);
    let filename = export_service::export_filename(&station.name, "readings", days, Utc::now());
    Ok(csv_response(&filename, csv))
}

#[derive(Deserialize)]
pub struct ExportDailyQuery {
    pub days: Option<u32>,
}

async fn export_daily_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(station_id): Path<String>,
    Query(params): Query<ExportDailyQuery>,
) -> Result<Response, AppError> {
    let days = resolve_range(params.days)?;

    let scope = permissions::load_scope(&app_state.db, &auth_user).await?;
    if !scope.can_access_station(&station_id) {
        return Err(AppError::Forbidden("station not permitted".to_string()));
    }
    let station = station_service::get_station(&app_state.db, &station_id)
        .await?
        .ok_or_else(|| AppError::NotFound("station not found".to_string()))?;

    let start = range_start(days, Utc::now());
    let readings =
        reading_service::list_readings_since(&app_state.db, &station_id, start, MAX_LIMIT).await?;
    let aggregates = aggregate::aggregate_daily(&station_id, &readings);

    let csv = export_service::daily_csv(&aggregates);
    let filename = export_service::export_filename(&station.name, "daily", days, Utc::now());
    Ok(csv_response(&filename, csv))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportActivitiesQuery {
    pub station_id: Option<String>,
}

async fn export_activities_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<ExportActivitiesQuery>,
) -> Result<Response, AppError> {
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

    let csv = export_service::activities_csv(&activities);
    let filename = format!("activities_{}.csv", Utc::now().date_naive());
    Ok(csv_response(&filename, csv))
}
