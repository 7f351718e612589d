use axum::{
    Json, Router,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::entities::{sim_card, sim_payment};
use crate::db::enums::{PaymentStatus, SimStatus};
use crate::db::models::{SimCardDto, SimPaymentDto};
use crate::db::new_id;
use crate::db::services::sim_service;
use crate::web::models::AuthenticatedUser;
use crate::web::permissions::{self, require_admin, require_editor};
use crate::web::{AppError, AppState};

/// Pending payments due within this many days count as "upcoming".
pub const UPCOMING_WINDOW_DAYS: i64 = 30;

pub fn sim_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/sim-cards",
            get(list_sim_cards_handler).post(create_sim_card_handler),
        )
        .route(
            "/api/sim-cards/{id}",
            put(update_sim_card_handler).delete(delete_sim_card_handler),
        )
        .route(
            "/api/sim-payments",
            get(list_sim_payments_handler).post(create_sim_payment_handler),
        )
        .route("/api/sim-payments/summary", get(payment_summary_handler))
        .route("/api/sim-payments/{id}", put(update_sim_payment_handler))
        .route(
            "/api/sim-payments/{id}/mark-paid",
            put(mark_paid_handler),
        )
}

// --- SIM cards (admin only) ---

async fn list_sim_cards_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<SimCardDto>>, AppError> {
    require_admin(&auth_user)?;
    let cards = sim_service::list_sim_cards(&app_state.db).await?;
    Ok(Json(cards.into_iter().map(SimCardDto::from).collect()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSimCardRequest {
    pub sim_number: String,
    pub provider: String,
    pub associated_station: Option<String>,
    pub status: SimStatus,
}

async fn create_sim_card_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateSimCardRequest>,
) -> Result<(StatusCode, Json<SimCardDto>), AppError> {
    require_admin(&auth_user)?;

    if payload.sim_number.is_empty() || payload.provider.is_empty() {
        return Err(AppError::InvalidInput(
            "sim number and provider are required".to_string(),
        ));
    }

    let card = sim_card::ActiveModel {
        id: Set(new_id("sim")),
        sim_number: Set(payload.sim_number),
        provider: Set(payload.provider),
        associated_station: Set(payload.associated_station),
        status: Set(payload.status),
        last_communication: Set(None),
    }
    .insert(&app_state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(SimCardDto::from(card))))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSimCardRequest {
    pub sim_number: Option<String>,
    pub provider: Option<String>,
    pub associated_station: Option<Option<String>>,
    pub status: Option<SimStatus>,
    pub last_communication: Option<chrono::DateTime<Utc>>,
}

async fn update_sim_card_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(sim_id): Path<String>,
    Json(payload): Json<UpdateSimCardRequest>,
) -> Result<Json<SimCardDto>, AppError> {
    require_admin(&auth_user)?;

    let card = sim_service::get_sim_card(&app_state.db, &sim_id)
        .await?
        .ok_or_else(|| AppError::NotFound("sim card not found".to_string()))?;

    let mut active: sim_card::ActiveModel = card.into();
    if let Some(sim_number) = payload.sim_number {
        active.sim_number = Set(sim_number);
    }
    if let Some(provider) = payload.provider {
        active.provider = Set(provider);
    }
    if let Some(associated_station) = payload.associated_station {
        active.associated_station = Set(associated_station);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(last_communication) = payload.last_communication {
        active.last_communication = Set(Some(last_communication));
    }

    let updated = active.update(&app_state.db).await?;
    Ok(Json(SimCardDto::from(updated)))
}

async fn delete_sim_card_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(sim_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&auth_user)?;

    let removed = sim_service::delete_sim_card(&app_state.db, &sim_id).await?;
    if removed == 0 {
        return Err(AppError::NotFound("sim card not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- SIM payments (viewing scoped to permitted stations, mutations admin) ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentsQuery {
    pub station_id: Option<String>,
    pub status: Option<PaymentStatus>,
}

async fn list_sim_payments_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<PaymentsQuery>,
) -> Result<Json<Vec<SimPaymentDto>>, AppError> {
    require_editor(&auth_user)?;
    let scope = permissions::load_scope(&app_state.db, &auth_user).await?;
    if let Some(station_id) = &params.station_id {
        if !scope.can_access_station(station_id) {
            return Err(AppError::Forbidden("station not permitted".to_string()));
        }
    }

    let payments = sim_service::list_sim_payments(
        &app_state.db,
        params.station_id.as_deref(),
        params.status,
        scope.station_filter(),
    )
    .await?;
    Ok(Json(payments.into_iter().map(SimPaymentDto::from).collect()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSimPaymentRequest {
    pub station_id: String,
    pub station_name: Option<String>,
    pub sim_number: String,
    pub provider: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    #[serde(default = "default_payment_status")]
    pub status: PaymentStatus,
    pub paid_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

fn default_payment_status() -> PaymentStatus {
    PaymentStatus::Pending
}

async fn create_sim_payment_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateSimPaymentRequest>,
) -> Result<(StatusCode, Json<SimPaymentDto>), AppError> {
    require_admin(&auth_user)?;

    if payload.amount < 0.0 {
        return Err(AppError::InvalidInput("amount cannot be negative".to_string()));
    }

    let payment = sim_payment::ActiveModel {
        id: Set(new_id("payment")),
        station_id: Set(payload.station_id),
        station_name: Set(payload.station_name),
        sim_number: Set(payload.sim_number),
        provider: Set(payload.provider),
        amount: Set(payload.amount),
        due_date: Set(payload.due_date),
        status: Set(payload.status),
        paid_date: Set(payload.paid_date),
        notes: Set(payload.notes),
    }
    .insert(&app_state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(SimPaymentDto::from(payment))))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSimPaymentRequest {
    pub station_id: Option<String>,
    pub station_name: Option<Option<String>>,
    pub sim_number: Option<String>,
    pub provider: Option<String>,
    pub amount: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<PaymentStatus>,
    pub paid_date: Option<Option<NaiveDate>>,
    pub notes: Option<Option<String>>,
}

async fn update_sim_payment_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(payment_id): Path<String>,
    Json(payload): Json<UpdateSimPaymentRequest>,
) -> Result<Json<SimPaymentDto>, AppError> {
    require_admin(&auth_user)?;

    let payment = sim_service::get_sim_payment(&app_state.db, &payment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("payment not found".to_string()))?;

    let mut active: sim_payment::ActiveModel = payment.into();
    if let Some(station_id) = payload.station_id {
        active.station_id = Set(station_id);
    }
    if let Some(station_name) = payload.station_name {
        active.station_name = Set(station_name);
    }
    if let Some(sim_number) = payload.sim_number {
        active.sim_number = Set(sim_number);
    }
    if let Some(provider) = payload.provider {
        active.provider = Set(provider);
    }
    if let Some(amount) = payload.amount {
        if amount < 0.0 {
            return Err(AppError::InvalidInput("amount cannot be negative".to_string()));
        }
        active.amount = Set(amount);
    }
    if let Some(due_date) = payload.due_date {
        active.due_date = Set(due_date);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(paid_date) = payload.paid_date {
        active.paid_date = Set(paid_date);
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(notes);
    }

    let updated = active.update(&app_state.db).await?;
    Ok(Json(SimPaymentDto::from(updated)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkPaidRequest {
    pub paid_date: NaiveDate,
    pub notes: Option<String>,
}

async fn mark_paid_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(payment_id): Path<String>,
    Json(payload): Json<MarkPaidRequest>,
) -> Result<Json<SimPaymentDto>, AppError> {
    require_admin(&auth_user)?;

    let payment = sim_service::get_sim_payment(&app_state.db, &payment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("payment not found".to_string()))?;

    let mut active: sim_payment::ActiveModel = payment.into();
    active.status = Set(PaymentStatus::Paid);
    active.paid_date = Set(Some(payload.paid_date));
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }

    let updated = active.update(&app_state.db).await?;
    Ok(Json(SimPaymentDto::from(updated)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTotals {
    pub total: f64,
    pub paid: f64,
    pub pending: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub totals: PaymentTotals,
    pub upcoming: Vec<SimPaymentDto>,
    pub overdue: Vec<SimPaymentDto>,
}

pub fn payment_totals(payments: &[sim_payment::Model]) -> PaymentTotals {
    payments.iter().fold(
        PaymentTotals {
            total: 0.0,
            paid: 0.0,
            pending: 0.0,
        },
        |mut acc, payment| {
            acc.total += payment.amount;
            match payment.status {
                PaymentStatus::Paid => acc.paid += payment.amount,
                PaymentStatus::Pending => acc.pending += payment.amount,
            }
            acc
        },
    )
}

/// Pending payments due between `today` and `today + UPCOMING_WINDOW_DAYS`.
pub fn upcoming_payments(
    payments: &[sim_payment::Model],
    today: NaiveDate,
) -> Vec<sim_payment::Model> {
    let horizon = today + Duration::days(UPCOMING_WINDOW_DAYS);
    payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Pending)
        .filter(|p| p.due_date >= today && p.due_date <= horizon)
        .cloned()
        .collect()
}

/// Pending payments whose due date has passed.
pub fn overdue_payments(
    payments: &[sim_payment::Model],
    today: NaiveDate,
) -> Vec<sim_payment::Model> {
    payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Pending)
        .filter(|p| p.due_date < today)
        .cloned()
        .collect()
}

async fn payment_summary_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<PaymentSummary>, AppError> {
    require_editor(&auth_user)?;
    let scope = permissions::load_scope(&app_state.db, &auth_user).await?;

    let payments =
        sim_service::list_sim_payments(&app_state.db, None, None, scope.station_filter()).await?;

    let today = Utc::now().date_naive();
    let summary = PaymentSummary {
        totals: payment_totals(&payments),
        upcoming: upcoming_payments(&payments, today)
            .into_iter()
            .map(SimPaymentDto::from)
            .collect(),
        overdue: overdue_payments(&payments, today)
            .into_iter()
            .map(SimPaymentDto::from)
            .collect(),
    };
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(id: &str, amount: f64, due: &str, status: PaymentStatus) -> sim_payment::Model {
        sim_payment::Model {
            id: id.to_string(),
            station_id: "weather-1".to_string(),
            station_name: None,
            sim_number: "0812345678".to_string(),
            provider: "AIS".to_string(),
            amount,
            due_date: due.parse().unwrap(),
            status,
            paid_date: None,
            notes: None,
        }
    }

    #[test]
    fn totals_split_by_status() {
        let payments = vec![
            payment("p1", 199.0, "2026-08-10", PaymentStatus::Pending),
            payment("p2", 149.0, "2026-07-10", PaymentStatus::Paid),
            payment("p3", 99.0, "2026-08-20", PaymentStatus::Pending),
        ];
        let totals = payment_totals(&payments);
        assert_eq!(totals.total, 447.0);
        assert_eq!(totals.paid, 149.0);
        assert_eq!(totals.pending, 298.0);
    }

    #[test]
    fn upcoming_window_excludes_overdue_and_far_future() {
        let today: NaiveDate = "2026-08-06".parse().unwrap();
        let payments = vec![
            payment("due-soon", 1.0, "2026-08-10", PaymentStatus::Pending),
            payment("due-today", 1.0, "2026-08-06", PaymentStatus::Pending),
            payment("overdue", 1.0, "2026-08-01", PaymentStatus::Pending),
            payment("far-out", 1.0, "2026-10-01", PaymentStatus::Pending),
            payment("settled", 1.0, "2026-08-10", PaymentStatus::Paid),
        ];

        let upcoming = upcoming_payments(&payments, today);
        let ids: Vec<&str> = upcoming.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["due-soon", "due-today"]);

        let overdue = overdue_payments(&payments, today);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, "overdue");
    }
}
