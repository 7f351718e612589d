use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryFilter, QueryOrder,
};

use crate::db::entities::prelude::*;
use crate::db::entities::{sim_card, sim_payment};
use crate::db::enums::PaymentStatus;

pub async fn list_sim_cards(db: &DatabaseConnection) -> Result<Vec<sim_card::Model>, DbErr> {
    SimCard::find()
        .order_by(SimCardColumn::Id, Order::Asc)
        .all(db)
        .await
}

pub async fn get_sim_card(
    db: &DatabaseConnection,
    sim_id: &str,
) -> Result<Option<sim_card::Model>, DbErr> {
    SimCard::find_by_id(sim_id).one(db).await
}

pub async fn delete_sim_card(db: &DatabaseConnection, sim_id: &str) -> Result<u64, DbErr> {
    let res = SimCard::delete_by_id(sim_id).exec(db).await?;
    Ok(res.rows_affected)
}

/// Payments by due date, optionally narrowed by station, status, and a
/// permitted station set (`None` = unscoped).
pub async fn list_sim_payments(
    db: &DatabaseConnection,
    station_id: Option<&str>,
    status: Option<PaymentStatus>,
    permitted: Option<&[String]>,
) -> Result<Vec<sim_payment::Model>, DbErr> {
    if let Some(ids) = permitted {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
    }

    let mut query = SimPayment::find();
    if let Some(station_id) = station_id {
        query = query.filter(SimPaymentColumn::StationId.eq(station_id));
    }
    if let Some(status) = status {
        query = query.filter(SimPaymentColumn::Status.eq(status));
    }
    if let Some(ids) = permitted {
        query = query.filter(SimPaymentColumn::StationId.is_in(ids.iter().cloned()));
    }
    query
        .order_by(SimPaymentColumn::DueDate, Order::Asc)
        .all(db)
        .await
}

pub async fn get_sim_payment(
    db: &DatabaseConnection,
    payment_id: &str,
) -> Result<Option<sim_payment::Model>, DbErr> {
    SimPayment::find_by_id(payment_id).one(db).await
}
