use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::db::entities::prelude::*;
use crate::db::entities::sensor_reading;
use crate::db::services::station_service;

/// Readings for a station since `start`, ascending by timestamp. The newest
/// `limit` rows win when the window holds more than `limit` samples.
pub async fn list_readings_since(
    db: &DatabaseConnection,
    station_id: &str,
    start: DateTime<Utc>,
    limit: u64,
) -> Result<Vec<sensor_reading::Model>, DbErr> {
    let mut readings = SensorReading::find()
        .filter(SensorReadingColumn::StationId.eq(station_id))
        .filter(SensorReadingColumn::Timestamp.gte(start))
        .order_by(SensorReadingColumn::Timestamp, Order::Desc)
        .limit(limit)
        .all(db)
        .await?;
    readings.reverse();
    Ok(readings)
}

pub async fn latest_reading(
    db: &DatabaseConnection,
    station_id: &str,
) -> Result<Option<sensor_reading::Model>, DbErr> {
    SensorReading::find()
        .filter(SensorReadingColumn::StationId.eq(station_id))
        .order_by(SensorReadingColumn::Timestamp, Order::Desc)
        .one(db)
        .await
}

/// Inserts a reading and stamps the station's `last_data_time`.
pub async fn insert_reading(
    db: &DatabaseConnection,
    reading: sensor_reading::ActiveModel,
) -> Result<sensor_reading::Model, DbErr> {
    let model = reading.insert(db).await?;
    station_service::touch_last_data_time(db, &model.station_id, model.timestamp).await?;
    Ok(model)
}
