use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryFilter,
    QueryOrder, Set,
};

use crate::db::entities::prelude::*;
use crate::db::entities::{station, station_image};

pub async fn list_stations(db: &DatabaseConnection) -> Result<Vec<station::Model>, DbErr> {
    Station::find()
        .order_by(StationColumn::Id, Order::Asc)
        .all(db)
        .await
}

/// Stations restricted to an explicit id set; used for non-admin scoping.
pub async fn list_stations_by_ids(
    db: &DatabaseConnection,
    ids: &[String],
) -> Result<Vec<station::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Station::find()
        .filter(StationColumn::Id.is_in(ids.iter().cloned()))
        .order_by(StationColumn::Id, Order::Asc)
        .all(db)
        .await
}

pub async fn get_station(
    db: &DatabaseConnection,
    station_id: &str,
) -> Result<Option<station::Model>, DbErr> {
    Station::find_by_id(station_id).one(db).await
}

pub async fn delete_station(db: &DatabaseConnection, station_id: &str) -> Result<u64, DbErr> {
    let res = Station::delete_by_id(station_id).exec(db).await?;
    Ok(res.rows_affected)
}

/// Stamps the station's `last_data_time`; called on every reading insert.
pub async fn touch_last_data_time(
    db: &DatabaseConnection,
    station_id: &str,
    at: DateTime<Utc>,
) -> Result<(), DbErr> {
    let Some(model) = Station::find_by_id(station_id).one(db).await? else {
        return Ok(());
    };
    let mut active: station::ActiveModel = model.into();
    active.last_data_time = Set(Some(at));
    active.update(db).await?;
    Ok(())
}

pub async fn list_station_images(
    db: &DatabaseConnection,
    station_id: &str,
) -> Result<Vec<station_image::Model>, DbErr> {
    StationImage::find()
        .filter(StationImageColumn::StationId.eq(station_id))
        .order_by(StationImageColumn::Timestamp, Order::Desc)
        .all(db)
        .await
}
