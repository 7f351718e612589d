use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryFilter,
    QueryOrder,
};

use crate::db::entities::plot_activity;
use crate::db::entities::prelude::*;

/// Activities newest-date-first, optionally narrowed to one station and to a
/// permitted station set (`None` = unscoped, i.e. admin).
pub async fn list_activities(
    db: &DatabaseConnection,
    station_id: Option<&str>,
    permitted: Option<&[String]>,
) -> Result<Vec<plot_activity::Model>, DbErr> {
    if let Some(ids) = permitted {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
    }

    let mut query = PlotActivity::find();
    if let Some(station_id) = station_id {
        query = query.filter(PlotActivityColumn::StationId.eq(station_id));
    }
    if let Some(ids) = permitted {
        query = query.filter(PlotActivityColumn::StationId.is_in(ids.iter().cloned()));
    }
    query
        .order_by(PlotActivityColumn::Date, Order::Desc)
        .order_by(PlotActivityColumn::CreatedAt, Order::Desc)
        .all(db)
        .await
}

pub async fn get_activity(
    db: &DatabaseConnection,
    activity_id: &str,
) -> Result<Option<plot_activity::Model>, DbErr> {
    PlotActivity::find_by_id(activity_id).one(db).await
}

pub async fn insert_activity(
    db: &DatabaseConnection,
    activity: plot_activity::ActiveModel,
) -> Result<plot_activity::Model, DbErr> {
    activity.insert(db).await
}

pub async fn delete_activity(db: &DatabaseConnection, activity_id: &str) -> Result<u64, DbErr> {
    let res = PlotActivity::delete_by_id(activity_id).exec(db).await?;
    Ok(res.rows_affected)
}
