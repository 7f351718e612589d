use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryFilter, QueryOrder,
};

use crate::db::entities::prelude::*;
use crate::db::entities::weather_forecast;

pub async fn list_forecasts_for_station(
    db: &DatabaseConnection,
    station_id: &str,
) -> Result<Vec<weather_forecast::Model>, DbErr> {
    WeatherForecast::find()
        .filter(WeatherForecastColumn::StationId.eq(station_id))
        .order_by(WeatherForecastColumn::ForecastDate, Order::Asc)
        .all(db)
        .await
}
