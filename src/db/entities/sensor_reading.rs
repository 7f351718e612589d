use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One sample from a station. Weather stations fill the atmospheric channels,
/// soil stations fill the moisture channels; every channel is nullable so a
/// partial sample is still a valid row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sensor_readings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub station_id: String,
    pub timestamp: ChronoDateTimeUtc,
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::station::Entity",
        from = "Column::StationId",
        to = "super::station::Column::Id",
        on_delete = "Cascade"
    )]
    Station,
}

impl Related<super::station::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
