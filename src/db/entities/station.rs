use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::{StationStatus, StationType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub station_type: StationType,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub status: StationStatus,
    pub last_data_time: Option<ChronoDateTimeUtc>,
    pub sim_card_id: Option<String>,
    pub image_url: Option<String>,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sensor_reading::Entity")]
    SensorReadings,

    #[sea_orm(has_many = "super::station_image::Entity")]
    StationImages,

    #[sea_orm(has_many = "super::plot_activity::Entity")]
    PlotActivities,

    #[sea_orm(has_many = "super::sim_payment::Entity")]
    SimPayments,

    #[sea_orm(has_many = "super::weather_forecast::Entity")]
    WeatherForecasts,
}

impl Related<super::sensor_reading::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SensorReadings.def()
    }
}

impl Related<super::station_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StationImages.def()
    }
}

impl Related<super::plot_activity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlotActivities.def()
    }
}

impl Related<super::sim_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SimPayments.def()
    }
}

impl Related<super::weather_forecast::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WeatherForecasts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
