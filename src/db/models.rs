//! API-facing DTOs. The frontend consumes camelCase JSON, so entity models
//! are mapped into these shapes at the route boundary instead of serializing
//! table rows directly (password hashes never leave the db layer).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::entities::{
    plot_activity, sensor_reading, sim_card, sim_payment, station, station_image, user,
    weather_forecast,
};
use crate::db::enums::{PaymentStatus, SimStatus, StationStatus, StationType, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub name: String,
    pub is_enabled: bool,
    pub permitted_station_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserDto {
    fn from(model: user::Model) -> Self {
        let permitted = model.permitted_ids();
        UserDto {
            id: model.id,
            username: model.username,
            email: model.email,
            role: model.role,
            name: model.full_name,
            is_enabled: model.is_enabled,
            permitted_station_ids: permitted,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDto {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDto {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub station_type: StationType,
    pub location: LocationDto,
    pub status: StationStatus,
    pub last_data_time: Option<DateTime<Utc>>,
    pub sim_card_id: Option<String>,
    pub image_url: Option<String>,
    pub description: String,
}

impl From<station::Model> for StationDto {
    fn from(model: station::Model) -> Self {
        StationDto {
            id: model.id,
            name: model.name,
            station_type: model.station_type,
            location: LocationDto {
                lat: model.latitude,
                lng: model.longitude,
                address: model.address,
            },
            status: model.status,
            last_data_time: model.last_data_time,
            sim_card_id: model.sim_card_id,
            image_url: model.image_url,
            description: model.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReadingDto {
    pub id: String,
    pub station_id: String,
    pub timestamp: DateTime<Utc>,
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

impl From<sensor_reading::Model> for SensorReadingDto {
    fn from(model: sensor_reading::Model) -> Self {
        SensorReadingDto {
            id: model.id,
            station_id: model.station_id,
            timestamp: model.timestamp,
            air_temperature: model.air_temperature,
            relative_humidity: model.relative_humidity,
            light_intensity: model.light_intensity,
            wind_direction: model.wind_direction,
            wind_speed: model.wind_speed,
            rainfall: model.rainfall,
            atmospheric_pressure: model.atmospheric_pressure,
            vpd: model.vpd,
            soil_moisture1: model.soil_moisture1,
            soil_moisture2: model.soil_moisture2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationImageDto {
    pub id: String,
    pub station_id: String,
    pub image_url: String,
    pub timestamp: DateTime<Utc>,
}

impl From<station_image::Model> for StationImageDto {
    fn from(model: station_image::Model) -> Self {
        StationImageDto {
            id: model.id,
            station_id: model.station_id,
            image_url: model.image_url,
            timestamp: model.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotActivityDto {
    pub id: String,
    pub station_id: String,
    pub date: NaiveDate,
    pub activity_type: String,
    pub description: String,
    pub created_by: String,
    pub created_by_name: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<plot_activity::Model> for PlotActivityDto {
    fn from(model: plot_activity::Model) -> Self {
        let images = model.image_urls();
        PlotActivityDto {
            id: model.id,
            station_id: model.station_id,
            date: model.date,
            activity_type: model.activity_type,
            description: model.description,
            created_by: model.created_by,
            created_by_name: model.created_by_name,
            images,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimCardDto {
    pub id: String,
    pub sim_number: String,
    pub provider: String,
    pub associated_station: Option<String>,
    pub status: SimStatus,
    pub last_communication: Option<DateTime<Utc>>,
}

impl From<sim_card::Model> for SimCardDto {
    fn from(model: sim_card::Model) -> Self {
        SimCardDto {
            id: model.id,
            sim_number: model.sim_number,
            provider: model.provider,
            associated_station: model.associated_station,
            status: model.status,
            last_communication: model.last_communication,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimPaymentDto {
    pub id: String,
    pub station_id: String,
    pub station_name: Option<String>,
    pub sim_number: String,
    pub provider: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: PaymentStatus,
    pub paid_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl From<sim_payment::Model> for SimPaymentDto {
    fn from(model: sim_payment::Model) -> Self {
        SimPaymentDto {
            id: model.id,
            station_id: model.station_id,
            station_name: model.station_name,
            sim_number: model.sim_number,
            provider: model.provider,
            amount: model.amount,
            due_date: model.due_date,
            status: model.status,
            paid_date: model.paid_date,
            notes: model.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherForecastDto {
    pub id: String,
    pub station_id: String,
    pub forecast_date: NaiveDate,
    pub temperature: f64,
    pub rain_probability: f64,
    pub rainfall: f64,
    pub description: String,
}

impl From<weather_forecast::Model> for WeatherForecastDto {
    fn from(model: weather_forecast::Model) -> Self {
        WeatherForecastDto {
            id: model.id,
            station_id: model.station_id,
            forecast_date: model.forecast_date,
            temperature: model.temperature,
            rain_probability: model.rain_probability,
            rainfall: model.rainfall,
            description: model.description,
        }
    }
}

/// One user-to-station grant, as served by `GET /api/permissions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionPair {
    pub user_id: String,
    pub station_id: String,
}
