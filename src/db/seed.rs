//! Startup seeding: a bootstrap admin account, plus optional demo fixtures
//! (`--seed-demo`) mirroring a small two-field deployment.

use bcrypt::{DEFAULT_COST, hash};
use chrono::{Duration, Utc};
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use serde_json::json;
use tracing::info;

use crate::config::ServerConfig;
use crate::db::entities::prelude::*;
use crate::db::entities::{
    plot_activity, sensor_reading, sim_card, sim_payment, station, station_image, user,
    weather_forecast,
};
use crate::db::enums::{PaymentStatus, SimStatus, StationStatus, StationType, UserRole};
use crate::db::new_id;
use crate::services::agronomy;

/// Creates the configured admin account if no user with that name exists.
pub async fn ensure_admin_user(db: &DatabaseConnection, config: &ServerConfig) -> Result<(), DbErr> {
    let existing = User::find()
        .filter(UserColumn::Username.eq(&config.admin_username))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let password_hash = hash(&config.admin_password, DEFAULT_COST)
        .map_err(|e| DbErr::Custom(format!("failed to hash admin password: {e}")))?;

    user::ActiveModel {
        id: Set(new_id("user")),
        username: Set(config.admin_username.clone()),
        password_hash: Set(password_hash),
        role: Set(UserRole::Admin),
        full_name: Set("Administrator".to_string()),
        email: Set(format!("{}@wimarc.local", config.admin_username)),
        is_enabled: Set(true),
        permitted_station_ids: Set(json!([])),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;

    info!(username = %config.admin_username, "bootstrap admin account created");
    Ok(())
}

/// Loads demo stations, users, SIM records, forecasts, activities, and a week
/// of generated readings. Skipped when any station already exists.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    if Station::find().count(db).await? > 0 {
        info!("stations already present, skipping demo seed");
        return Ok(());
    }

    let now = Utc::now();

    let stations = vec![
        demo_station(
            "weather-1",
            "Weather Station 1 - North Field",
            StationType::Weather,
            13.7563,
            100.5018,
            "North Field, Agricultural Area A",
            StationStatus::Online,
            Some("sim-1"),
            now - Duration::minutes(5),
        ),
        demo_station(
            "weather-2",
            "Weather Station 2 - South Field",
            StationType::Weather,
            13.7463,
            100.5118,
            "South Field, Agricultural Area B",
            StationStatus::Online,
            Some("sim-2"),
            now - Duration::minutes(10),
        ),
        demo_station(
            "soil-1",
            "Soil Station 1 - East Plot",
            StationType::Soil,
            13.7663,
            100.4918,
            "East Plot, Agricultural Area A",
            StationStatus::Online,
            Some("sim-3"),
            now - Duration::minutes(7),
        ),
        demo_station(
            "soil-2",
            "Soil Station 2 - West Plot",
            StationType::Soil,
            13.7363,
            100.5218,
            "West Plot, Agricultural Area B",
            StationStatus::Offline,
            Some("sim-4"),
            now - Duration::hours(2),
        ),
    ];
    Station::insert_many(stations).exec(db).await?;

    let farmer_id = new_id("user");
    let visitor_id = new_id("user");
    let users = vec![
        demo_user(
            &farmer_id,
            "user1",
            UserRole::User,
            "John Farmer",
            "user1@example.com",
            json!(["weather-1", "soil-1"]),
        )?,
        demo_user(
            &visitor_id,
            "guest1",
            UserRole::Guest,
            "Field Visitor",
            "guest1@example.com",
            json!(["weather-1"]),
        )?,
    ];
    User::insert_many(users).exec(db).await?;

    let sims = vec![
        demo_sim("sim-1", "0812345678", "AIS", Some("weather-1"), SimStatus::Active, now),
        demo_sim("sim-2", "0823456789", "DTAC", Some("weather-2"), SimStatus::Active, now),
        demo_sim("sim-3", "0834567890", "TrueMove", Some("soil-1"), SimStatus::Active, now),
        demo_sim(
            "sim-4",
            "0845678901",
            "AIS",
            Some("soil-2"),
            SimStatus::Inactive,
            now - Duration::hours(2),
        ),
    ];
    SimCard::insert_many(sims).exec(db).await?;

    let today = now.date_naive();
    let payments = vec![
        sim_payment::ActiveModel {
            id: Set(new_id("payment")),
            station_id: Set("weather-1".to_string()),
            station_name: Set(Some("Weather Station 1 - North Field".to_string())),
            sim_number: Set("0812345678".to_string()),
            provider: Set("AIS".to_string()),
            amount: Set(199.0),
            due_date: Set(today + Duration::days(14)),
            status: Set(PaymentStatus::Pending),
            paid_date: Set(None),
            notes: Set(None),
        },
        sim_payment::ActiveModel {
            id: Set(new_id("payment")),
            station_id: Set("soil-1".to_string()),
            station_name: Set(Some("Soil Station 1 - East Plot".to_string())),
            sim_number: Set("0834567890".to_string()),
            provider: Set("TrueMove".to_string()),
            amount: Set(149.0),
            due_date: Set(today - Duration::days(3)),
            status: Set(PaymentStatus::Pending),
            paid_date: Set(None),
            notes: Set(Some("carried over from last cycle".to_string())),
        },
        sim_payment::ActiveModel {
            id: Set(new_id("payment")),
            station_id: Set("weather-2".to_string()),
            station_name: Set(Some("Weather Station 2 - South Field".to_string())),
            sim_number: Set("0823456789".to_string()),
            provider: Set("DTAC".to_string()),
            amount: Set(199.0),
            due_date: Set(today - Duration::days(30)),
            status: Set(PaymentStatus::Paid),
            paid_date: Set(Some(today - Duration::days(31))),
            notes: Set(None),
        },
    ];
    SimPayment::insert_many(payments).exec(db).await?;

    let mut forecasts = Vec::new();
    for station_id in ["weather-1", "weather-2"] {
        for day in 1..=5 {
            forecasts.push(weather_forecast::ActiveModel {
                id: Set(new_id("forecast")),
                station_id: Set(station_id.to_string()),
                forecast_date: Set(today + Duration::days(day)),
                temperature: Set(28.0 + day as f64),
                rain_probability: Set(20.0 * day as f64 % 80.0),
                rainfall: Set(if day % 2 == 0 { 4.0 } else { 0.0 }),
                description: Set(if day % 2 == 0 {
                    "Scattered showers".to_string()
                } else {
                    "Partly cloudy".to_string()
                }),
            });
        }
    }
    WeatherForecast::insert_many(forecasts).exec(db).await?;

    let images = vec![
        station_image::ActiveModel {
            id: Set(new_id("image")),
            station_id: Set("weather-1".to_string()),
            image_url: Set("/uploads/weather-1/latest.jpg".to_string()),
            timestamp: Set(now - Duration::minutes(5)),
        },
        station_image::ActiveModel {
            id: Set(new_id("image")),
            station_id: Set("soil-1".to_string()),
            image_url: Set("/uploads/soil-1/latest.jpg".to_string()),
            timestamp: Set(now - Duration::minutes(7)),
        },
    ];
    StationImage::insert_many(images).exec(db).await?;

    let activities = vec![
        plot_activity::ActiveModel {
            id: Set(new_id("activity")),
            station_id: Set("weather-1".to_string()),
            date: Set(today - Duration::days(2)),
            activity_type: Set("Fertilizing".to_string()),
            description: Set("Applied 15-15-15 around the north rows".to_string()),
            created_by: Set(farmer_id.clone()),
            created_by_name: Set("John Farmer".to_string()),
            images: Set(json!(["/uploads/activities/fertilizing-1.jpg"])),
            created_at: Set(now - Duration::days(2)),
        },
        plot_activity::ActiveModel {
            id: Set(new_id("activity")),
            station_id: Set("soil-1".to_string()),
            date: Set(today - Duration::days(1)),
            activity_type: Set("Irrigation".to_string()),
            description: Set("Drip line flushed and run for 40 minutes".to_string()),
            created_by: Set(farmer_id),
            created_by_name: Set("John Farmer".to_string()),
            images: Set(json!([])),
            created_at: Set(now - Duration::days(1)),
        },
    ];
    PlotActivity::insert_many(activities).exec(db).await?;

    for station_id in ["weather-1", "weather-2"] {
        let readings = generate_weather_readings(station_id, 7);
        SensorReading::insert_many(readings).exec(db).await?;
    }
    for station_id in ["soil-1", "soil-2"] {
        let readings = generate_soil_readings(station_id, 7);
        SensorReading::insert_many(readings).exec(db).await?;
    }

    info!("demo fixtures seeded");
    Ok(())
}

fn demo_station(
    id: &str,
    name: &str,
    station_type: StationType,
    latitude: f64,
    longitude: f64,
    address: &str,
    status: StationStatus,
    sim_card_id: Option<&str>,
    last_data_time: chrono::DateTime<Utc>,
) -> station::ActiveModel {
    station::ActiveModel {
        id: Set(id.to_string()),
        name: Set(name.to_string()),
        station_type: Set(station_type),
        latitude: Set(latitude),
        longitude: Set(longitude),
        address: Set(address.to_string()),
        status: Set(status),
        last_data_time: Set(Some(last_data_time)),
        sim_card_id: Set(sim_card_id.map(str::to_string)),
        image_url: Set(Some(format!("/uploads/{id}/latest.jpg"))),
        description: Set(format!("{name} demo installation")),
    }
}

fn demo_user(
    id: &str,
    username: &str,
    role: UserRole,
    full_name: &str,
    email: &str,
    permitted: serde_json::Value,
) -> Result<user::ActiveModel, DbErr> {
    // Demo accounts log in with their username as the password.
    let password_hash = hash(username, DEFAULT_COST)
        .map_err(|e| DbErr::Custom(format!("failed to hash demo password: {e}")))?;
    Ok(user::ActiveModel {
        id: Set(id.to_string()),
        username: Set(username.to_string()),
        password_hash: Set(password_hash),
        role: Set(role),
        full_name: Set(full_name.to_string()),
        email: Set(email.to_string()),
        is_enabled: Set(true),
        permitted_station_ids: Set(permitted),
        created_at: Set(Utc::now()),
    })
}

fn demo_sim(
    id: &str,
    sim_number: &str,
    provider: &str,
    associated_station: Option<&str>,
    status: SimStatus,
    last_communication: chrono::DateTime<Utc>,
) -> sim_card::ActiveModel {
    sim_card::ActiveModel {
        id: Set(id.to_string()),
        sim_number: Set(sim_number.to_string()),
        provider: Set(provider.to_string()),
        associated_station: Set(associated_station.map(str::to_string)),
        status: Set(status),
        last_communication: Set(Some(last_communication)),
    }
}

/// Hourly weather samples over `days`, on a diurnal sine curve with jitter.
fn generate_weather_readings(station_id: &str, days: i64) -> Vec<sensor_reading::ActiveModel> {
    let mut rng = rand::rng();
    let now = Utc::now();
    let mut readings = Vec::with_capacity((days * 24) as usize);

    for hour in 0..days * 24 {
        let timestamp = now - Duration::hours(hour);
        let phase = (hour as f64 / 12.0) * std::f64::consts::PI;
        let temp = 25.0 + phase.sin() * 5.0 + rng.random_range(-1.0..1.0);
        let humidity = 60.0 + phase.sin() * 15.0 + rng.random_range(-2.5..2.5);

        readings.push(sensor_reading::ActiveModel {
            id: Set(new_id("reading")),
            station_id: Set(station_id.to_string()),
            timestamp: Set(timestamp),
            air_temperature: Set(Some((temp * 10.0).round() / 10.0)),
            relative_humidity: Set(Some((humidity * 10.0).round() / 10.0)),
            light_intensity: Set(Some(
                (50000.0 + phase.sin() * 40000.0 + rng.random_range(-2500.0..2500.0)).max(0.0),
            )),
            wind_direction: Set(Some(rng.random_range(0.0f64..360.0).floor())),
            wind_speed: Set(Some(rng.random_range(0.0..10.0))),
            rainfall: Set(Some(if rng.random::<f64>() > 0.9 {
                rng.random_range(0.0..5.0)
            } else {
                0.0
            })),
            atmospheric_pressure: Set(Some(1013.0 + rng.random_range(-5.0..5.0))),
            vpd: Set(Some(agronomy::vpd(temp, humidity))),
            soil_moisture1: Set(None),
            soil_moisture2: Set(None),
        });
    }

    readings
}

/// Hourly soil-moisture samples over `days`.
fn generate_soil_readings(station_id: &str, days: i64) -> Vec<sensor_reading::ActiveModel> {
    let mut rng = rand::rng();
    let now = Utc::now();
    let mut readings = Vec::with_capacity((days * 24) as usize);

    for hour in 0..days * 24 {
        let timestamp = now - Duration::hours(hour);
        let phase = (hour as f64 / 24.0) * std::f64::consts::PI;

        readings.push(sensor_reading::ActiveModel {
            id: Set(new_id("reading")),
            station_id: Set(station_id.to_string()),
            timestamp: Set(timestamp),
            air_temperature: Set(None),
            relative_humidity: Set(None),
            light_intensity: Set(None),
            wind_direction: Set(None),
            wind_speed: Set(None),
            rainfall: Set(None),
            atmospheric_pressure: Set(None),
            vpd: Set(None),
            soil_moisture1: Set(Some(
                ((50.0 + phase.sin() * 20.0 + rng.random_range(-2.5..2.5)) * 10.0).round() / 10.0,
            )),
            soil_moisture2: Set(Some(
                ((55.0 + phase.sin() * 15.0 + rng.random_range(-2.5..2.5)) * 10.0).round() / 10.0,
            )),
        });
    }

    readings
}
