//! Schema definitions, applied idempotently at startup.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::info;

pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL,
    full_name TEXT NOT NULL,
    email TEXT NOT NULL,
    is_enabled BOOLEAN NOT NULL DEFAULT TRUE,
    permitted_station_ids JSONB NOT NULL DEFAULT '[]'::jsonb,
    created_at TIMESTAMPTZ NOT NULL
)
"#;

pub const CREATE_STATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS stations (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    station_type TEXT NOT NULL,
    latitude DOUBLE PRECISION NOT NULL,
    longitude DOUBLE PRECISION NOT NULL,
    address TEXT NOT NULL,
    status TEXT NOT NULL,
    last_data_time TIMESTAMPTZ,
    sim_card_id TEXT,
    image_url TEXT,
    description TEXT NOT NULL
)
"#;

pub const CREATE_SENSOR_READINGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sensor_readings (
    id TEXT PRIMARY KEY,
    station_id TEXT NOT NULL REFERENCES stations(id) ON DELETE CASCADE,
    timestamp TIMESTAMPTZ NOT NULL,
    air_temperature DOUBLE PRECISION,
    relative_humidity DOUBLE PRECISION,
    light_intensity DOUBLE PRECISION,
    wind_direction DOUBLE PRECISION,
    wind_speed DOUBLE PRECISION,
    rainfall DOUBLE PRECISION,
    atmospheric_pressure DOUBLE PRECISION,
    vpd DOUBLE PRECISION,
    soil_moisture1 DOUBLE PRECISION,
    soil_moisture2 DOUBLE PRECISION
)
"#;

pub const CREATE_READINGS_STATION_TIME_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_sensor_readings_station_time
    ON sensor_readings(station_id, timestamp DESC)
"#;

pub const CREATE_STATION_IMAGES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS station_images (
    id TEXT PRIMARY KEY,
    station_id TEXT NOT NULL REFERENCES stations(id) ON DELETE CASCADE,
    image_url TEXT NOT NULL,
    timestamp TIMESTAMPTZ NOT NULL
)
"#;

pub const CREATE_PLOT_ACTIVITIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS plot_activities (
    id TEXT PRIMARY KEY,
    station_id TEXT NOT NULL REFERENCES stations(id) ON DELETE CASCADE,
    date DATE NOT NULL,
    activity_type TEXT NOT NULL,
    description TEXT NOT NULL,
    created_by TEXT NOT NULL REFERENCES users(id),
    created_by_name TEXT NOT NULL,
    images JSONB NOT NULL DEFAULT '[]'::jsonb,
    created_at TIMESTAMPTZ NOT NULL
)
"#;

pub const CREATE_ACTIVITIES_STATION_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_plot_activities_station
    ON plot_activities(station_id, date DESC)
"#;

pub const CREATE_SIM_CARDS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sim_cards (
    id TEXT PRIMARY KEY,
    sim_number TEXT NOT NULL,
    provider TEXT NOT NULL,
    associated_station TEXT REFERENCES stations(id) ON DELETE SET NULL,
    status TEXT NOT NULL,
    last_communication TIMESTAMPTZ
)
"#;

pub const CREATE_SIM_PAYMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sim_payments (
    id TEXT PRIMARY KEY,
    station_id TEXT NOT NULL REFERENCES stations(id) ON DELETE CASCADE,
    station_name TEXT,
    sim_number TEXT NOT NULL,
    provider TEXT NOT NULL,
    amount DOUBLE PRECISION NOT NULL,
    due_date DATE NOT NULL,
    status TEXT NOT NULL,
    paid_date DATE,
    notes TEXT
)
"#;

pub const CREATE_WEATHER_FORECASTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS weather_forecasts (
    id TEXT PRIMARY KEY,
    station_id TEXT NOT NULL REFERENCES stations(id) ON DELETE CASCADE,
    forecast_date DATE NOT NULL,
    temperature DOUBLE PRECISION NOT NULL,
    rain_probability DOUBLE PRECISION NOT NULL,
    rainfall DOUBLE PRECISION NOT NULL,
    description TEXT NOT NULL
)
"#;

/// All schema statements, in dependency order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_USERS_TABLE,
    CREATE_STATIONS_TABLE,
    CREATE_SENSOR_READINGS_TABLE,
    CREATE_READINGS_STATION_TIME_INDEX,
    CREATE_STATION_IMAGES_TABLE,
    CREATE_PLOT_ACTIVITIES_TABLE,
    CREATE_ACTIVITIES_STATION_INDEX,
    CREATE_SIM_CARDS_TABLE,
    CREATE_SIM_PAYMENTS_TABLE,
    CREATE_WEATHER_FORECASTS_TABLE,
];

pub async fn init_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    for statement in SCHEMA_STATEMENTS {
        db.execute_unprepared(statement).await?;
    }
    info!("database schema initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_are_idempotent() {
        for statement in SCHEMA_STATEMENTS {
            assert!(
                statement.contains("IF NOT EXISTS"),
                "statement must be re-runnable: {statement}"
            );
        }
    }

    #[test]
    fn tables_precede_their_indexes() {
        let readings = SCHEMA_STATEMENTS
            .iter()
            .position(|s| s.contains("CREATE TABLE IF NOT EXISTS sensor_readings"))
            .unwrap();
        let index = SCHEMA_STATEMENTS
            .iter()
            .position(|s| s.contains("idx_sensor_readings_station_time"))
            .unwrap();
        assert!(readings < index);
    }
}
