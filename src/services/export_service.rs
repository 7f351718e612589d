//! CSV report assembly for the download endpoints.
//!
//! Output contract: header row then data rows joined with `\n`; fields with
//! commas, quotes, or newlines are double-quoted with embedded quotes
//! doubled; absent values serialize as the empty string; empty input yields
//! an empty document. Responses prepend [`UTF8_BOM`] so spreadsheet tools
//! detect the encoding.

use chrono::{DateTime, Utc};
use std::str::FromStr;

use crate::db::entities::{plot_activity, sensor_reading};
use crate::services::aggregate::DailyAggregate;

/// Byte-order mark prefixed to every CSV response body.
pub const UTF8_BOM: &str = "\u{feff}";

/// A selectable sensor column, named in queries by its camelCase API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorField {
    AirTemperature,
    RelativeHumidity,
    LightIntensity,
    WindDirection,
    WindSpeed,
    Rainfall,
    AtmosphericPressure,
    Vpd,
    SoilMoisture1,
    SoilMoisture2,
}

impl SensorField {
    pub const ALL: [SensorField; 10] = [
        SensorField::AirTemperature,
        SensorField::RelativeHumidity,
        SensorField::LightIntensity,
        SensorField::WindDirection,
        SensorField::WindSpeed,
        SensorField::Rainfall,
        SensorField::AtmosphericPressure,
        SensorField::Vpd,
        SensorField::SoilMoisture1,
        SensorField::SoilMoisture2,
    ];

    pub fn header(self) -> &'static str {
        match self {
            SensorField::AirTemperature => "Air Temperature (°C)",
            SensorField::RelativeHumidity => "Relative Humidity (%)",
            SensorField::LightIntensity => "Light Intensity (lux)",
            SensorField::WindDirection => "Wind Direction (°)",
            SensorField::WindSpeed => "Wind Speed (m/s)",
            SensorField::Rainfall => "Rainfall (mm)",
            SensorField::AtmosphericPressure => "Atmospheric Pressure (hPa)",
            SensorField::Vpd => "VPD (kPa)",
            SensorField::SoilMoisture1 => "Soil Moisture 1 (%)",
            SensorField::SoilMoisture2 => "Soil Moisture 2 (%)",
        }
    }

    fn extract(self, reading: &sensor_reading::Model) -> Option<f64> {
        match self {
            SensorField::AirTemperature => reading.air_temperature,
            SensorField::RelativeHumidity => reading.relative_humidity,
            SensorField::LightIntensity => reading.light_intensity,
            SensorField::WindDirection => reading.wind_direction,
            SensorField::WindSpeed => reading.wind_speed,
            SensorField::Rainfall => reading.rainfall,
            SensorField::AtmosphericPressure => reading.atmospheric_pressure,
            SensorField::Vpd => reading.vpd,
            SensorField::SoilMoisture1 => reading.soil_moisture1,
            SensorField::SoilMoisture2 => reading.soil_moisture2,
        }
    }
}

impl FromStr for SensorField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "airTemperature" => Ok(SensorField::AirTemperature),
            "relativeHumidity" => Ok(SensorField::RelativeHumidity),
            "lightIntensity" => Ok(SensorField::LightIntensity),
            "windDirection" => Ok(SensorField::WindDirection),
            "windSpeed" => Ok(SensorField::WindSpeed),
            "rainfall" => Ok(SensorField::Rainfall),
            "atmosphericPressure" => Ok(SensorField::AtmosphericPressure),
            "vpd" => Ok(SensorField::Vpd),
            "soilMoisture1" => Ok(SensorField::SoilMoisture1),
            "soilMoisture2" => Ok(SensorField::SoilMoisture2),
            other => Err(format!("unknown sensor field: {other}")),
        }
    }
}

/// Parses a comma-separated sensor list; `None`/empty selects every column.
pub fn parse_sensor_list(raw: Option<&str>) -> Result<Vec<SensorField>, String> {
    match raw {
        None | Some("") => Ok(SensorField::ALL.to_vec()),
        Some(list) => list
            .split(',')
            .map(|item| item.trim().parse())
            .collect(),
    }
}

fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Joins a header and rows into a CSV document. Empty rows produce an empty
/// string, header included.
pub fn to_csv(header: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        header
            .iter()
            .map(|h| escape(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        lines.push(
            row.iter()
                .map(|field| escape(field))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

/// Time-series export: one row per reading, timestamp plus the selected
/// sensor columns.
pub fn readings_csv(readings: &[sensor_reading::Model], sensors: &[SensorField]) -> String {
    let mut header = vec!["Timestamp"];
    header.extend(sensors.iter().map(|s| s.header()));

    let rows: Vec<Vec<String>> = readings
        .iter()
        .map(|reading| {
            let mut row = vec![reading.timestamp.to_rfc3339()];
            row.extend(sensors.iter().map(|s| number(s.extract(reading))));
            row
        })
        .collect();

    to_csv(&header, &rows)
}

const DAILY_HEADER: [&str; 16] = [
    "Date",
    "Avg Temperature (°C)",
    "Min Temperature (°C)",
    "Max Temperature (°C)",
    "Avg Humidity (%)",
    "Min Humidity (%)",
    "Max Humidity (%)",
    "Avg Light Intensity (lux)",
    "Avg Wind Speed (m/s)",
    "Avg Pressure (hPa)",
    "Min Pressure (hPa)",
    "Max Pressure (hPa)",
    "Total Rainfall (mm)",
    "Avg VPD (kPa)",
    "Avg Soil Moisture 1 (%)",
    "Avg Soil Moisture 2 (%)",
];

/// Daily-aggregate export: one row per day, every aggregate column.
pub fn daily_csv(aggregates: &[DailyAggregate]) -> String {
    let rows: Vec<Vec<String>> = aggregates
        .iter()
        .map(|agg| {
            vec![
                agg.date.to_string(),
                number(agg.avg_temperature),
                number(agg.min_temperature),
                number(agg.max_temperature),
                number(agg.avg_humidity),
                number(agg.min_humidity),
                number(agg.max_humidity),
                number(agg.avg_light_intensity),
                number(agg.avg_wind_speed),
                number(agg.avg_pressure),
                number(agg.min_pressure),
                number(agg.max_pressure),
                number(agg.total_rainfall),
                number(agg.avg_vpd),
                number(agg.avg_soil_moisture1),
                number(agg.avg_soil_moisture2),
            ]
        })
        .collect();

    to_csv(&DAILY_HEADER, &rows)
}

const ACTIVITIES_HEADER: [&str; 6] = [
    "Date",
    "Activity Type",
    "Description",
    "Recorded By",
    "Recorded At",
    "Image Count",
];

/// Plot-activity export.
pub fn activities_csv(activities: &[plot_activity::Model]) -> String {
    let rows: Vec<Vec<String>> = activities
        .iter()
        .map(|activity| {
            vec![
                activity.date.to_string(),
                activity.activity_type.clone(),
                activity.description.clone(),
                activity.created_by_name.clone(),
                activity.created_at.to_rfc3339(),
                activity.image_urls().len().to_string(),
            ]
        })
        .collect();

    to_csv(&ACTIVITIES_HEADER, &rows)
}

/// `{station}_{kind}_{days}d_{date}.csv`, spaces collapsed to underscores.
pub fn export_filename(station_name: &str, kind: &str, days: u32, today: DateTime<Utc>) -> String {
    let safe_name = station_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("{safe_name}_{kind}_{days}d_{}.csv", today.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use serde_json::json;

    fn reading(ts: &str, temperature: Option<f64>, vpd: Option<f64>) -> sensor_reading::Model {
        sensor_reading::Model {
            id: "reading-1".to_string(),
            station_id: "weather-1".to_string(),
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
                .unwrap()
                .and_utc(),
            air_temperature: temperature,
            relative_humidity: None,
            light_intensity: None,
            wind_direction: None,
            wind_speed: None,
            rainfall: None,
            atmospheric_pressure: None,
            vpd,
            soil_moisture1: None,
            soil_moisture2: None,
        }
    }

    #[test]
    fn empty_input_is_empty_document() {
        assert_eq!(to_csv(&["a", "b"], &[]), "");
        assert_eq!(readings_csv(&[], &SensorField::ALL), "");
        assert_eq!(daily_csv(&[]), "");
        assert_eq!(activities_csv(&[]), "");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let rows = vec![vec!["say \"hi\"".to_string(), "plain".to_string()]];
        let csv = to_csv(&["a", "b"], &rows);
        assert_eq!(csv, "a,b\n\"say \"\"hi\"\"\",plain");
    }

    #[test]
    fn commas_and_newlines_force_quoting() {
        let rows = vec![vec!["one,two".to_string(), "line\nbreak".to_string()]];
        let csv = to_csv(&["a", "b"], &rows);
        assert_eq!(csv, "a,b\n\"one,two\",\"line\nbreak\"");
    }

    #[test]
    fn readings_csv_emits_selected_columns_only() {
        let readings = vec![reading("2026-08-01 09:00:00", Some(24.5), Some(1.27))];
        let sensors = vec![SensorField::AirTemperature, SensorField::Vpd];
        let csv = readings_csv(&readings, &sensors);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Timestamp,Air Temperature (°C),VPD (kPa)"
        );
        assert_eq!(lines.next().unwrap(), "2026-08-01T09:00:00+00:00,24.5,1.27");
    }

    #[test]
    fn missing_values_serialize_as_empty_fields() {
        let readings = vec![reading("2026-08-01 09:00:00", None, Some(1.1))];
        let sensors = vec![SensorField::AirTemperature, SensorField::Vpd];
        let csv = readings_csv(&readings, &sensors);
        assert!(csv.ends_with("2026-08-01T09:00:00+00:00,,1.1"));
    }

    #[test]
    fn sensor_list_parsing() {
        assert_eq!(parse_sensor_list(None).unwrap(), SensorField::ALL.to_vec());
        assert_eq!(
            parse_sensor_list(Some("airTemperature, vpd")).unwrap(),
            vec![SensorField::AirTemperature, SensorField::Vpd]
        );
        assert!(parse_sensor_list(Some("bogus")).is_err());
    }

    #[test]
    fn activity_rows_carry_image_counts() {
        let activity = plot_activity::Model {
            id: "activity-1".to_string(),
            station_id: "weather-1".to_string(),
            date: "2026-08-01".parse().unwrap(),
            activity_type: "Fertilizing".to_string(),
            description: "applied 15-15-15, north rows".to_string(),
            created_by: "user-1".to_string(),
            created_by_name: "John Farmer".to_string(),
            images: json!(["/a.jpg", "/b.jpg"]),
            created_at: NaiveDateTime::parse_from_str("2026-08-01 10:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap()
                .and_utc(),
        };
        let csv = activities_csv(&[activity]);
        let data_line = csv.lines().nth(1).unwrap();
        assert!(data_line.starts_with("2026-08-01,Fertilizing,\"applied 15-15-15, north rows\""));
        assert!(data_line.ends_with(",2"));
    }

    #[test]
    fn filename_shape() {
        let today = NaiveDateTime::parse_from_str("2026-08-06 00:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc();
        assert_eq!(
            export_filename("Weather Station 1 - North Field", "daily", 7, today),
            "Weather_Station_1_-_North_Field_daily_7d_2026-08-06.csv"
        );
    }
}
