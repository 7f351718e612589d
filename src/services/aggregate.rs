//! Daily aggregation of sensor readings.
//!
//! Readings for a query window are grouped by UTC calendar day; each channel
//! aggregates over the samples that actually carry a value, and a channel
//! with no values that day stays absent from the output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::db::entities::sensor_reading;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub station_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_humidity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_humidity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_humidity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_light_intensity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_wind_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rainfall: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_vpd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_soil_moisture1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_soil_moisture2: Option<f64>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn collect(readings: &[&sensor_reading::Model], field: fn(&sensor_reading::Model) -> Option<f64>) -> Vec<f64> {
    readings.iter().filter_map(|r| field(r)).collect()
}

fn avg(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Groups `readings` by UTC day and computes the per-day aggregates, days
/// ascending. Averages round to one decimal (VPD to two, light intensity to
/// an integer); rainfall is summed.
pub fn aggregate_daily(station_id: &str, readings: &[sensor_reading::Model]) -> Vec<DailyAggregate> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&sensor_reading::Model>> = BTreeMap::new();
    for reading in readings {
        by_day
            .entry(reading.timestamp.date_naive())
            .or_default()
            .push(reading);
    }

    by_day
        .into_iter()
        .map(|(date, day_readings)| {
            let mut agg = DailyAggregate {
                date,
                station_id: station_id.to_string(),
                ..Default::default()
            };

            let temps = collect(&day_readings, |r| r.air_temperature);
            if !temps.is_empty() {
                agg.avg_temperature = Some(round1(avg(&temps)));
                agg.min_temperature = Some(min(&temps));
                agg.max_temperature = Some(max(&temps));
            }

            let humidity = collect(&day_readings, |r| r.relative_humidity);
            if !humidity.is_empty() {
                agg.avg_humidity = Some(round1(avg(&humidity)));
                agg.min_humidity = Some(min(&humidity));
                agg.max_humidity = Some(max(&humidity));
            }

            let light = collect(&day_readings, |r| r.light_intensity);
            if !light.is_empty() {
                agg.avg_light_intensity = Some(avg(&light).round());
            }

            let wind = collect(&day_readings, |r| r.wind_speed);
            if !wind.is_empty() {
                agg.avg_wind_speed = Some(round1(avg(&wind)));
            }

            let pressure = collect(&day_readings, |r| r.atmospheric_pressure);
            if !pressure.is_empty() {
                agg.avg_pressure = Some(round1(avg(&pressure)));
                agg.min_pressure = Some(min(&pressure));
                agg.max_pressure = Some(max(&pressure));
            }

            let rainfall = collect(&day_readings, |r| r.rainfall);
            if !rainfall.is_empty() {
                agg.total_rainfall = Some(round1(rainfall.iter().sum()));
            }

            let vpd = collect(&day_readings, |r| r.vpd);
            if !vpd.is_empty() {
                agg.avg_vpd = Some(round2(avg(&vpd)));
            }

            let soil1 = collect(&day_readings, |r| r.soil_moisture1);
            if !soil1.is_empty() {
                agg.avg_soil_moisture1 = Some(round1(avg(&soil1)));
            }

            let soil2 = collect(&day_readings, |r| r.soil_moisture2);
            if !soil2.is_empty() {
                agg.avg_soil_moisture2 = Some(round1(avg(&soil2)));
            }

            agg
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn reading(
        ts: &str,
        temperature: Option<f64>,
        humidity: Option<f64>,
        rainfall: Option<f64>,
    ) -> sensor_reading::Model {
        sensor_reading::Model {
            id: format!("reading-{ts}"),
            station_id: "weather-1".to_string(),
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
                .unwrap()
                .and_utc(),
            air_temperature: temperature,
            relative_humidity: humidity,
            light_intensity: None,
            wind_direction: None,
            wind_speed: None,
            rainfall,
            atmospheric_pressure: None,
            vpd: None,
            soil_moisture1: None,
            soil_moisture2: None,
        }
    }

    #[test]
    fn empty_input_yields_no_days() {
        assert!(aggregate_daily("weather-1", &[]).is_empty());
    }

    #[test]
    fn groups_by_calendar_day_ascending() {
        let readings = vec![
            reading("2026-08-02 09:00:00", Some(30.0), None, None),
            reading("2026-08-01 09:00:00", Some(20.0), None, None),
            reading("2026-08-01 15:00:00", Some(30.0), None, None),
        ];
        let days = aggregate_daily("weather-1", &readings);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date.to_string(), "2026-08-01");
        assert_eq!(days[0].avg_temperature, Some(25.0));
        assert_eq!(days[0].min_temperature, Some(20.0));
        assert_eq!(days[0].max_temperature, Some(30.0));
        assert_eq!(days[1].date.to_string(), "2026-08-02");
        assert_eq!(days[1].avg_temperature, Some(30.0));
    }

    #[test]
    fn missing_values_are_skipped_not_zeroed() {
        let readings = vec![
            reading("2026-08-01 09:00:00", Some(24.0), None, None),
            reading("2026-08-01 12:00:00", None, Some(55.0), None),
            reading("2026-08-01 15:00:00", Some(26.0), Some(65.0), None),
        ];
        let days = aggregate_daily("weather-1", &readings);
        assert_eq!(days[0].avg_temperature, Some(25.0));
        assert_eq!(days[0].avg_humidity, Some(60.0));
        // No rainfall samples at all: the field stays absent.
        assert_eq!(days[0].total_rainfall, None);
        assert_eq!(days[0].avg_soil_moisture1, None);
    }

    #[test]
    fn rainfall_is_summed_other_channels_averaged() {
        let readings = vec![
            reading("2026-08-01 09:00:00", None, None, Some(1.2)),
            reading("2026-08-01 12:00:00", None, None, Some(0.0)),
            reading("2026-08-01 15:00:00", None, None, Some(3.33)),
        ];
        let days = aggregate_daily("weather-1", &readings);
        assert_eq!(days[0].total_rainfall, Some(4.5));
    }

    #[test]
    fn averages_round_to_one_decimal() {
        let readings = vec![
            reading("2026-08-01 09:00:00", Some(24.01), None, None),
            reading("2026-08-01 12:00:00", Some(24.04), None, None),
        ];
        let days = aggregate_daily("weather-1", &readings);
        assert_eq!(days[0].avg_temperature, Some(24.0));
        // min/max keep the raw sample values.
        assert_eq!(days[0].min_temperature, Some(24.01));
        assert_eq!(days[0].max_temperature, Some(24.04));
    }
}
