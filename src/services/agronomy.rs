//! Derived agronomic metrics.

/// Vapor pressure deficit in kPa, from air temperature (°C) and relative
/// humidity (%). Saturation vapor pressure via the Tetens approximation:
/// `es = 0.6108 * e^(17.27*T / (T + 237.3))`. Rounded to two decimals, the
/// precision stored and charted.
pub fn vpd(temperature: f64, humidity: f64) -> f64 {
    let saturation_vapor_pressure = 0.6108 * ((17.27 * temperature) / (temperature + 237.3)).exp();
    let vpd = (1.0 - humidity / 100.0) * saturation_vapor_pressure;
    (vpd * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::vpd;

    #[test]
    fn documented_reference_value() {
        assert_eq!(vpd(25.0, 60.0), 1.27);
    }

    #[test]
    fn saturated_air_has_zero_deficit() {
        assert_eq!(vpd(25.0, 100.0), 0.0);
        assert_eq!(vpd(35.0, 100.0), 0.0);
    }

    #[test]
    fn deficit_grows_with_temperature() {
        assert!(vpd(35.0, 60.0) > vpd(25.0, 60.0));
    }

    #[test]
    fn deficit_shrinks_with_humidity() {
        assert!(vpd(25.0, 80.0) < vpd(25.0, 60.0));
    }
}
