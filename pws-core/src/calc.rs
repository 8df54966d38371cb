//! Derived meteorological quantities computed from converted readings.
//!
//! Every function propagates absence: a missing input or a non-finite
//! intermediate yields `None`, never a panic or an error.

use crate::units::{round1, round2};

const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

const COMPASS_HU: [&str; 16] = [
    "É", "ÉÉK", "ÉK", "KÉK", "K", "KDK", "DK", "DDK", "D", "DDNy", "DNy", "NyDNy", "Ny", "NyÉNy",
    "ÉNy", "ÉÉNy",
];

fn compass_index(deg: f64) -> usize {
    let normal = deg.rem_euclid(360.0);
    (((normal + 11.25) / 22.5).floor() as usize) % 16
}

/// Wind bearing in degrees to a 16-point compass label.
pub fn deg_to_compass(deg: f64) -> &'static str {
    COMPASS[compass_index(deg)]
}

/// Wind bearing in degrees to the Hungarian 16-point compass label.
pub fn deg_to_compass_hu(deg: f64) -> &'static str {
    COMPASS_HU[compass_index(deg)]
}

/// Cloud base in metres via Espy's approximation.
///
/// A non-positive temperature/dew-point spread means saturation at ground
/// level, reported as `0.0`.
pub fn cloud_base(temp_c: Option<f64>, dew_c: Option<f64>) -> Option<f64> {
    let spread = temp_c? - dew_c?;
    if spread <= 0.0 {
        return Some(0.0);
    }
    round1((spread / 2.5) * 305.0)
}

/// Absolute humidity in g/m³ from temperature and relative humidity.
///
/// Saturation vapor pressure via the Magnus formula.
pub fn absolute_humidity(temp_c: Option<f64>, rel_humidity: Option<f64>) -> Option<f64> {
    let t = temp_c?;
    let rh = rel_humidity?;
    let es = 6.112 * ((17.67 * t) / (t + 243.5)).exp();
    let e = (rh / 100.0) * es;
    round2((e * 100.0 * 2.1674) / (t + 273.15))
}

/// Wind chill index in °C.
///
/// The metric formula is only defined below 10 °C and above 4.8 km/h;
/// outside that range the result is absent, not an error.
pub fn wind_chill(temp_c: Option<f64>, wind_kmh: Option<f64>) -> Option<f64> {
    let t = temp_c?;
    let w = wind_kmh?;
    if t >= 10.0 || w <= 4.8 {
        return None;
    }
    let w16 = w.powf(0.16);
    round1(13.12 + 0.6215 * t - 11.37 * w16 + 0.3965 * t * w16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compass_cardinal_points() {
        assert_eq!(deg_to_compass(0.0), "N");
        assert_eq!(deg_to_compass(90.0), "E");
        assert_eq!(deg_to_compass(180.0), "S");
        assert_eq!(deg_to_compass(270.0), "W");
        assert_eq!(deg_to_compass_hu(0.0), "É");
        assert_eq!(deg_to_compass_hu(90.0), "K");
        assert_eq!(deg_to_compass_hu(225.0), "DNy");
    }

    #[test]
    fn compass_sector_boundaries() {
        assert_eq!(deg_to_compass(11.24), "N");
        assert_eq!(deg_to_compass(11.25), "NNE");
        assert_eq!(deg_to_compass(348.74), "NNW");
        assert_eq!(deg_to_compass(348.75), "N");
    }

    #[test]
    fn compass_is_periodic() {
        for deg in [0.0, 37.0, 90.0, 191.5, 355.0] {
            for k in [-2.0, -1.0, 1.0, 3.0] {
                assert_eq!(deg_to_compass(deg), deg_to_compass(deg + 360.0 * k));
                assert_eq!(deg_to_compass_hu(deg), deg_to_compass_hu(deg + 360.0 * k));
            }
        }
    }

    #[test]
    fn compass_accepts_negative_bearings() {
        assert_eq!(deg_to_compass(-90.0), "W");
        assert_eq!(deg_to_compass(-0.1), "N");
    }

    #[test]
    fn cloud_base_zero_spread() {
        assert_eq!(cloud_base(Some(15.0), Some(15.0)), Some(0.0));
        assert_eq!(cloud_base(Some(10.0), Some(12.0)), Some(0.0));
    }

    #[test]
    fn cloud_base_known_value() {
        assert_eq!(cloud_base(Some(20.0), Some(10.0)), Some(1220.0));
    }

    #[test]
    fn cloud_base_absent_inputs() {
        assert_eq!(cloud_base(None, Some(10.0)), None);
        assert_eq!(cloud_base(Some(20.0), None), None);
    }

    #[test]
    fn absolute_humidity_known_value() {
        let v = absolute_humidity(Some(20.0), Some(60.0)).unwrap();
        assert!((v - 10.37).abs() < 0.02, "got {v}");
    }

    #[test]
    fn absolute_humidity_absent_inputs() {
        assert_eq!(absolute_humidity(None, Some(50.0)), None);
        assert_eq!(absolute_humidity(Some(20.0), None), None);
    }

    #[test]
    fn wind_chill_outside_valid_range() {
        // warm air
        assert_eq!(wind_chill(Some(10.0), Some(20.0)), None);
        assert_eq!(wind_chill(Some(20.0), Some(8.0)), None);
        // calm wind
        assert_eq!(wind_chill(Some(-5.0), Some(4.8)), None);
        assert_eq!(wind_chill(Some(-5.0), Some(0.0)), None);
    }

    #[test]
    fn wind_chill_known_value() {
        assert_eq!(wind_chill(Some(-10.0), Some(30.0)), Some(-19.5));
    }

    #[test]
    fn wind_chill_absent_inputs() {
        assert_eq!(wind_chill(None, Some(30.0)), None);
        assert_eq!(wind_chill(Some(-10.0), None), None);
    }
}
