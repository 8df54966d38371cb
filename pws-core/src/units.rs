//! Imperial-to-metric conversions for raw station readings.

/// Fahrenheit to Celsius.
pub fn f_to_c(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

/// Miles per hour to km/h.
pub fn mph_to_kmh(mph: f64) -> f64 {
    mph * 1.609344
}

/// Inches of mercury to hPa.
pub fn inhg_to_hpa(inhg: f64) -> f64 {
    inhg * 33.8638866667
}

/// Inches to millimetres.
pub fn inch_to_mm(inch: f64) -> f64 {
    inch * 25.4
}

/// Feet to metres.
pub fn ft_to_m(ft: f64) -> f64 {
    ft * 0.3048
}

/// Round to one decimal place, dropping non-finite results.
pub(crate) fn round1(value: f64) -> Option<f64> {
    Some((value * 10.0).round() / 10.0).filter(|v| v.is_finite())
}

/// Round to two decimal places, dropping non-finite results.
pub(crate) fn round2(value: f64) -> Option<f64> {
    Some((value * 100.0).round() / 100.0).filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c_to_f(c: f64) -> f64 {
        c * 9.0 / 5.0 + 32.0
    }

    #[test]
    fn fahrenheit_round_trip() {
        for c in [-40.0, -17.8, 0.0, 10.0, 21.5, 37.0, 100.0] {
            assert!((f_to_c(c_to_f(c)) - c).abs() < 1e-9);
        }
    }

    #[test]
    fn known_conversions() {
        assert!((f_to_c(32.0)).abs() < 1e-9);
        assert!((f_to_c(212.0) - 100.0).abs() < 1e-9);
        assert!((mph_to_kmh(1.0) - 1.609344).abs() < 1e-9);
        assert!((inhg_to_hpa(29.92) - 1013.207_489_067_456).abs() < 1e-6);
        assert!((inch_to_mm(1.0) - 25.4).abs() < 1e-9);
        assert!((ft_to_m(1.0) - 0.3048).abs() < 1e-9);
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(round1(8.04672), Some(8.0));
        assert_eq!(round1(-11.55), Some(-11.6));
        assert_eq!(round2(1013.2074), Some(1013.21));
        assert_eq!(round1(f64::NAN), None);
        assert_eq!(round2(f64::INFINITY), None);
    }
}
