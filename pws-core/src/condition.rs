//! Coarse weather condition vocabulary shared by the current observation
//! and the multi-day forecast.

use serde::Serialize;

/// Categorical weather state consumed by downstream display layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Sunny,
    Partlycloudy,
    Cloudy,
    Fog,
    Rainy,
    Snowy,
    Lightning,
    #[default]
    Unknown,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Sunny => "sunny",
            Condition::Partlycloudy => "partlycloudy",
            Condition::Cloudy => "cloudy",
            Condition::Fog => "fog",
            Condition::Rainy => "rainy",
            Condition::Snowy => "snowy",
            Condition::Lightning => "lightning",
            Condition::Unknown => "unknown",
        }
    }

    /// Infer the current condition from raw numeric signals.
    ///
    /// Fixed-priority decision list; absent inputs count as zero. Any
    /// measurable precipitation wins over the radiation rules.
    pub fn classify(
        precip_rate: Option<f64>,
        solar_radiation: Option<f64>,
        uv_index: Option<f64>,
    ) -> Condition {
        let rate = precip_rate.unwrap_or(0.0);
        let solar = solar_radiation.unwrap_or(0.0);
        let uv = uv_index.unwrap_or(0.0);

        if rate > 0.0 {
            Condition::Rainy
        } else if solar > 600.0 && uv > 5.0 {
            Condition::Sunny
        } else if solar > 200.0 {
            Condition::Partlycloudy
        } else if solar < 50.0 {
            Condition::Cloudy
        } else {
            Condition::Partlycloudy
        }
    }

    /// Map a WMO weather code from the forecast provider onto the same
    /// vocabulary. An absent code is unknown; a present but unrecognized
    /// code falls back to cloudy.
    pub fn from_wmo(code: Option<u16>) -> Condition {
        let Some(code) = code else {
            return Condition::Unknown;
        };
        match code {
            0 => Condition::Sunny,
            1 | 2 => Condition::Partlycloudy,
            3 => Condition::Cloudy,
            45 | 48 => Condition::Fog,
            51 | 53 | 55 | 56 | 57 | 61 | 63 | 65 | 66 | 67 | 80 | 81 | 82 => Condition::Rainy,
            71 | 73 | 75 | 77 | 85 | 86 => Condition::Snowy,
            95 | 96 | 99 => Condition::Lightning,
            _ => Condition::Cloudy,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precipitation_outranks_radiation() {
        let c = Condition::classify(Some(0.2), Some(700.0), Some(6.0));
        assert_eq!(c, Condition::Rainy);
    }

    #[test]
    fn radiation_branches() {
        assert_eq!(Condition::classify(None, Some(700.0), Some(6.0)), Condition::Sunny);
        // bright but low UV is only partly cloudy
        assert_eq!(Condition::classify(None, Some(700.0), Some(3.0)), Condition::Partlycloudy);
        assert_eq!(Condition::classify(None, Some(300.0), None), Condition::Partlycloudy);
        assert_eq!(Condition::classify(None, Some(20.0), None), Condition::Cloudy);
        assert_eq!(Condition::classify(None, Some(100.0), None), Condition::Partlycloudy);
    }

    #[test]
    fn absent_signals_classify_as_cloudy() {
        assert_eq!(Condition::classify(None, None, None), Condition::Cloudy);
    }

    #[test]
    fn wmo_lookup_table() {
        assert_eq!(Condition::from_wmo(Some(0)), Condition::Sunny);
        assert_eq!(Condition::from_wmo(Some(2)), Condition::Partlycloudy);
        assert_eq!(Condition::from_wmo(Some(3)), Condition::Cloudy);
        assert_eq!(Condition::from_wmo(Some(48)), Condition::Fog);
        assert_eq!(Condition::from_wmo(Some(61)), Condition::Rainy);
        assert_eq!(Condition::from_wmo(Some(82)), Condition::Rainy);
        assert_eq!(Condition::from_wmo(Some(75)), Condition::Snowy);
        assert_eq!(Condition::from_wmo(Some(95)), Condition::Lightning);
    }

    #[test]
    fn wmo_fallbacks() {
        assert_eq!(Condition::from_wmo(None), Condition::Unknown);
        // present but unmapped code defaults to cloudy, not unknown
        assert_eq!(Condition::from_wmo(Some(200)), Condition::Cloudy);
    }

    #[test]
    fn display_matches_wire_form() {
        assert_eq!(Condition::Partlycloudy.to_string(), "partlycloudy");
        assert_eq!(serde_json::to_string(&Condition::Rainy).unwrap(), "\"rainy\"");
    }
}
