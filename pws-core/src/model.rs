//! Wire-level and normalized observation records.

use serde::{Deserialize, Deserializer, Serialize};

use crate::condition::Condition;

/// Deserialize a numeric field that upstream may send as a number, a
/// numeric string, null, or garbage. Anything that is not a finite number
/// becomes `None` instead of a deserialization error.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value))
}

fn value_to_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// One observation as reported by the station aggregator. Every field is
/// optional; the upstream contract is loose enough that any of them may be
/// missing or malformed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawObservation {
    #[serde(rename = "stationID")]
    pub station_id: Option<String>,
    #[serde(rename = "obsTimeUtc")]
    pub obs_time_utc: Option<String>,
    #[serde(rename = "obsTimeLocal")]
    pub obs_time_local: Option<String>,
    pub neighborhood: Option<String>,
    pub country: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub lon: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub uv: Option<f64>,
    #[serde(rename = "solarRadiation", deserialize_with = "lenient_f64")]
    pub solar_radiation: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub humidity: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub winddir: Option<f64>,
    pub imperial: Option<UnitReading>,
    pub metric: Option<UnitReading>,
}

/// Nested per-unit-system reading. The same field set is used for the
/// imperial sub-mapping (API path) and the metric one (scrape path).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UnitReading {
    #[serde(deserialize_with = "lenient_f64")]
    pub temp: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub dewpt: Option<f64>,
    #[serde(rename = "heatIndex", deserialize_with = "lenient_f64")]
    pub heat_index: Option<f64>,
    #[serde(rename = "windSpeed", deserialize_with = "lenient_f64")]
    pub wind_speed: Option<f64>,
    #[serde(rename = "windGust", deserialize_with = "lenient_f64")]
    pub wind_gust: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub pressure: Option<f64>,
    #[serde(rename = "precipRate", deserialize_with = "lenient_f64")]
    pub precip_rate: Option<f64>,
    #[serde(rename = "precipTotal", deserialize_with = "lenient_f64")]
    pub precip_total: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub elev: Option<f64>,
}

/// Metric observation with derived values, keyed by the attribute names
/// the host entity layer consumes. Numeric fields are finite or absent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizedObservation {
    pub station_id: Option<String>,
    pub last_updated: Option<String>,
    pub location_name: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub elevation_m: Option<f64>,
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub dew_point: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_gust: Option<f64>,
    pub wind_bearing: Option<f64>,
    pub wind_compass: Option<&'static str>,
    pub wind_compass_hu: Option<&'static str>,
    pub precipitation: Option<f64>,
    pub precipitation_rate: Option<f64>,
    pub solar_radiation: Option<f64>,
    pub uv_index: Option<f64>,
    pub cloud_base: Option<f64>,
    pub absolute_humidity: Option<f64>,
    pub wind_chill: Option<f64>,
    pub heat_index: Option<f64>,
    pub condition: Condition,
}

impl NormalizedObservation {
    /// True when at least one measured value survived extraction. Used by
    /// the scrape path to tell a partial result from a total miss.
    pub fn has_any_reading(&self) -> bool {
        [
            self.temperature,
            self.feels_like,
            self.dew_point,
            self.humidity,
            self.pressure,
            self.wind_speed,
            self.wind_gust,
            self.wind_bearing,
            self.precipitation,
            self.precipitation_rate,
            self.solar_radiation,
            self.uv_index,
            self.elevation_m,
        ]
        .iter()
        .any(Option::is_some)
    }
}

/// One day of the multi-day forecast, chronological order as returned by
/// the forecast provider.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastDay {
    pub datetime: chrono::NaiveDate,
    pub temperature: Option<f64>,
    pub templow: Option<f64>,
    pub precipitation: Option<f64>,
    pub condition: Condition,
    pub cloud_coverage: Option<f64>,
}

/// Combined result of one poll cycle.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub observation: NormalizedObservation,
    pub forecast: Vec<ForecastDay>,
}
