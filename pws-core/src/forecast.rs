//! Open-Meteo forecast and geocoding clients.
//!
//! Both calls are opportunistic extras on top of the observation cycle:
//! any failure here degrades the output (empty forecast, no coordinates)
//! and is logged rather than surfaced.

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::condition::Condition;
use crate::error::FetchError;
use crate::model::ForecastDay;

pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

const FORECAST_TIMEOUT: Duration = Duration::from_secs(15);
const GEOCODING_TIMEOUT: Duration = Duration::from_secs(10);

const FORECAST_DAYS: u8 = 7;
const DAILY_VARIABLES: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_sum,weathercode,cloudcover_mean";

/// Fetch the daily forecast for a coordinate pair, chronological order.
pub async fn fetch_forecast(
    client: &Client,
    lat: f64,
    lon: f64,
) -> Result<Vec<ForecastDay>, FetchError> {
    log::debug!("requesting {FORECAST_DAYS}-day forecast for {lat:.4},{lon:.4}");

    let res = client
        .get(FORECAST_URL)
        .query(&[
            ("latitude", lat.to_string()),
            ("longitude", lon.to_string()),
            ("daily", DAILY_VARIABLES.to_string()),
            ("timezone", "auto".to_string()),
            ("forecast_days", FORECAST_DAYS.to_string()),
        ])
        .timeout(FORECAST_TIMEOUT)
        .send()
        .await
        .map_err(FetchError::from_transport)?;

    let status = res.status();
    if !status.is_success() {
        return Err(FetchError::UpstreamHttp(status));
    }

    let payload: ForecastPayload = res.json().await.map_err(FetchError::from_transport)?;
    Ok(payload.daily.into_days())
}

/// Best-match coordinates for a free-text location name, or `None`.
///
/// Geocoding is purely a convenience for stations that do not report
/// their own position; every failure maps to `None`.
pub async fn geocode(client: &Client, name: &str) -> Option<(f64, f64)> {
    let res = client
        .get(GEOCODING_URL)
        .query(&[("name", name), ("count", "1"), ("language", "hu"), ("format", "json")])
        .timeout(GEOCODING_TIMEOUT)
        .send()
        .await
        .ok()?;

    if !res.status().is_success() {
        log::debug!("geocoding '{name}' answered {}", res.status());
        return None;
    }

    let payload: GeocodingPayload = res.json().await.ok()?;
    let hit = payload.results.unwrap_or_default().into_iter().next()?;
    Some((hit.latitude, hit.longitude))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ForecastPayload {
    daily: DailyBlock,
}

/// Open-Meteo returns one parallel array per requested variable. Arrays
/// may be missing, shorter than `time`, or contain nulls.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DailyBlock {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    precipitation_sum: Vec<Option<f64>>,
    weathercode: Vec<Option<u16>>,
    cloudcover_mean: Vec<Option<f64>>,
}

impl DailyBlock {
    fn into_days(self) -> Vec<ForecastDay> {
        self.time
            .iter()
            .enumerate()
            .filter_map(|(i, date)| {
                let datetime = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
                let code = self.weathercode.get(i).copied().flatten();
                Some(ForecastDay {
                    datetime,
                    temperature: self.temperature_2m_max.get(i).copied().flatten(),
                    templow: self.temperature_2m_min.get(i).copied().flatten(),
                    precipitation: self.precipitation_sum.get(i).copied().flatten(),
                    condition: Condition::from_wmo(code),
                    cloud_coverage: self.cloudcover_mean.get(i).copied().flatten(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeocodingPayload {
    results: Option<Vec<GeocodingHit>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingHit {
    latitude: f64,
    longitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_arrays_zip_into_days() {
        let payload: ForecastPayload = serde_json::from_str(
            r#"{"daily": {
                "time": ["2024-05-01", "2024-05-02", "2024-05-03"],
                "temperature_2m_max": [21.3, 18.0, null],
                "temperature_2m_min": [9.1, 8.4, 7.9],
                "precipitation_sum": [0.0, 4.2, 1.1],
                "weathercode": [0, 61, 3],
                "cloudcover_mean": [12.0, 88.0, 95.0]
            }}"#,
        )
        .unwrap();

        let days = payload.daily.into_days();
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].datetime, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(days[0].condition, Condition::Sunny);
        assert_eq!(days[1].condition, Condition::Rainy);
        assert_eq!(days[1].precipitation, Some(4.2));
        assert_eq!(days[2].condition, Condition::Cloudy);
        assert_eq!(days[2].temperature, None);
    }

    #[test]
    fn ragged_and_missing_arrays_degrade_to_absent() {
        let payload: ForecastPayload = serde_json::from_str(
            r#"{"daily": {
                "time": ["2024-05-01", "2024-05-02"],
                "temperature_2m_max": [20.0],
                "weathercode": []
            }}"#,
        )
        .unwrap();

        let days = payload.daily.into_days();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].temperature, Some(20.0));
        assert_eq!(days[1].temperature, None);
        // no code at all means the condition is unknown, not cloudy
        assert_eq!(days[0].condition, Condition::Unknown);
        assert_eq!(days[1].condition, Condition::Unknown);
    }

    #[test]
    fn empty_payload_yields_no_days() {
        let payload: ForecastPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.daily.into_days().is_empty());
    }

    #[test]
    fn geocoding_payload_first_hit() {
        let payload: GeocodingPayload = serde_json::from_str(
            r#"{"results": [{"latitude": 46.36, "longitude": 17.78, "name": "Kaposvár"}]}"#,
        )
        .unwrap();
        let hit = payload.results.unwrap().into_iter().next().unwrap();
        assert_eq!(hit.latitude, 46.36);
        assert_eq!(hit.longitude, 17.78);
    }

    #[test]
    fn geocoding_payload_without_results() {
        let payload: GeocodingPayload = serde_json::from_str(r#"{"results": null}"#).unwrap();
        assert!(payload.results.is_none());
    }
}
