use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    config::StationConfig,
    enrich::enrich_observation,
    error::FetchError,
    model::{NormalizedObservation, RawObservation},
};

use super::ObservationProvider;

/// Vendor endpoint for the latest observation of one station.
pub const OBSERVATION_URL: &str = "https://api.weather.com/v2/pws/observations/current";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const VALIDATE_TIMEOUT: Duration = Duration::from_secs(15);

/// REST fetch strategy: one authenticated GET per cycle, imperial units,
/// JSON payload with an `observations` array.
#[derive(Debug, Clone)]
pub struct ApiProvider {
    config: StationConfig,
    http: Client,
}

impl ApiProvider {
    pub fn new(config: StationConfig) -> Self {
        Self { config, http: Client::new() }
    }

    /// Short ping used by the configure step to check station id and key.
    pub async fn validate(&self) -> Result<(), FetchError> {
        self.fetch_first(VALIDATE_TIMEOUT).await.map(|_| ())
    }

    async fn fetch_first(&self, timeout: Duration) -> Result<RawObservation, FetchError> {
        log::debug!(
            "requesting current observation for station {}",
            self.config.station_id
        );

        let res = self
            .http
            .get(OBSERVATION_URL)
            .query(&[
                ("stationId", self.config.station_id.as_str()),
                ("format", "json"),
                ("units", "e"),
                ("apiKey", self.config.api_key.as_str()),
            ])
            .timeout(timeout)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::UpstreamHttp(status));
        }

        let payload: ObservationsPayload =
            res.json().await.map_err(FetchError::from_transport)?;

        payload
            .observations
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or(FetchError::EmptyResult)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ObservationsPayload {
    observations: Option<Vec<RawObservation>>,
}

#[async_trait]
impl ObservationProvider for ApiProvider {
    async fn refresh(&self) -> Result<NormalizedObservation, FetchError> {
        let raw = self.fetch_first(FETCH_TIMEOUT).await?;
        let mut obs = enrich_observation(&raw);

        // A sparse payload may omit its own id; the configured one stands in.
        if obs.station_id.is_none() {
            obs.station_id = Some(self.config.station_id.clone());
        }
        if obs.location_name.is_none() {
            obs.location_name = Some(self.config.station_id.clone());
        }

        Ok(obs)
    }
}
