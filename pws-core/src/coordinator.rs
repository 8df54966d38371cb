//! Per-station poll-cycle orchestration.

use reqwest::Client;

use crate::{
    config::StationConfig,
    error::FetchError,
    forecast,
    model::{ForecastDay, Snapshot},
    provider::{ObservationProvider, provider_from_config},
};

/// Runs one poll cycle for a single configured station: observation
/// refresh through the configured fetch strategy, then an opportunistic
/// forecast fetch for the station's coordinates.
///
/// The host scheduler owns one coordinator per station and calls
/// [`Coordinator::refresh`] on its interval; the coordinator itself keeps
/// no state between cycles. Caching the last good snapshot across failed
/// cycles is the host's job.
#[derive(Debug)]
pub struct Coordinator {
    config: StationConfig,
    provider: Box<dyn ObservationProvider>,
    http: Client,
}

impl Coordinator {
    /// Build the coordinator for one station, selecting the fetch
    /// strategy from its configuration.
    pub fn new(config: StationConfig) -> anyhow::Result<Self> {
        let provider = provider_from_config(&config)?;
        Ok(Self { config, provider, http: Client::new() })
    }

    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    /// One full cycle. A forecast failure never fails the cycle: the
    /// observation is returned with an empty forecast and a warning log.
    pub async fn refresh(&self) -> Result<Snapshot, FetchError> {
        let observation = self.provider.refresh().await?;

        let coords = match (observation.lat, observation.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => match observation.location_name.as_deref() {
                Some(name) => forecast::geocode(&self.http, name).await,
                None => None,
            },
        };

        let forecast = match coords {
            Some((lat, lon)) => self.refresh_forecast(lat, lon).await,
            None => {
                log::debug!(
                    "no coordinates for station {}, skipping forecast",
                    self.config.station_id
                );
                Vec::new()
            }
        };

        Ok(Snapshot { observation, forecast })
    }

    /// Fetch the multi-day forecast on its own; failures degrade to an
    /// empty list.
    pub async fn refresh_forecast(&self, lat: f64, lon: f64) -> Vec<ForecastDay> {
        match forecast::fetch_forecast(&self.http, lat, lon).await {
            Ok(days) => days,
            Err(err) => {
                log::warn!(
                    "forecast fetch failed for station {}: {err}",
                    self.config.station_id
                );
                Vec::new()
            }
        }
    }
}
