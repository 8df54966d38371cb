use crate::{
    config::StationConfig,
    error::FetchError,
    model::NormalizedObservation,
    provider::{api::ApiProvider, scrape::ScrapeProvider},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt::Debug};

pub mod api;
pub mod scrape;

/// How the current observation is obtained: the vendor REST API or
/// best-effort scraping of the public dashboard page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    #[default]
    Api,
    Scrape,
}

impl FetchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchMode::Api => "api",
            FetchMode::Scrape => "scrape",
        }
    }

    pub const fn all() -> &'static [FetchMode] {
        &[FetchMode::Api, FetchMode::Scrape]
    }
}

impl std::fmt::Display for FetchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for FetchMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "api" => Ok(FetchMode::Api),
            "scrape" => Ok(FetchMode::Scrape),
            _ => Err(anyhow::anyhow!(
                "Unknown fetch mode '{value}'. Supported modes: api, scrape."
            )),
        }
    }
}

/// One fetch strategy for the current observation. Implementations issue
/// the outbound request(s) for a single poll cycle and return the
/// normalized record; they hold no state across cycles.
#[async_trait]
pub trait ObservationProvider: Send + Sync + Debug {
    async fn refresh(&self) -> Result<NormalizedObservation, FetchError>;
}

/// Construct the provider selected by the station configuration.
pub fn provider_from_config(
    config: &StationConfig,
) -> anyhow::Result<Box<dyn ObservationProvider>> {
    let station = config.require_station()?;

    let boxed: Box<dyn ObservationProvider> = match config.mode {
        FetchMode::Api => {
            if config.api_key.is_empty() {
                return Err(anyhow::anyhow!(
                    "No API key configured for station '{station}'.\n\
                     Hint: run `pws configure` and enter your API key, \
                     or switch the fetch mode to 'scrape'."
                ));
            }
            Box::new(ApiProvider::new(config.clone()))
        }
        FetchMode::Scrape => Box::new(ScrapeProvider::new(config.clone())),
    };

    Ok(boxed)
}
