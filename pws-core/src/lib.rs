//! Core library for the `pws` personal weather station poller.
//!
//! This crate defines:
//! - Configuration for one station (id, key, interval, fetch mode)
//! - Abstraction over observation fetch strategies (REST API / scraping)
//! - The enrichment pipeline: imperial-to-metric conversion, derived
//!   metrics (cloud base, absolute humidity, wind chill, compass) and
//!   condition classification
//! - Open-Meteo forecast and geocoding clients
//!
//! It is used by `pws-cli`, but can also be reused by other hosts that
//! schedule their own poll cycles.

pub mod calc;
pub mod condition;
pub mod config;
pub mod coordinator;
pub mod enrich;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod units;

pub use condition::Condition;
pub use config::StationConfig;
pub use coordinator::Coordinator;
pub use enrich::enrich_observation;
pub use error::FetchError;
pub use model::{ForecastDay, NormalizedObservation, RawObservation, Snapshot};
pub use provider::{FetchMode, ObservationProvider};
