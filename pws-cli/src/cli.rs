use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Password, Select, Text};

use pws_core::model::{ForecastDay, NormalizedObservation, Snapshot};
use pws_core::provider::api::ApiProvider;
use pws_core::{Coordinator, FetchMode, StationConfig};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "pws", version, about = "Personal weather station poller")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the station, credentials, poll interval and fetch mode.
    Configure,

    /// Fetch and print the current observation once.
    Show,

    /// Fetch and print the multi-day forecast for the station's location.
    Forecast,

    /// Poll on the configured interval, keeping the last good snapshot on
    /// failed cycles.
    Watch,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure().await,
            Command::Show => show().await,
            Command::Forecast => forecast().await,
            Command::Watch => watch().await,
        }
    }
}

async fn configure() -> Result<()> {
    let current = StationConfig::load()?;

    let station_id =
        Text::new("Station id:").with_initial_value(&current.station_id).prompt()?;

    let mode_labels: Vec<&str> = FetchMode::all().iter().map(FetchMode::as_str).collect();
    let mode = FetchMode::try_from(Select::new("Fetch mode:", mode_labels).prompt()?)?;

    let api_key = if mode == FetchMode::Api {
        Password::new("API key:").without_confirmation().prompt()?
    } else {
        current.api_key.clone()
    };

    let scan_interval = CustomType::<u32>::new("Poll interval (minutes):")
        .with_default(current.scan_interval)
        .prompt()?;

    let mut cfg = StationConfig { station_id, api_key, scan_interval, mode };
    cfg.normalize();

    if cfg.mode == FetchMode::Api {
        match ApiProvider::new(cfg.clone()).validate().await {
            Ok(()) => println!("Station access validated."),
            Err(err) => println!("Warning: validation failed ({err}); saving anyway."),
        }
    }

    cfg.save()?;
    println!("Saved configuration to {}", StationConfig::config_file_path()?.display());
    Ok(())
}

async fn show() -> Result<()> {
    let snapshot = build_coordinator()?.refresh().await?;
    print_observation(&snapshot.observation);
    Ok(())
}

async fn forecast() -> Result<()> {
    let snapshot = build_coordinator()?.refresh().await?;
    if snapshot.forecast.is_empty() {
        println!("No forecast available.");
    } else {
        print_forecast(&snapshot.forecast);
    }
    Ok(())
}

async fn watch() -> Result<()> {
    let coordinator = build_coordinator()?;
    let interval = coordinator.config().poll_interval();
    println!("Polling every {} minute(s), Ctrl-C to stop.", interval.as_secs() / 60);

    let mut last_good: Option<Snapshot> = None;
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match coordinator.refresh().await {
            Ok(snapshot) => {
                println!("--- {} ---", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
                print_observation(&snapshot.observation);
                last_good = Some(snapshot);
            }
            Err(err) => {
                log::error!("poll cycle failed: {err}");
                if let Some(snapshot) = &last_good {
                    println!(
                        "(cycle failed, last good observation is from {})",
                        snapshot.observation.last_updated.as_deref().unwrap_or("earlier")
                    );
                }
            }
        }
    }
}

fn build_coordinator() -> Result<Coordinator> {
    let config = StationConfig::load()?;
    Coordinator::new(config)
}

fn num(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v} {unit}"),
        None => "-".to_string(),
    }
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn print_observation(obs: &NormalizedObservation) {
    println!("Station:            {}", text(obs.station_id.as_deref()));
    println!("Location:           {}", text(obs.location_name.as_deref()));
    println!("Country:            {}", text(obs.country.as_deref()));
    println!("Updated:            {}", text(obs.last_updated.as_deref()));
    println!("Condition:          {}", obs.condition);
    println!("Temperature:        {}", num(obs.temperature, "°C"));
    println!("Feels like:         {}", num(obs.feels_like, "°C"));
    println!("Dew point:          {}", num(obs.dew_point, "°C"));
    println!("Humidity:           {}", num(obs.humidity, "%"));
    println!("Absolute humidity:  {}", num(obs.absolute_humidity, "g/m³"));
    println!("Pressure:           {}", num(obs.pressure, "hPa"));
    println!("Wind speed:         {}", num(obs.wind_speed, "km/h"));
    println!("Wind gust:          {}", num(obs.wind_gust, "km/h"));
    println!(
        "Wind bearing:       {} ({} / {})",
        num(obs.wind_bearing, "°"),
        text(obs.wind_compass),
        text(obs.wind_compass_hu),
    );
    println!("Wind chill:         {}", num(obs.wind_chill, "°C"));
    println!("Precip rate:        {}", num(obs.precipitation_rate, "mm/h"));
    println!("Precip today:       {}", num(obs.precipitation, "mm"));
    println!("Solar radiation:    {}", num(obs.solar_radiation, "W/m²"));
    println!("UV index:           {}", num(obs.uv_index, ""));
    println!("Cloud base:         {}", num(obs.cloud_base, "m"));
    println!("Elevation:          {}", num(obs.elevation_m, "m"));
    match (obs.lat, obs.lon) {
        (Some(lat), Some(lon)) => println!("Coordinates:        {lat:.4}, {lon:.4}"),
        _ => println!("Coordinates:        -"),
    }
}

fn print_forecast(days: &[ForecastDay]) {
    for day in days {
        println!(
            "{}  {:>6} / {:<6}  precip {:<8}  cloud {:<6}  {}",
            day.datetime,
            num(day.temperature, "°C"),
            num(day.templow, "°C"),
            num(day.precipitation, "mm"),
            num(day.cloud_coverage, "%"),
            day.condition,
        );
    }
}
