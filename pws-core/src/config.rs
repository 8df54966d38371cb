use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::provider::FetchMode;

pub const DEFAULT_SCAN_INTERVAL: u32 = 5; // minutes
pub const MIN_SCAN_INTERVAL: u32 = 1;
pub const MAX_SCAN_INTERVAL: u32 = 60;

/// Station configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// station_id = "IKAPOS27"
/// api_key = "..."
/// scan_interval = 5
/// mode = "api"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    /// Station identifier at the aggregator, e.g. "IKAPOS27".
    pub station_id: String,

    /// Opaque API key; unused by the scrape mode.
    #[serde(default)]
    pub api_key: String,

    /// Poll interval in minutes, clamped into 1-60 on load.
    #[serde(default = "default_scan_interval")]
    pub scan_interval: u32,

    /// Fetch strategy: "api" or "scrape".
    #[serde(default)]
    pub mode: FetchMode,
}

fn default_scan_interval() -> u32 {
    DEFAULT_SCAN_INTERVAL
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            station_id: String::new(),
            api_key: String::new(),
            scan_interval: DEFAULT_SCAN_INTERVAL,
            mode: FetchMode::default(),
        }
    }
}

impl StationConfig {
    /// Station id, or a configure hint when none is stored yet.
    pub fn require_station(&self) -> Result<&str> {
        if self.station_id.is_empty() {
            return Err(anyhow!(
                "No station configured.\n\
                 Hint: run `pws configure` first."
            ));
        }
        Ok(&self.station_id)
    }

    /// Poll interval as a duration, after clamping.
    pub fn poll_interval(&self) -> Duration {
        let minutes = self.scan_interval.clamp(MIN_SCAN_INTERVAL, MAX_SCAN_INTERVAL);
        Duration::from_secs(u64::from(minutes) * 60)
    }

    /// Force stored values back into their documented ranges.
    pub fn normalize(&mut self) {
        self.scan_interval = self.scan_interval.clamp(MIN_SCAN_INTERVAL, MAX_SCAN_INTERVAL);
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut cfg: StationConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        cfg.normalize();

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "pws", "pws-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
