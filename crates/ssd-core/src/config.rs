use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Listing-crawl retry parameters (optional section in config.toml).
/// The crawl gives up on an account after `max_attempts` consecutive
/// failures on one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRetryConfig {
    /// Maximum number of attempts per listing page (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for ListingRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 12,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

/// Per-image download retry parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRetryConfig {
    /// Maximum attempts per image; absent means retry until success.
    #[serde(default)]
    pub max_attempts: Option<u32>,
    /// Fixed delay in seconds between attempts.
    pub backoff_secs: f64,
}

impl Default for DownloadRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: None,
            backoff_secs: 1.0,
        }
    }
}

/// Global configuration loaded from `~/.config/ssd/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsdConfig {
    /// Concurrent download workers; 0 means one per logical CPU.
    pub workers: usize,
    /// Optional listing retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub listing_retry: Option<ListingRetryConfig>,
    /// Optional download retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub download_retry: Option<DownloadRetryConfig>,
}

impl Default for SsdConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            listing_retry: None,
            download_retry: None,
        }
    }
}

impl SsdConfig {
    /// Effective worker-pool size.
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    }

    /// Bounded policy for listing-page fetches.
    pub fn listing_policy(&self) -> RetryPolicy {
        let c = self.listing_retry.clone().unwrap_or_default();
        RetryPolicy::bounded(
            c.max_attempts.max(1),
            Duration::from_secs_f64(c.base_delay_secs.max(0.0)),
            Duration::from_secs(c.max_delay_secs),
        )
    }

    /// Policy for the per-image download pipeline; unbounded by default.
    pub fn download_policy(&self) -> RetryPolicy {
        let c = self.download_retry.clone().unwrap_or_default();
        let delay = Duration::from_secs_f64(c.backoff_secs.max(0.0));
        match c.max_attempts {
            Some(n) => RetryPolicy::bounded(n.max(1), delay, delay),
            None => RetryPolicy::unbounded(delay),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ssd")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SsdConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SsdConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SsdConfig = toml::from_str(&data)?;
    Ok(cfg)
}
