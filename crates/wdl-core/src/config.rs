use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::locator::DEFAULT_SOURCE_URL;
use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per part (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/wdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WdlConfig {
    /// Origin the model names are resolved against.
    pub base_url: String,
    /// Directory for downloaded models (None = current working directory).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Per-request timeout in seconds, applied to every request of every part.
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Number of concurrent range requests per download.
    pub part_count: usize,
    /// Receive buffer size per part in bytes.
    pub buffer_bytes: usize,
    /// Seconds between periodic progress lines.
    pub report_interval_secs: u64,
    /// Suppress textual progress.
    #[serde(default)]
    pub quiet: bool,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for WdlConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SOURCE_URL.to_string(),
            output_dir: None,
            timeout_secs: 30 * 60,
            connect_timeout_secs: 30,
            part_count: 5,
            buffer_bytes: 64 * 1024,
            report_interval_secs: 5,
            quiet: false,
            retry: None,
        }
    }
}

impl WdlConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().policy()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("wdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WdlConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<WdlConfig> {
    if !path.exists() {
        let default_cfg = WdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: WdlConfig = toml::from_str(&data)?;
    Ok(cfg)
}
