use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::download::DownloadOptions;
use crate::fetcher::TransferOptions;
use crate::segmenter::DEFAULT_CHUNK_SIZE;

/// Global configuration loaded from `~/.config/rangedl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangedlConfig {
    /// Worker count used when the CLI is not given `--concurrency`.
    pub concurrency: usize,
    /// Segment size in bytes.
    pub chunk_size: u64,
    /// Parent of per-job scratch directories (None = system temp dir).
    #[serde(default)]
    pub scratch_root: Option<PathBuf>,
    /// Connect timeout per request, in seconds.
    pub connect_timeout_secs: u64,
    /// Abort a transfer slower than this many bytes/sec for `low_speed_time_secs`.
    pub low_speed_limit: u32,
    pub low_speed_time_secs: u64,
    /// Optional curl receive buffer size in bytes (None = library default).
    #[serde(default)]
    pub buffer_size: Option<usize>,
}

impl Default for RangedlConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            chunk_size: DEFAULT_CHUNK_SIZE,
            scratch_root: None,
            connect_timeout_secs: 30,
            low_speed_limit: 1024,
            low_speed_time_secs: 60,
            buffer_size: None,
        }
    }
}

impl RangedlConfig {
    /// Options for `download_with_options` derived from this config.
    pub fn download_options(&self) -> DownloadOptions {
        DownloadOptions {
            chunk_size: self.chunk_size,
            scratch_root: self.scratch_root.clone(),
            transfer: TransferOptions {
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                low_speed_limit: self.low_speed_limit,
                low_speed_time: Duration::from_secs(self.low_speed_time_secs),
                buffer_size: self.buffer_size,
            },
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rangedl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RangedlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RangedlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg: RangedlConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
