//! Configuration schema, defaults, and layered loading.
//!
//! Precedence: defaults < config file < environment < CLI
use anyhow::{ensure, Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const MAX_FILE_SIZE_MB: u64 = 50;
const MAX_FILE_SIZE_CEILING_MB: u64 = 1024;
const MAX_TIMER_MS: u64 = 60_000;
const BYTES_PER_MB: u64 = 1024 * 1024;

pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "roomify")
        .map(|p| p.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("roomify.toml"))
}

/// Timing and size policy for the uploader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Delay between progress ticks
    pub progress_interval_ms: u64,
    /// Percentage added per tick
    pub progress_step: u8,
    /// Delay between reaching 100% and the completion callback
    pub redirect_delay_ms: u64,
    pub max_file_size_mb: u64,
    /// Extensions offered by the file picker, without the dot
    pub accepted_extensions: Vec<String>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            progress_interval_ms: 100,
            progress_step: 10,
            redirect_delay_ms: 500,
            max_file_size_mb: MAX_FILE_SIZE_MB,
            accepted_extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
        }
    }
}

impl UploadSettings {
    pub fn max_bytes(&self) -> u64 {
        self.max_file_size_mb * BYTES_PER_MB
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    /// Ticks needed to reach 100%.
    pub fn ticks_to_complete(&self) -> u32 {
        let step = u32::from(self.progress_step.max(1));
        100u32.div_ceil(step)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=100).contains(&self.progress_step),
            "Invalid config: upload.progress_step must be between 1 and 100"
        );
        ensure!(
            self.progress_interval_ms >= 1,
            "Invalid config: upload.progress_interval_ms must be >= 1"
        );
        ensure!(
            self.progress_interval_ms <= MAX_TIMER_MS,
            "Invalid config: upload.progress_interval_ms must be <= {MAX_TIMER_MS}"
        );
        ensure!(
            self.redirect_delay_ms <= MAX_TIMER_MS,
            "Invalid config: upload.redirect_delay_ms must be <= {MAX_TIMER_MS}"
        );
        ensure!(
            (1..=MAX_FILE_SIZE_CEILING_MB).contains(&self.max_file_size_mb),
            "Invalid config: upload.max_file_size_mb must be between 1 and {MAX_FILE_SIZE_CEILING_MB}"
        );
        ensure!(
            !self.accepted_extensions.is_empty(),
            "Invalid config: upload.accepted_extensions must not be empty"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter when RUST_LOG is unset
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Fully resolved application configuration after all layers merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub upload: UploadSettings,
    pub log: LogSettings,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.upload.validate()
    }
}

/// Values given on the command line, applied last.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_step: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_interval_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_size_mb: Option<u64>,
}

/// Loads config from defaults/file/env, then applies CLI overrides.
pub fn load_config(overrides: &ConfigOverrides) -> Result<AppConfig> {
    let path = config_path();

    let config: AppConfig = Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("ROOMIFY_").split("__"))
        .extract()
        .context("Failed to load configuration")?;

    let config = apply_overrides(config, overrides);
    config.validate()?;

    Ok(config)
}

/// Applies runtime overrides to a loaded config.
pub fn apply_overrides(mut config: AppConfig, overrides: &ConfigOverrides) -> AppConfig {
    if let Some(step) = overrides.progress_step {
        config.upload.progress_step = step;
    }
    if let Some(interval) = overrides.progress_interval_ms {
        config.upload.progress_interval_ms = interval;
    }
    if let Some(delay) = overrides.redirect_delay_ms {
        config.upload.redirect_delay_ms = delay;
    }
    if let Some(size) = overrides.max_file_size_mb {
        config.upload.max_file_size_mb = size;
    }

    config
}
