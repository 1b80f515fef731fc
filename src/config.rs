//! Configuration file support.
//!
//! Settings come from an optional TOML file; the `LIFETREND_API_URL`
//! environment variable and command-line flags override them.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chart::Size;
use crate::error::ConfigError;
use crate::insight::InsightTiming;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "LIFETREND_API_URL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub insight: InsightConfig,
    #[serde(default)]
    pub chart: ChartConfig,
}

/// Fortune service endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Insight panel cadence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_chars_per_tick")]
    pub chars_per_tick: usize,
}

/// Surface size in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_tick_ms() -> u64 {
    25
}

fn default_chars_per_tick() -> usize {
    1
}

fn default_width() -> f64 {
    1000.0
}

fn default_height() -> f64 {
    400.0
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            tick_ms: default_tick_ms(),
            chars_per_tick: default_chars_per_tick(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl InsightConfig {
    pub fn timing(&self) -> InsightTiming {
        InsightTiming {
            debounce: Duration::from_millis(self.debounce_ms),
            tick: Duration::from_millis(self.tick_ms),
            chars_per_tick: self.chars_per_tick,
        }
    }
}

impl ChartConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// File settings (or defaults) with the environment applied, validated
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.override_base_url(std::env::var(API_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Replace the API base URL when a non-empty value is given
    pub fn override_base_url(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.api.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api.base_url must start with http:// or https:// (got {})",
                url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "api.timeout_secs must be positive".to_string(),
            ));
        }
        if self.insight.chars_per_tick == 0 {
            return Err(ConfigError::Invalid(
                "insight.chars_per_tick must be positive".to_string(),
            ));
        }
        if !self.chart.size().is_valid() {
            return Err(ConfigError::Invalid(format!(
                "chart size must be positive (got {}x{})",
                self.chart.width, self.chart.height
            )));
        }
        Ok(())
    }
}
