use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_hold_duration_ms")]
    pub hold_duration_ms: u64,
    #[serde(default = "default_scramble_length")]
    pub scramble_length: usize,
    #[serde(default = "default_puzzle_type")]
    pub puzzle_type: String,
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_sync_enabled")]
    pub sync_enabled: bool,
    #[serde(default = "default_release_fallback_ms")]
    pub release_fallback_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_hold_duration_ms() -> u64 {
    500
}
fn default_scramble_length() -> usize {
    20
}
fn default_puzzle_type() -> String {
    "3x3".to_string()
}
fn default_sample_interval_ms() -> u64 {
    10
}
fn default_recent_limit() -> usize {
    10
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_api_base_url() -> String {
    "https://cubetimerbackend.onrender.com/api/v1".to_string()
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_sync_enabled() -> bool {
    true
}
fn default_release_fallback_ms() -> u64 {
    650
}
fn default_log_level() -> String {
    "info".to_string()
}

pub const MAX_HOLD_DURATION_MS: u64 = 5000;
pub const MIN_SCRAMBLE_LENGTH: usize = 1;
pub const MAX_SCRAMBLE_LENGTH: usize = 60;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Default for Config {
    fn default() -> Self {
        Self {
            hold_duration_ms: default_hold_duration_ms(),
            scramble_length: default_scramble_length(),
            puzzle_type: default_puzzle_type(),
            sample_interval_ms: default_sample_interval_ms(),
            recent_limit: default_recent_limit(),
            theme: default_theme(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            sync_enabled: default_sync_enabled(),
            release_fallback_ms: default_release_fallback_ms(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cubetimer")
            .join("config.toml")
    }

    pub fn hold_duration(&self) -> Duration {
        Duration::from_millis(self.hold_duration_ms)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn release_fallback(&self) -> Duration {
        Duration::from_millis(self.release_fallback_ms)
    }

    /// Clamp values a hand-edited config file may have pushed out of range.
    pub fn validate(&mut self) {
        self.hold_duration_ms = self.hold_duration_ms.min(MAX_HOLD_DURATION_MS);
        self.scramble_length = self
            .scramble_length
            .clamp(MIN_SCRAMBLE_LENGTH, MAX_SCRAMBLE_LENGTH);
        self.sample_interval_ms = self.sample_interval_ms.clamp(1, 1000);
        self.recent_limit = self.recent_limit.clamp(1, 100);
        self.request_timeout_secs = self.request_timeout_secs.clamp(1, 120);
        self.release_fallback_ms = self.release_fallback_ms.clamp(100, 5000);
        if self.puzzle_type.trim().is_empty() {
            self.puzzle_type = default_puzzle_type();
        }
        self.log_level = self.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            self.log_level = default_log_level();
        }
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
    }
}
