use backend::DEFAULT_API_BASE;
use console::{ConsoleSettings, DEFAULT_POLL_INTERVAL, RefetchMode};
use proto::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Top-level `config.toml` contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend origin and polling behavior.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Console synchronization policy.
    #[serde(default)]
    pub console: ConsoleConfig,
}

/// Backend connection config.
///
/// Configure via `[backend]` in `config.toml` or environment variables:
/// - `CONVOSPHERE_API_BASE`: backend origin (default: `http://localhost:8000`)
/// - `CONVOSPHERE_POLL_INTERVAL_MS`: channel poll period (default: 1500)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend origin every API path is resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Channel pane poll period in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Optional `batch_size` passed on each poll.
    #[serde(default)]
    pub poll_batch_size: Option<u32>,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_ms: default_poll_interval_ms(),
            poll_batch_size: None,
        }
    }
}

/// Console behavior config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// How out-of-order record fetches are applied.
    #[serde(default)]
    pub refetch_mode: RefetchMode,
}

impl Config {
    /// Loads configuration from explicit path, fallback locations, and env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = path.map(|p| p.to_path_buf()).or_else(|| {
            // Look in current dir, then home dir
            let cwd = std::env::current_dir().ok()?.join("config.toml");
            if cwd.exists() {
                return Some(cwd);
            }
            let home_config = Self::home_dir()?.join("config.toml");
            if home_config.exists() {
                return Some(home_config);
            }
            None
        });
        debug!(path = ?config_path, "Config file resolved");

        let mut config = if let Some(path) = config_path {
            let content = std::fs::read_to_string(&path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(|e| ConfigError::Toml(e.to_string()))?
        } else {
            Config::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;

        debug!(
            base_url = %config.backend.base_url,
            poll_interval_ms = config.backend.poll_interval_ms,
            refetch_mode = %config.console.refetch_mode,
            "Config loaded"
        );
        Ok(config)
    }

    /// `~/.convosphere`, when `HOME` is set.
    pub fn home_dir() -> Option<PathBuf> {
        let home = std::env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".convosphere"))
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(base) = std::env::var("CONVOSPHERE_API_BASE")
            && !base.trim().is_empty()
        {
            self.backend.base_url = base.trim().to_string();
        }
        if let Ok(raw) = std::env::var("CONVOSPHERE_POLL_INTERVAL_MS") {
            self.backend.poll_interval_ms =
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| ConfigError::InvalidValue {
                        field: "CONVOSPHERE_POLL_INTERVAL_MS".to_string(),
                        reason: e.to_string(),
                    })?;
        }
        if let Ok(raw) = std::env::var("CONVOSPHERE_REFETCH_MODE") {
            self.console.refetch_mode =
                raw.parse::<RefetchMode>()
                    .map_err(|reason| ConfigError::InvalidValue {
                        field: "CONVOSPHERE_REFETCH_MODE".to_string(),
                        reason,
                    })?;
        }
        Ok(())
    }

    /// Checks that the backend origin is an http(s) URL and polling is enabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("backend.base_url".to_string()));
        }
        let url = reqwest::Url::parse(&self.backend.base_url).map_err(|e| {
            ConfigError::InvalidValue {
                field: "backend.base_url".to_string(),
                reason: e.to_string(),
            }
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "backend.base_url".to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.backend.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "backend.poll_interval_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Settings handed to the console core.
    pub fn console_settings(&self) -> ConsoleSettings {
        ConsoleSettings {
            poll_interval: Duration::from_millis(self.backend.poll_interval_ms),
            refetch_mode: self.console.refetch_mode,
        }
    }
}
