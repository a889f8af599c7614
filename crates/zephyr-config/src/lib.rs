use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_ENV: &str = "ZEPHYR_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "zephyr.toml";

const DEFAULT_BASE_URL: &str = "https://zephyr.190304.xyz/api/v1/data";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TTL_SECS: u64 = 300;
const DEFAULT_FORECAST_HOUR: u8 = 1;
const MAX_FORECAST_HOUR: u8 = 23;
const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheConfig {
    pub ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ForecastConfig {
    pub default_hour: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub provider: Option<ProviderConfig>,
    pub cache: Option<CacheConfig>,
    pub forecast: Option<ForecastConfig>,
    pub server: Option<ServerConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppConfig {
    /// Load configuration from the ZEPHYR_CONFIG path (TOML) if present, with reasonable defaults
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        if Path::new(&path).exists() {
            Self::from_path(&path)
        } else {
            Ok(AppConfig::default())
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        Ok(toml::from_str::<AppConfig>(&s)?)
    }

    /// Provider endpoint (default https://zephyr.190304.xyz/api/v1/data)
    pub fn provider_base_url(&self) -> String {
        self.provider
            .as_ref()
            .and_then(|p| p.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn provider_timeout(&self) -> Duration {
        let secs = self
            .provider
            .as_ref()
            .and_then(|p| p.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Cache entry lifetime (default 5 minutes)
    pub fn cache_ttl(&self) -> Duration {
        let secs = self
            .cache
            .as_ref()
            .and_then(|c| c.ttl_secs)
            .unwrap_or(DEFAULT_TTL_SECS);
        Duration::from_secs(secs)
    }

    /// Hour used when a request names none, clamped to 0..=23
    pub fn default_forecast_hour(&self) -> u8 {
        self.forecast
            .as_ref()
            .and_then(|f| f.default_hour)
            .unwrap_or(DEFAULT_FORECAST_HOUR)
            .min(MAX_FORECAST_HOUR)
    }

    /// HTTP bind address (default 0.0.0.0:8080)
    pub fn http_bind(&self) -> String {
        self.server
            .as_ref()
            .and_then(|s| s.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
    }
}
