use reqwest::Url;
use thiserror::Error;

use crate::messages::Locale;

pub const DEFAULT_API_URL: &str = "http://localhost:8081/api/v1/files";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub download: DownloadConfig,
    pub locale: Locale,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint suffix is appended to
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Directory saved files are written into
    pub dir: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            dir: "./downloads".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            download: DownloadConfig::default(),
            locale: Locale::En,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let base_url = std::env::var("FILES_API_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let dir = std::env::var("DOWNLOAD_DIR").unwrap_or_else(|_| "./downloads".to_string());

        let locale = match std::env::var("UI_LOCALE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "ru" => Locale::Ru,
            _ => Locale::En,
        };

        let config = Config {
            api: ApiConfig { base_url },
            download: DownloadConfig { dir },
            locale,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api.base_url).map_err(|e| {
            ConfigError::ValidationError(format!(
                "FILES_API_URL '{}' is not a valid URL: {e}",
                self.api.base_url
            ))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "FILES_API_URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.download.dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "DOWNLOAD_DIR cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
