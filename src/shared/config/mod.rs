//! Client configuration
//!
//! Where the API client sends its requests and where it keeps the bearer
//! token between runs.

use std::path::PathBuf;
use thiserror::Error;

/// Default API base URL
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the REST API, without trailing slash
    pub api_url: String,
    /// Explicit token file; `None` uses the platform config directory
    pub token_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_path: None,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Build from `BLOGIFY_API_URL` and `BLOGIFY_TOKEN_PATH`
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        if let Ok(url) = std::env::var("BLOGIFY_API_URL") {
            builder = builder.api_url(url);
        }
        if let Ok(path) = std::env::var("BLOGIFY_TOKEN_PATH") {
            builder = builder.token_path(path);
        }
        builder.build()
    }

    /// Full URL for an API path such as `/api/auth/login`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    api_url: Option<String>,
    token_path: Option<PathBuf>,
}

impl AppConfigBuilder {
    /// Set the API base URL
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Set the token file location
    pub fn token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = Some(path.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let api_url = self
            .api_url
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(api_url));
        }

        Ok(AppConfig {
            api_url,
            token_path: self.token_path,
        })
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}
