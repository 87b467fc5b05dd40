//! Client configuration.
//!
//! The configuration is an explicit value handed to [`crate::Client::new`];
//! nothing is read from process-wide state after construction.
//!
//! ```bash
//! PACKAGECLOUD_URL=https://packagecloud.io   # optional
//! PACKAGECLOUD_TOKEN=api-token
//! PACKAGECLOUD_TIMEOUT_SECS=30               # optional
//! ```
//!
//! The JSON config file (`~/.packagecloud`) uses the same keys:
//!
//! ```json
//! { "url": "https://packagecloud.io", "token": "api-token" }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ClientError, Result};
use crate::validation::{is_blank, validate_service_url};

pub const DEFAULT_SERVICE_URL: &str = "https://packagecloud.io";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// packagecloud API client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every API path is resolved against
    pub service_url: String,
    /// API token, sent as the basic-auth username
    pub token: String,
    /// Per-request timeout
    pub timeout: Duration,
}

/// On-disk shape of the JSON config file.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            token: String::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(service_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create config from environment variables.
    ///
    /// `PACKAGECLOUD_TOKEN` is required; the URL and timeout fall back to
    /// their defaults.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("PACKAGECLOUD_TOKEN")
            .map_err(|_| ClientError::Config("PACKAGECLOUD_TOKEN not set".to_string()))?;

        let service_url =
            std::env::var("PACKAGECLOUD_URL").unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string());

        let timeout = std::env::var("PACKAGECLOUD_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Ok(Self {
            service_url,
            token,
            timeout,
        })
    }

    /// Load a JSON config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }

    fn from_json(data: &[u8]) -> Result<Self> {
        let file: ConfigFile = serde_json::from_slice(data)
            .map_err(|e| ClientError::unmarshal("config file", e, data))?;

        let mut config = Self::default();
        if let Some(url) = file.url {
            config.service_url = url;
        }
        if let Some(token) = file.token {
            config.token = token;
        }
        if let Some(secs) = file.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Builder: set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.token) {
            return Err(ClientError::Config("token must not be empty".to_string()));
        }
        validate_service_url(&self.service_url, "service URL")?;
        if self.timeout.is_zero() {
            return Err(ClientError::Config("timeout must be positive".to_string()));
        }
        Ok(())
    }
}
