//! Client configuration from flags, environment and the config file.
//!
//! Precedence: flags (and their environment fallbacks, which clap resolves)
//! over the config file over built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use packagecloud_client::ClientConfig;

const CONFIG_FILE_NAME: &str = ".packagecloud";

/// `~/.packagecloud`, if a home directory is known.
fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_FILE_NAME))
}

/// Build the client configuration.
///
/// An explicit `--config` must exist; the default file is optional.
pub fn resolve(
    config_path: Option<&Path>,
    url: Option<String>,
    token: Option<String>,
) -> anyhow::Result<ClientConfig> {
    let mut config = match config_path {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?,
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(path) => ClientConfig::from_file(&path)
                .with_context(|| format!("failed to read config file {}", path.display()))?,
            None => ClientConfig::default(),
        },
    };

    if let Some(url) = url {
        config.service_url = url;
    }
    if let Some(token) = token {
        config.token = token;
    }
    if let Some(timeout) = std::env::var("PACKAGECLOUD_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        config.timeout = std::time::Duration::from_secs(timeout);
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}
