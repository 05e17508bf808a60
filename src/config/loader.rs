//! Configuration file loading.

use std::path::{Path, PathBuf};

use super::ClientConfig;

/// Errors reading or parsing a configuration file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for [`ClientConfig`].
    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The user's config file location, when a config directory exists.
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dockhand").join("config.toml"))
}

/// Load configuration from the default location.
///
/// A missing file is not an error; defaults apply.
///
/// # Errors
///
/// Returns [`ConfigError`] when a present file cannot be read or parsed.
pub async fn load() -> Result<ClientConfig, ConfigError> {
    match default_path() {
        Some(path) if path.exists() => load_from(&path).await,
        _ => Ok(ClientConfig::default()),
    }
}

/// Load configuration from an explicit path.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file cannot be read or parsed.
pub async fn load_from(path: &Path) -> Result<ClientConfig, ConfigError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let config = toml::from_str(&raw)?;
    tracing::debug!(path = %path.display(), "loaded client configuration");
    Ok(config)
}
