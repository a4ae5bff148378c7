//! Layered client settings.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. An optional TOML file (`beacon.toml` by default)
//! 3. `BEACON_*` environment variables, e.g. `BEACON_API_URL`

use std::path::{Path, PathBuf};
use std::time::Duration;

use beacon_application::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::adapters::DEFAULT_USER_AGENT;
use crate::persistence::FileCredentialStorage;

/// Settings file looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "beacon.toml";

/// Prefix of the environment overrides.
pub const ENV_PREFIX: &str = "BEACON";

/// Error type for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A source could not be read or a value has the wrong type.
    #[error("invalid settings: {0}")]
    Config(#[from] config::ConfigError),

    /// The API URL is not absolute.
    #[error("invalid api_url {url:?}: {message}")]
    InvalidUrl {
        /// The configured value.
        url: String,
        /// Parser message.
        message: String,
    },

    /// No credentials path was configured and there is no config directory.
    #[error("could not determine config directory for credentials")]
    NoConfigDir,
}

/// Resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// API root, e.g. `http://localhost:8080/api/v1`.
    pub api_url: String,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
    /// Where credentials are stored. Defaults to the config directory.
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
    /// `User-Agent` header.
    pub user_agent: String,
}

impl Settings {
    /// Loads settings from defaults, `beacon.toml` and the process environment.
    ///
    /// # Errors
    /// Returns an error if a source is malformed.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(Some(Path::new(DEFAULT_SETTINGS_FILE)), None)
    }

    /// Loads settings from an optional file and an environment map.
    ///
    /// `env` replaces the process environment when given.
    ///
    /// # Errors
    /// Returns an error if a source is malformed.
    pub fn load_from(
        file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, SettingsError> {
        let timeout_secs = i64::try_from(DEFAULT_TIMEOUT.as_secs()).unwrap_or(i64::MAX);
        let mut builder = Config::builder()
            .set_default("api_url", DEFAULT_BASE_URL)?
            .set_default("timeout_secs", timeout_secs)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?;

        if let Some(file) = file {
            builder = builder.add_source(File::from(file).required(false));
        }

        let settings: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        tracing::debug!(api_url = %settings.api_url, timeout_secs = settings.timeout_secs, "Loaded settings");
        Ok(settings)
    }

    /// Builds the API client configuration.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidUrl`] if `api_url` is not absolute.
    pub fn client_config(&self) -> Result<ClientConfig, SettingsError> {
        let base_url = url::Url::parse(&self.api_url).map_err(|e| SettingsError::InvalidUrl {
            url: self.api_url.clone(),
            message: e.to_string(),
        })?;

        Ok(ClientConfig::new(base_url)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_user_agent(self.user_agent.clone()))
    }

    /// The configured credentials path, or the default location.
    ///
    /// # Errors
    /// Returns [`SettingsError::NoConfigDir`] if neither is available.
    pub fn credentials_path(&self) -> Result<PathBuf, SettingsError> {
        self.credentials_path
            .clone()
            .or_else(FileCredentialStorage::default_path)
            .ok_or(SettingsError::NoConfigDir)
    }
}
