//! Client configuration

use std::fmt;
use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Global endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.stadiamaps.com";

/// EU-only endpoint; requests never leave EU data centers
pub const EU_BASE_URL: &str = "https://api-eu.stadiamaps.com";

/// File name (without extension) looked up by [`ClientConfig::load`]
pub const CONFIG_FILE: &str = "stadia";

/// Environment variable prefix (`STADIA_API_KEY`, `STADIA_BASE_URL`, ...)
pub const ENV_PREFIX: &str = "STADIA";

/// Configuration for [`ApiClient::from_config`](crate::ApiClient::from_config)
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every operation path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Total request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// API key, sent as the `api_key` query parameter
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("stadia-client-rs/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
            api_key: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ClientConfig {
    /// Load from an optional `stadia.toml` in the working directory,
    /// overridden by `STADIA_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or a value has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(config::File::with_name(CONFIG_FILE).required(false))
    }

    /// Load from an explicit file, still overridden by the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_sources(config::File::from(path.as_ref()).required(true))
    }

    fn from_sources<S>(file: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Preset for the EU endpoint
    #[must_use]
    pub fn eu() -> Self {
        Self {
            base_url: EU_BASE_URL.to_string(),
            ..Default::default()
        }
    }

    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 5,
            connect_timeout_secs: 2,
            ..Default::default()
        }
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<SecretString>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Check if an API key is configured
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError::Invalid("base_url must not be empty".to_string()));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "connect_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.connect_timeout_secs > self.timeout_secs {
            return Err(ConfigError::Invalid(
                "connect_timeout_secs must not exceed timeout_secs".to_string(),
            ));
        }

        Ok(())
    }
}
