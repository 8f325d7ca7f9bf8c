//! Configuration structures for DigitalOcean API clients.
//!
//! [`ApiConfig`] holds the endpoint and request settings that are safe to serialize.
//! The access token is kept out of it and handed to the transport builder as a
//! [`secrecy::SecretString`].

use crate::client::ClientConfig;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Public API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com/";

/// Environment variable overriding the API endpoint.
pub const ENV_API_URL: &str = "DIGITALOCEAN_API_URL";

/// Environment variable holding the access token.
pub const ENV_TOKEN: &str = "DIGITALOCEAN_TOKEN";

/// Configuration for a DigitalOcean API client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ApiConfig {
    /// API base URL; resource paths such as `v2/droplets` are joined onto it
    #[validate(url)]
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Optional User-Agent override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    crate::client::DEFAULT_TIMEOUT
}

impl ApiConfig {
    /// Create a configuration for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(api_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            api_url: api_url.into(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: None,
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Build a configuration from `DIGITALOCEAN_API_URL`, falling back to the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable holds an invalid URL.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the looked-up URL is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(ENV_API_URL).filter(|value| !value.trim().is_empty()) {
            Some(url) => Self::new(url.trim()),
            None => Ok(Self::default()),
        }
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Override the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// HTTP settings derived from this configuration.
    #[must_use]
    pub const fn http_config(&self) -> ClientConfig {
        ClientConfig::new().with_timeout(self.timeout())
    }

    /// Parse the API URL, making sure it ends with `/` so relative paths join below it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_api_url(&self) -> Result<Url, Error> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| Error::ConfigError(format!("Invalid API URL: {e}")))?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: None,
        }
    }
}
