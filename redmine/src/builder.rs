//!
//! ```rust,ignore
//! // 1. Using the builder with explicit configuration
//! let redmine = Redmine::builder()
//!     .url("https://redmine.example.com/")
//!     .api_key("your_api_key")
//!     .timeout(30)
//!     .build()
//!     .expect("Failed to create Redmine client");
//!
//! // 2. Using environment variables
//! let redmine = RedmineBuilder::create_from_env()
//!     .expect("Failed to create Redmine client");
//! ```
use crate::endpoint::RedmineEndpoint;
use crate::{http_client, Redmine, RedmineError, DEFAULT_TIMEOUT};
use log::debug;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Error type for `RedmineBuilder` operations
#[derive(Error, Debug)]
pub enum RedmineBuilderError {
    #[error("Environment variable {0} not set")]
    EnvVarNotSet(String),

    #[error("Invalid Redmine URL: {0}")]
    InvalidUrl(#[source] RedmineError),

    #[error("Redmine client initialization error: {0}")]
    ClientInitError(String),

    #[error("Timeout must be positive")]
    InvalidTimeout,
}

/// Names of the environment variables used to configure the Redmine client
pub struct RedmineEnvVars;

impl RedmineEnvVars {
    pub const URL: &'static str = "REDMINE_URL";
    pub const API_KEY: &'static str = "REDMINE_API_KEY";
}

/// Builder for creating Redmine client instances
#[derive(Default)]
pub struct RedmineBuilder {
    url: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
}

impl RedmineBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL of the Redmine server, including any path prefix
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Overrides the default connect and read timeout of 10 seconds
    #[must_use]
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(Duration::from_secs(seconds));
        self
    }

    /// Picks up the url and api key from the environment, if present
    #[must_use]
    pub fn from_env(self) -> Self {
        let mut builder = self;

        if let Ok(url) = env::var(RedmineEnvVars::URL) {
            builder = builder.url(url);
        }
        if let Ok(api_key) = env::var(RedmineEnvVars::API_KEY) {
            builder = builder.api_key(api_key);
        }
        builder
    }

    /// Builds a Redmine client instance with the configured parameters
    ///
    /// # Errors
    /// Fails if the url or api key is missing, the url is invalid or the timeout is zero
    pub fn build(self) -> Result<Redmine, RedmineBuilderError> {
        let url = self
            .url
            .ok_or_else(|| RedmineBuilderError::EnvVarNotSet(RedmineEnvVars::URL.to_string()))?;
        let api_key = self.api_key.ok_or_else(|| {
            RedmineBuilderError::EnvVarNotSet(RedmineEnvVars::API_KEY.to_string())
        })?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(RedmineBuilderError::InvalidTimeout);
        }

        let endpoint =
            RedmineEndpoint::parse(&url, &api_key).map_err(RedmineBuilderError::InvalidUrl)?;
        let client =
            http_client(timeout).map_err(|e| RedmineBuilderError::ClientInitError(e.to_string()))?;

        let redmine = Redmine::with_client(endpoint, client);
        debug!("Created Redmine client: {:?}", redmine.endpoint());

        Ok(redmine)
    }

    /// Convenience method to create a Redmine client from environment variables
    ///
    /// # Errors
    /// See [`RedmineBuilder::build`]
    pub fn create_from_env() -> Result<Redmine, RedmineBuilderError> {
        Self::new().from_env().build()
    }
}

impl Redmine {
    /// Create a Redmine client builder
    #[must_use]
    pub fn builder() -> RedmineBuilder {
        RedmineBuilder::new()
    }
}
