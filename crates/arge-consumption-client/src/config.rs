//! Client configuration.

use crate::error::ClientError;
use crate::transport::{BasicCredentials, ReqwestTransport};

/// Environment variable holding the API base URL.
pub const ENV_API_URL: &str = "HAWEIKO_API_URL";
/// Environment variable holding the basic auth user.
pub const ENV_API_USER: &str = "HAWEIKO_API_USER";
/// Environment variable holding the basic auth password.
pub const ENV_API_PASSWORD: &str = "HAWEIKO_API_PASSWORD";
/// Environment variable holding the request timeout in seconds (optional).
pub const ENV_API_TIMEOUT_SECONDS: &str = "HAWEIKO_API_TIMEOUT_SECONDS";

/// Connection settings, fixed for the lifetime of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the API, e.g. `"https://msc.example.com/arge/v1"`.
    pub base_url: String,

    /// Basic auth credentials issued by the metering service company.
    pub credentials: BasicCredentials,

    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl ClientConfig {
    /// Create a configuration with the default timeout.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            credentials: BasicCredentials::new(user, password),
            timeout_seconds: ReqwestTransport::DEFAULT_TIMEOUT_SECONDS,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if a required variable is unset
    /// or empty, or the timeout is not a whole number of seconds.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source using the environment
    /// variable names.
    ///
    /// # Errors
    ///
    /// Same as [`from_env`](Self::from_env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ClientError::Configuration(format!("{key} is not set")))
        };

        let base_url = required(ENV_API_URL)?;
        let user = required(ENV_API_USER)?;
        let password = required(ENV_API_PASSWORD)?;

        let timeout_seconds = match lookup(ENV_API_TIMEOUT_SECONDS) {
            None => ReqwestTransport::DEFAULT_TIMEOUT_SECONDS,
            Some(raw) => raw.trim().parse().map_err(|_| {
                ClientError::Configuration(format!(
                    "{ENV_API_TIMEOUT_SECONDS} must be a whole number of seconds, got {raw:?}"
                ))
            })?,
        };

        Ok(Self::new(base_url, user, password).with_timeout_seconds(timeout_seconds))
    }
}
