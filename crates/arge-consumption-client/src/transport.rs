//! HTTP transport used by the client.
//!
//! The client only ever issues authenticated GET requests, so the transport
//! capability is a single method. Timeouts, TLS and connection reuse belong
//! to the transport; the client adds no blocking points of its own.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

/// Basic authentication credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    user: String,
    password: String,
}

impl BasicCredentials {
    /// Create new credentials.
    #[must_use]
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// The user name.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// The password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Status code and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

/// Errors raised by a transport before a response was received.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The reqwest client failed (connection, TLS, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Any other transport failure, including cancellation.
    #[error("{0}")]
    Other(String),
}

/// Capability to issue an authenticated GET request.
///
/// Implementations must be safe to share between tasks; a single client may
/// run several operations concurrently.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request to `url` with basic authentication.
    ///
    /// Any status code is a successful exchange; only failures to obtain a
    /// response are errors.
    async fn get(&self, url: &Url, auth: &BasicCredentials) -> Result<RawResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(&self, url: &Url, auth: &BasicCredentials) -> Result<RawResponse, TransportError> {
        (**self).get(url, auth).await
    }
}

/// Default transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

    /// Create a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. the TLS
    /// backend fails to initialize).
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Wrap an already configured `reqwest` client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url, auth: &BasicCredentials) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .basic_auth(auth.user(), Some(auth.password()))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse { status, body })
    }
}
