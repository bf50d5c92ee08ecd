//! Consumption-data API client implementation.

use std::str::FromStr;
use std::time::Duration;

use arge_consumption_core::{
    classify_status, from_slice, ConsumptionData, ConsumptionError, ConsumptionSummary,
    MscNumber, PeriodId, Schema, ViolationKind,
};
use reqwest::Url;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::transport::{BasicCredentials, ReqwestTransport, Transport};

/// Consumption-data API client.
///
/// Holds only immutable configuration, so one instance can serve concurrent
/// calls as long as the transport can.
#[derive(Debug, Clone)]
pub struct ConsumptionClient<T = ReqwestTransport> {
    transport: T,
    base_url: Url,
    credentials: BasicCredentials,
}

impl ConsumptionClient<ReqwestTransport> {
    /// Create a client using the default `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_seconds))?;
        Self::with_transport(config, transport)
    }

    /// Create a client configured from `HAWEIKO_API_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete or invalid.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<T: Transport> ConsumptionClient<T> {
    /// Create a client on top of a custom transport.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the base URL cannot be
    /// parsed or cannot carry a path.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ClientError::Configuration(format!("invalid base URL {:?}: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Configuration(format!(
                "base URL {:?} cannot carry a path",
                config.base_url
            )));
        }

        Ok(Self {
            transport,
            base_url,
            credentials: config.credentials,
        })
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List the available consumption periods of a billing unit.
    ///
    /// Each period covers one month. Consumption may be corrected
    /// retroactively; the last revision of a period is reported as its
    /// `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsumptionError::InvalidArgument`] without sending a
    /// request if `msc_number` is not 1-9 characters, otherwise the outcome
    /// of the status code table or [`ConsumptionError::MalformedResponse`].
    pub async fn get_periods(&self, msc_number: &str) -> Result<ConsumptionSummary, ClientError> {
        let msc_number: MscNumber = argument("mscNumber", msc_number)?;

        let url = self.endpoint(&[
            "billingunits",
            msc_number.as_str(),
            "consumptions",
            "periods",
        ]);
        self.fetch(url).await
    }

    /// Get the consumption of all residential units of a billing unit for
    /// one period.
    ///
    /// # Errors
    ///
    /// Returns [`ConsumptionError::InvalidArgument`] without sending a
    /// request if `msc_number` is not 1-9 characters or `period` is not
    /// `YYYY-MM`, otherwise the outcome of the status code table or
    /// [`ConsumptionError::MalformedResponse`].
    pub async fn get_consumptions(
        &self,
        msc_number: &str,
        period: &str,
    ) -> Result<ConsumptionData, ClientError> {
        let msc_number: MscNumber = argument("mscNumber", msc_number)?;
        let period: PeriodId = argument("period", period)?;

        let url = self.endpoint(&[
            "billingunits",
            msc_number.as_str(),
            "consumptions",
            "periods",
            period.as_str(),
        ]);
        self.fetch(url).await
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in the constructor: the base URL can carry a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn fetch<R: Schema>(&self, url: Url) -> Result<R, ClientError> {
        tracing::debug!(path = %url.path(), "Requesting consumption data");

        let response = self.transport.get(&url, &self.credentials).await?;

        tracing::debug!(
            path = %url.path(),
            status = response.status,
            body_bytes = response.body.len(),
            "Received consumption data response"
        );

        classify_status(response.status, &response.body)?;
        let parsed = from_slice(&response.body).map_err(ConsumptionError::from)?;
        Ok(parsed)
    }
}

/// Parse a caller-supplied argument with the same rule as the response field.
fn argument<A>(field: &'static str, value: &str) -> Result<A, ConsumptionError>
where
    A: FromStr<Err = ViolationKind>,
{
    value
        .parse()
        .map_err(|reason| ConsumptionError::InvalidArgument { field, reason })
}
