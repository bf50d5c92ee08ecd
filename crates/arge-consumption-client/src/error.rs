//! Client error types.

use arge_consumption_core::ConsumptionError;

use crate::transport::TransportError;

/// Errors that can occur when using the consumption-data client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The API call failed with one of the documented error kinds.
    #[error(transparent)]
    Api(#[from] ConsumptionError),

    /// No response was received.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// The API error kind, if the failure was an API outcome.
    #[must_use]
    pub fn api(&self) -> Option<&ConsumptionError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}
