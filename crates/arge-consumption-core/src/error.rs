//! Error types for the consumption-data API.

use crate::validate::{ValidationFailure, ViolationKind};

/// Result type for consumption-data operations.
pub type Result<T> = std::result::Result<T, ConsumptionError>;

/// Every way a consumption-data operation can fail.
///
/// The first five kinds are derived from the HTTP status code alone.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConsumptionError {
    /// The credentials were rejected (HTTP 401).
    #[error("authorization failure")]
    AuthorizationFailure,

    /// The credentials do not grant access to the requested data (HTTP 403).
    #[error("no permission to the requested data with the given credentials")]
    PermissionDenied,

    /// No data for the given billing unit and/or period (HTTP 404).
    #[error("no data found for the given billing unit and/or period")]
    NotFound,

    /// The metering service failed (HTTP 500).
    #[error("technical error")]
    TechnicalError,

    /// The metering service company does not offer this operation (HTTP 501).
    #[error("operation is not supported by the metering service company")]
    UnsupportedOperation,

    /// A status code the API does not define.
    #[error("unsupported response: HTTP {status}")]
    UnsupportedResponse {
        /// The status code as received.
        status: u16,
        /// The raw body as received.
        body: Vec<u8>,
    },

    /// A 200 response whose body is not JSON or does not match the schema.
    #[error("malformed response:\n{0}")]
    MalformedResponse(#[from] ValidationFailure),

    /// A caller-supplied argument was rejected before any request was sent.
    #[error("invalid argument `{field}`: {reason}")]
    InvalidArgument {
        /// Name of the argument.
        field: &'static str,
        /// The constraint it violated.
        reason: ViolationKind,
    },
}

impl ConsumptionError {
    /// The HTTP status code this error was derived from, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::AuthorizationFailure => Some(401),
            Self::PermissionDenied => Some(403),
            Self::NotFound => Some(404),
            Self::TechnicalError => Some(500),
            Self::UnsupportedOperation => Some(501),
            Self::UnsupportedResponse { status, .. } => Some(*status),
            Self::MalformedResponse(_) | Self::InvalidArgument { .. } => None,
        }
    }

    /// The violations of a malformed response.
    #[must_use]
    pub fn violations(&self) -> Option<&ValidationFailure> {
        match self {
            Self::MalformedResponse(failure) => Some(failure),
            _ => None,
        }
    }
}
