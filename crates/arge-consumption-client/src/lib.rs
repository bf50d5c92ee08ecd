//! ARGE HeiWaKo consumption-data client SDK.
//!
//! Retrieves the available consumption periods of a billing unit and the
//! per residential unit consumption for one period, authenticating with
//! basic credentials issued by the metering service company.
//!
//! # Example
//!
//! ```no_run
//! use arge_consumption_client::{ClientConfig, ConsumptionClient};
//!
//! # async fn example() -> Result<(), arge_consumption_client::ClientError> {
//! let client = ConsumptionClient::new(ClientConfig::new(
//!     "https://msc.example.com/arge/v1",
//!     "property-manager",
//!     "secret",
//! ))?;
//!
//! let summary = client.get_periods("123456789").await?;
//! for period in summary.period_ids() {
//!     let data = client.get_consumptions("123456789", period.as_str()).await?;
//!     println!("{period}: {} residential units", data.billing_unit.residential_units.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Every failure is returned to the caller; nothing is retried or logged
//! as an error by the client.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod config;
mod error;
mod transport;

pub use arge_consumption_core::{
    Benchmark, Consumption, ConsumptionData, ConsumptionDataBillingUnit,
    ConsumptionDataResidentialUnit, ConsumptionError, ConsumptionSummary,
    ConsumptionSummaryBillingUnit, ConsumptionSummaryPeriod, MscNumber, PeriodId, PmNumber,
    ResidentialUnitNumber, Service, UnitOfMeasure, ValidationFailure, Violation, ViolationKind,
};
pub use client::ConsumptionClient;
pub use config::{
    ClientConfig, ENV_API_PASSWORD, ENV_API_TIMEOUT_SECONDS, ENV_API_URL, ENV_API_USER,
};
pub use error::ClientError;
pub use reqwest::Url;
pub use transport::{BasicCredentials, RawResponse, ReqwestTransport, Transport, TransportError};
