//! Core types for the ARGE HeiWaKo consumption-data API.
//!
//! This crate holds everything about the API that does not involve I/O:
//!
//! - **Identifiers**: `MscNumber`, `ResidentialUnitNumber`, `PmNumber`, `PeriodId`, `Year`
//! - **Responses**: `ConsumptionSummary` (available periods) and
//!   `ConsumptionData` (per residential unit consumption of one period)
//! - **Validation**: `Schema`, `validate`, `from_slice`, `ValidationFailure`
//! - **Errors**: `ConsumptionError` and the status code table in `classify_status`
//!
//! # Validation
//!
//! Responses are never deserialized field by field with serde. The body is
//! decoded into a `serde_json::Value` and read through [`Schema`], which
//! records every violated constraint with its path instead of stopping at the
//! first one:
//!
//! ```
//! use arge_consumption_core::{from_slice, ConsumptionSummary};
//!
//! let body = br#"{"billingunit":{"reference":{"mscnumber":"123456789"},
//!     "periods":[{"period":"2021-6","update":"2021-07-01T00:00:00Z"}]}}"#;
//!
//! let failure = from_slice::<ConsumptionSummary>(body).unwrap_err();
//! assert!(failure.at("billingUnit.periods[0].period").is_some());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

/// Implements `TryFrom<serde_json::Value>` through `validate::validate`, so that
/// `#[serde(try_from = "serde_json::Value")]` routes deserialization through
/// the validator.
macro_rules! validated_from_json {
    ($($name:ty),+ $(,)?) => {
        $(
            impl TryFrom<serde_json::Value> for $name {
                type Error = $crate::validate::ValidationFailure;

                fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
                    $crate::validate::validate(&value)
                }
            }
        )+
    };
}

pub mod consumption;
pub mod error;
pub mod ids;
pub mod period;
pub mod reference;
pub mod status;
pub mod validate;

pub use consumption::{
    Benchmark, Consumption, ConsumptionData, ConsumptionDataBillingUnit,
    ConsumptionDataResidentialUnit, Service, UnitOfMeasure,
};
pub use error::{ConsumptionError, Result};
pub use ids::{MscNumber, PeriodId, PmNumber, ResidentialUnitNumber, Year, PERIOD_PATTERN};
pub use period::{ConsumptionSummary, ConsumptionSummaryBillingUnit, ConsumptionSummaryPeriod};
pub use reference::{BillingUnitReference, ResidentialUnitReference};
pub use status::classify_status;
pub use validate::{from_slice, validate, Schema, ValidationFailure, Violation, ViolationKind};
