//! Consumption data responses.
//!
//! Returned by the "consumptions for a period" operation: one entry per
//! residential unit, each carrying the measured values per service and,
//! optionally, benchmark values for comparison.
//!
//! Depending on the contract with the metering service company the data may
//! contain heating in kWh or heat cost units, cooling in kWh, and hot and
//! cold water in m³. Estimated values are flagged; a service whose
//! consumption could not be determined is flagged with `errors` and carries
//! no amount.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::PeriodId;
use crate::reference::{BillingUnitReference, ResidentialUnitReference};
use crate::validate::{read_enum, FieldPath, ObjectReader, Schema, ViolationKind, Violations};

/// The kind of supply a value is measured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Service {
    /// Space heating.
    Heating,
    /// Domestic hot water.
    HotWater,
    /// Cooling.
    Cooling,
    /// Cold water.
    ColdWater,
}

impl Service {
    /// Wire values, in declaration order.
    pub const VALUES: &'static [&'static str] = &["HEATING", "HOT_WATER", "COOLING", "COLD_WATER"];

    /// Get the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Heating => "HEATING",
            Self::HotWater => "HOT_WATER",
            Self::Cooling => "COOLING",
            Self::ColdWater => "COLD_WATER",
        }
    }

    /// Parse a wire value. Matching is case-sensitive.
    #[must_use]
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "HEATING" => Some(Self::Heating),
            "HOT_WATER" => Some(Self::HotWater),
            "COOLING" => Some(Self::Cooling),
            "COLD_WATER" => Some(Self::ColdWater),
            _ => None,
        }
    }
}

impl Schema for Service {
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        read_enum(value, path, sink, Self::VALUES, Self::from_wire)
    }
}

/// Unit a value is measured in.
///
/// Hot and cold water are measured in m³. Heating is measured in heat cost
/// units when heat cost allocators are installed, otherwise in kWh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitOfMeasure {
    /// Kilowatt hours.
    Kwh,
    /// Heat cost units.
    Hcu,
    /// Cubic metres.
    M3,
}

impl UnitOfMeasure {
    /// Wire values, in declaration order.
    pub const VALUES: &'static [&'static str] = &["KWH", "HCU", "M3"];

    /// Get the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kwh => "KWH",
            Self::Hcu => "HCU",
            Self::M3 => "M3",
        }
    }

    /// Parse a wire value. Matching is case-sensitive.
    #[must_use]
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "KWH" => Some(Self::Kwh),
            "HCU" => Some(Self::Hcu),
            "M3" => Some(Self::M3),
            _ => None,
        }
    }
}

impl Schema for UnitOfMeasure {
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        read_enum(value, path, sink, Self::VALUES, Self::from_wire)
    }
}

/// One measured value.
///
/// `amount` is absent exactly when `errors` is set. The fields are private so
/// that this holds for every instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Consumption {
    service: Service,
    #[serde(rename = "unitofmeasure")]
    unit_of_measure: UnitOfMeasure,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<f64>,
    converted: bool,
    estimated: bool,
    errors: bool,
}

impl Consumption {
    /// The service measured.
    #[must_use]
    pub const fn service(&self) -> Service {
        self.service
    }

    /// The unit `amount` is expressed in.
    #[must_use]
    pub const fn unit_of_measure(&self) -> UnitOfMeasure {
        self.unit_of_measure
    }

    /// The consumed amount, `None` if it could not be determined.
    #[must_use]
    pub const fn amount(&self) -> Option<f64> {
        self.amount
    }

    /// True if the amount was converted from another unit, e.g. from heat
    /// cost units to kWh as required by the German heating cost ordinance.
    #[must_use]
    pub const fn is_converted(&self) -> bool {
        self.converted
    }

    /// True if the amount is an estimate.
    #[must_use]
    pub const fn is_estimated(&self) -> bool {
        self.estimated
    }

    /// True if no amount could be determined.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.errors
    }
}

impl Schema for Consumption {
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        let obj = ObjectReader::new(value, path, sink)?;
        let service = obj.required("service", "service", sink);
        let unit_of_measure = obj.required("unitofmeasure", "unitOfMeasure", sink);
        let amount: Option<Option<f64>> = obj.optional("amount", "amount", sink);
        let converted = obj.required("converted", "converted", sink);
        let estimated = obj.required("estimated", "estimated", sink);
        let errors: Option<bool> = obj.required("errors", "errors", sink);

        let mut consistent = true;
        if let (Some(amount), Some(errors)) = (amount, errors) {
            if errors == amount.is_some() {
                let reason = if errors {
                    "amount must be absent when errors is true"
                } else {
                    "amount must be present when errors is false"
                };
                sink.push(
                    path,
                    ViolationKind::Invariant {
                        fields: ["amount", "errors"],
                        reason,
                    },
                    Some(value),
                );
                consistent = false;
            }
        }

        let parsed = Self {
            service: service?,
            unit_of_measure: unit_of_measure?,
            amount: amount?,
            converted: converted?,
            estimated: estimated?,
            errors: errors?,
        };
        consistent.then_some(parsed)
    }
}

/// A reference value to compare consumption against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Benchmark {
    /// The service the benchmark applies to.
    pub service: Service,

    /// The unit `amount` is expressed in.
    #[serde(rename = "unitofmeasure")]
    pub unit_of_measure: UnitOfMeasure,

    /// The benchmark amount.
    pub amount: f64,
}

impl Schema for Benchmark {
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        let obj = ObjectReader::new(value, path, sink)?;
        let service = obj.required("service", "service", sink);
        let unit_of_measure = obj.required("unitofmeasure", "unitOfMeasure", sink);
        let amount = obj.required("amount", "amount", sink);
        Some(Self {
            service: service?,
            unit_of_measure: unit_of_measure?,
            amount: amount?,
        })
    }
}

/// Consumption of one residential unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct ConsumptionDataResidentialUnit {
    /// The residential unit.
    pub reference: ResidentialUnitReference,

    /// Values for the different services. May be empty.
    pub consumptions: Vec<Consumption>,

    /// Benchmarks for the different services, if the provider supplies them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmarks: Option<Vec<Benchmark>>,
}

impl ConsumptionDataResidentialUnit {
    /// Find the consumption recorded for `service`.
    #[must_use]
    pub fn consumption(&self, service: Service) -> Option<&Consumption> {
        self.consumptions.iter().find(|c| c.service == service)
    }
}

impl Schema for ConsumptionDataResidentialUnit {
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        let obj = ObjectReader::new(value, path, sink)?;
        let reference = obj.required("reference", "reference", sink);
        let consumptions = obj.required("consumptions", "consumptions", sink);
        let benchmarks = obj.optional("benchmarks", "benchmarks", sink);
        Some(Self {
            reference: reference?,
            consumptions: consumptions?,
            benchmarks: benchmarks?,
        })
    }
}

/// Consumption of all residential units of a billing unit for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct ConsumptionDataBillingUnit {
    /// The billing unit.
    pub reference: BillingUnitReference,

    /// The period the data covers.
    pub period: PeriodId,

    /// Per residential unit data.
    #[serde(rename = "residentialunits")]
    pub residential_units: Vec<ConsumptionDataResidentialUnit>,
}

impl Schema for ConsumptionDataBillingUnit {
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        let obj = ObjectReader::new(value, path, sink)?;
        let reference = obj.required("reference", "reference", sink);
        let period = obj.required("period", "period", sink);
        let residential_units = obj.required("residentialunits", "residentialUnits", sink);
        Some(Self {
            reference: reference?,
            period: period?,
            residential_units: residential_units?,
        })
    }
}

/// Response envelope of the consumption query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct ConsumptionData {
    /// The billing unit and its residential units.
    #[serde(rename = "billingunit")]
    pub billing_unit: ConsumptionDataBillingUnit,
}

impl Schema for ConsumptionData {
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        let obj = ObjectReader::new(value, path, sink)?;
        let billing_unit = obj.required("billingunit", "billingUnit", sink)?;
        Some(Self { billing_unit })
    }
}

validated_from_json!(
    Consumption,
    Benchmark,
    ConsumptionDataResidentialUnit,
    ConsumptionDataBillingUnit,
    ConsumptionData
);
