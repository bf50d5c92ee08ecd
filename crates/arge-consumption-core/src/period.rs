//! Period summary responses.
//!
//! Returned by the "list available periods" operation: which monthly
//! periods a billing unit has consumption data for, and when each period
//! was last revised. Consumption may be corrected retroactively, so
//! `updated_at` can move forward for old periods.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::PeriodId;
use crate::reference::BillingUnitReference;
use crate::validate::{FieldPath, ObjectReader, Schema, Violations};

/// One available period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct ConsumptionSummaryPeriod {
    /// The period.
    pub period: PeriodId,

    /// Last time this period's data was revised.
    #[serde(rename = "update")]
    pub updated_at: DateTime<FixedOffset>,
}

impl Schema for ConsumptionSummaryPeriod {
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        let obj = ObjectReader::new(value, path, sink)?;
        let period = obj.required("period", "period", sink);
        let updated_at = obj.required("update", "updatedAt", sink);
        Some(Self {
            period: period?,
            updated_at: updated_at?,
        })
    }
}

/// Available periods of one billing unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct ConsumptionSummaryBillingUnit {
    /// The billing unit.
    pub reference: BillingUnitReference,

    /// Available periods, in the order the API returned them.
    pub periods: Vec<ConsumptionSummaryPeriod>,
}

impl Schema for ConsumptionSummaryBillingUnit {
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        let obj = ObjectReader::new(value, path, sink)?;
        let reference = obj.required("reference", "reference", sink);
        let periods = obj.required("periods", "periods", sink);
        Some(Self {
            reference: reference?,
            periods: periods?,
        })
    }
}

/// Response envelope of the period listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct ConsumptionSummary {
    /// The billing unit and its periods.
    #[serde(rename = "billingunit")]
    pub billing_unit: ConsumptionSummaryBillingUnit,
}

impl ConsumptionSummary {
    /// Iterate over the available period identifiers.
    pub fn period_ids(&self) -> impl Iterator<Item = &PeriodId> {
        self.billing_unit.periods.iter().map(|p| &p.period)
    }

    /// Find the entry for `period`.
    #[must_use]
    pub fn find(&self, period: &PeriodId) -> Option<&ConsumptionSummaryPeriod> {
        self.billing_unit.periods.iter().find(|p| &p.period == period)
    }
}

impl Schema for ConsumptionSummary {
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        let obj = ObjectReader::new(value, path, sink)?;
        let billing_unit = obj.required("billingunit", "billingUnit", sink)?;
        Some(Self { billing_unit })
    }
}

validated_from_json!(
    ConsumptionSummaryPeriod,
    ConsumptionSummaryBillingUnit,
    ConsumptionSummary
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{from_slice, validate, ViolationKind};
    use serde_json::json;

    const SAMPLE: &str = r#"{"billingunit":{"reference":{"mscnumber":"123456789"},"periods":[{"period":"2021-06","update":"2021-07-01T00:00:00Z"}]}}"#;

    #[test]
    fn parses_sample_body() {
        let summary: ConsumptionSummary = from_slice(SAMPLE.as_bytes()).unwrap();
        let unit = &summary.billing_unit;
        assert_eq!(unit.reference.msc_number.as_str(), "123456789");
        assert_eq!(unit.periods.len(), 1);
        assert_eq!(unit.periods[0].period.as_str(), "2021-06");
        assert_eq!(
            unit.periods[0].updated_at,
            DateTime::parse_from_rfc3339("2021-07-01T00:00:00Z").unwrap()
        );
    }

    #[test]
    fn period_missing_leading_zero() {
        let err = validate::<ConsumptionSummary>(&json!({
            "billingunit": {
                "reference": {"mscnumber": "123456789"},
                "periods": [{"period": "2021-6", "update": "2021-07-01T00:00:00Z"}]
            }
        }))
        .unwrap_err();

        assert_eq!(err.len(), 1);
        let violation = err.at("billingUnit.periods[0].period").unwrap();
        assert!(matches!(violation.kind, ViolationKind::Pattern { .. }));
        assert_eq!(violation.value, Some(json!("2021-6")));
    }

    #[test]
    fn collects_violations_across_entries() {
        let err = validate::<ConsumptionSummary>(&json!({
            "billingunit": {
                "reference": {"mscnumber": "1234567890"},
                "periods": [
                    {"period": "2021-06"},
                    {"period": 202107, "update": "2021-08-01T00:00:00Z"}
                ]
            }
        }))
        .unwrap_err();

        let paths: Vec<_> = err.violations().iter().map(|v| v.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "billingUnit.reference.mscNumber",
                "billingUnit.periods[0].updatedAt",
                "billingUnit.periods[1].period",
            ]
        );
    }

    #[test]
    fn missing_envelope() {
        let err = validate::<ConsumptionSummary>(&json!({"billingUnit": {}})).unwrap_err();
        assert_eq!(err.at("billingUnit").unwrap().kind, ViolationKind::Missing);

        let err = validate::<ConsumptionSummary>(&json!([])).unwrap_err();
        assert!(err.at("").is_some());
    }

    #[test]
    fn lookup_helpers() {
        let summary: ConsumptionSummary = from_slice(SAMPLE.as_bytes()).unwrap();
        let june = PeriodId::new("2021-06").unwrap();
        assert_eq!(summary.period_ids().collect::<Vec<_>>(), [&june]);
        assert!(summary.find(&june).is_some());
        assert!(summary.find(&PeriodId::new("2021-07").unwrap()).is_none());
    }

    #[test]
    fn serde_roundtrip_keeps_wire_names() {
        let summary: ConsumptionSummary = serde_json::from_str(SAMPLE).unwrap();
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["billingunit"]["periods"][0]["period"], "2021-06");
        assert!(value["billingunit"]["periods"][0]["update"].is_string());
        assert!(value["billingunit"]["reference"].get("pmnumber").is_none());
    }
}
