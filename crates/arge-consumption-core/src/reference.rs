//! References identifying billing units and residential units.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{MscNumber, PmNumber, ResidentialUnitNumber};
use crate::validate::{FieldPath, ObjectReader, Schema, Violations};

/// Identifies a billing unit (a property or building).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct BillingUnitReference {
    /// Identifier assigned by the metering service company.
    #[serde(rename = "mscnumber")]
    pub msc_number: MscNumber,

    /// Identifier assigned by the property manager.
    #[serde(rename = "pmnumber", skip_serializing_if = "Option::is_none")]
    pub pm_number: Option<PmNumber>,
}

impl Schema for BillingUnitReference {
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        let obj = ObjectReader::new(value, path, sink)?;
        let msc_number = obj.required("mscnumber", "mscNumber", sink);
        let pm_number = obj.optional("pmnumber", "pmNumber", sink);
        Some(Self {
            msc_number: msc_number?,
            pm_number: pm_number?,
        })
    }
}

/// Identifies a residential unit within a billing unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct ResidentialUnitReference {
    /// Identifier assigned by the metering service company.
    #[serde(rename = "mscnumber")]
    pub msc_number: ResidentialUnitNumber,

    /// Identifier assigned by the property manager.
    #[serde(rename = "pmnumber", skip_serializing_if = "Option::is_none")]
    pub pm_number: Option<PmNumber>,
}

impl Schema for ResidentialUnitReference {
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        let obj = ObjectReader::new(value, path, sink)?;
        let msc_number = obj.required("mscnumber", "mscNumber", sink);
        let pm_number = obj.optional("pmnumber", "pmNumber", sink);
        Some(Self {
            msc_number: msc_number?,
            pm_number: pm_number?,
        })
    }
}

validated_from_json!(BillingUnitReference, ResidentialUnitReference);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{validate, ViolationKind};
    use serde_json::json;

    #[test]
    fn pm_number_is_optional() {
        let reference: BillingUnitReference = validate(&json!({"mscnumber": "123456789"})).unwrap();
        assert_eq!(reference.msc_number.as_str(), "123456789");
        assert!(reference.pm_number.is_none());

        let reference: BillingUnitReference =
            validate(&json!({"mscnumber": "1", "pmnumber": null})).unwrap();
        assert!(reference.pm_number.is_none());
    }

    #[test]
    fn both_fields_reported_together() {
        let err = validate::<ResidentialUnitReference>(&json!({
            "mscnumber": "00001",
            "pmnumber": "",
        }))
        .unwrap_err();

        assert_eq!(err.len(), 2);
        assert!(matches!(
            err.at("mscNumber").unwrap().kind,
            ViolationKind::Length { max: 4, .. }
        ));
        assert!(matches!(
            err.at("pmNumber").unwrap().kind,
            ViolationKind::Length { min: 1, actual: 0, .. }
        ));
    }

    #[test]
    fn missing_required_field() {
        let err = validate::<BillingUnitReference>(&json!({"pmnumber": "XY-12345-00"})).unwrap_err();
        let violation = err.at("mscNumber").unwrap();
        assert_eq!(violation.kind, ViolationKind::Missing);
        assert!(violation.value.is_none());
    }

    #[test]
    fn serializes_wire_names() {
        let reference: BillingUnitReference =
            serde_json::from_value(json!({"mscnumber": "42", "pmnumber": "XY-1"})).unwrap();
        assert_eq!(
            serde_json::to_value(&reference).unwrap(),
            json!({"mscnumber": "42", "pmnumber": "XY-1"})
        );
    }
}
