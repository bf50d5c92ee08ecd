//! Constrained identifier types.
//!
//! Identifiers are validated identically whether they arrive as a caller's
//! request argument or as a field of an API response.
//!
//! # Macro-based ID Types
//!
//! The `bounded_string_type!` macro defines a string newtype whose length is
//! bounded, with parsing, display, serde and [`Schema`] implementations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::validate::{check_length, expect_str, FieldPath, Schema, ViolationKind, Violations};

macro_rules! bounded_string_type {
    ($name:ident, $min:expr, $max:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Minimum length in characters.
            pub const MIN_LEN: usize = $min;
            /// Maximum length in characters.
            pub const MAX_LEN: usize = $max;

            /// Create a new identifier, checking its length.
            ///
            /// # Errors
            ///
            /// Returns [`ViolationKind::Length`] if the value is out of bounds.
            pub fn new(value: impl Into<String>) -> Result<Self, ViolationKind> {
                let value = value.into();
                check_length(&value, Self::MIN_LEN, Self::MAX_LEN)?;
                Ok(Self(value))
            }

            /// Return the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ViolationKind;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ViolationKind;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Schema for $name {
            fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
                let s = expect_str(value, path, sink)?;
                Self::new(s)
                    .map_err(|kind| sink.push(path, kind, Some(value)))
                    .ok()
            }
        }
    };
}

bounded_string_type!(
    MscNumber,
    1,
    9,
    "Billing unit identifier assigned by the metering service company (1-9 characters)."
);
bounded_string_type!(
    ResidentialUnitNumber,
    1,
    4,
    "Residential unit identifier assigned by the metering service company (1-4 characters)."
);
bounded_string_type!(
    PmNumber,
    1,
    20,
    "Billing or residential unit identifier assigned by the property manager (1-20 characters)."
);

/// Pattern every period identifier must fully match.
pub const PERIOD_PATTERN: &str = r"^\d{4}-\d{2}$";

fn period_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // ASCII digits only; `\d` is Unicode-aware by default.
    RE.get_or_init(|| Regex::new(&format!("(?-u){PERIOD_PATTERN}")).expect("valid period regex"))
}

/// A one-month consumption period, written `YYYY-MM`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodId(String);

impl PeriodId {
    /// Create a new period identifier.
    ///
    /// Only the shape is checked; `2021-13` is accepted just as the upstream
    /// API accepts it.
    ///
    /// # Errors
    ///
    /// Returns [`ViolationKind::Pattern`] unless the value matches
    /// [`PERIOD_PATTERN`].
    pub fn new(value: impl Into<String>) -> Result<Self, ViolationKind> {
        let value = value.into();
        if period_regex().is_match(&value) {
            Ok(Self(value))
        } else {
            Err(ViolationKind::Pattern {
                pattern: PERIOD_PATTERN,
            })
        }
    }

    /// Return the period as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The four-digit year part.
    #[must_use]
    pub fn year(&self) -> u16 {
        digits(&self.0[..4])
    }

    /// The two-digit month part.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn month(&self) -> u8 {
        digits(&self.0[5..]) as u8
    }

    /// The year part as a range-checked [`Year`].
    ///
    /// # Errors
    ///
    /// Returns [`ViolationKind::OutOfRange`] for years before 1900.
    pub fn to_year(&self) -> Result<Year, ViolationKind> {
        Year::new(i64::from(self.year()))
    }
}

fn digits(s: &str) -> u16 {
    s.bytes()
        .fold(0, |acc, b| acc * 10 + u16::from(b.wrapping_sub(b'0')))
}

impl FromStr for PeriodId {
    type Err = ViolationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Debug for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeriodId({:?})", self.0)
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PeriodId {
    type Error = ViolationKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PeriodId> for String {
    fn from(id: PeriodId) -> Self {
        id.0
    }
}

impl Schema for PeriodId {
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        let s = expect_str(value, path, sink)?;
        Self::new(s)
            .map_err(|kind| sink.push(path, kind, Some(value)))
            .ok()
    }
}

/// A calendar year in `1900..=9999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Year(u16);

impl Year {
    /// Earliest accepted year.
    pub const MIN: i64 = 1900;
    /// Latest accepted year.
    pub const MAX: i64 = 9999;

    /// Create a new year.
    ///
    /// # Errors
    ///
    /// Returns [`ViolationKind::OutOfRange`] outside `1900..=9999`.
    pub fn new(value: i64) -> Result<Self, ViolationKind> {
        u16::try_from(value)
            .ok()
            .filter(|_| (Self::MIN..=Self::MAX).contains(&value))
            .map(Self)
            .ok_or(ViolationKind::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
            })
    }

    /// Return the numeric year.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<i64> for Year {
    type Error = ViolationKind;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for i64 {
    fn from(year: Year) -> Self {
        i64::from(year.0)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Schema for Year {
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        let Some(n) = value.as_i64() else {
            let found = if value.is_number() {
                "non-integer number"
            } else {
                crate::validate::json_type(value)
            };
            sink.push(
                path,
                ViolationKind::TypeMismatch {
                    expected: "integer",
                    found,
                },
                Some(value),
            );
            return None;
        };
        Self::new(n).map_err(|kind| sink.push(path, kind, Some(value))).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;
    use serde_json::json;

    #[test]
    fn msc_number_length_bounds() {
        assert!(MscNumber::new("1").is_ok());
        assert!(MscNumber::new("123456789").is_ok());
        assert_eq!(
            MscNumber::new("1234567890").unwrap_err(),
            ViolationKind::Length {
                min: 1,
                max: 9,
                actual: 10
            }
        );
        assert!(MscNumber::new("").is_err());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(ResidentialUnitNumber::new("äöüß").is_ok());
        assert!(ResidentialUnitNumber::new("äöüßx").is_err());
    }

    #[test]
    fn pm_number_bounds() {
        assert!(PmNumber::new("XY-12345-00-R1").is_ok());
        assert!(PmNumber::new("x".repeat(21)).is_err());
    }

    #[test]
    fn period_pattern() {
        let period = PeriodId::new("2021-06").unwrap();
        assert_eq!(period.year(), 2021);
        assert_eq!(period.month(), 6);

        for bad in ["2021-6", "2021-6-1", "21-06", "2021/06", " 2021-06", "2021-06\n", "٢٠٢١-٠٦"] {
            assert_eq!(
                PeriodId::new(bad).unwrap_err(),
                ViolationKind::Pattern {
                    pattern: PERIOD_PATTERN
                },
                "{bad:?} must be rejected"
            );
        }
    }

    #[test]
    fn period_serde_json() {
        let period: PeriodId = serde_json::from_str("\"2022-03\"").unwrap();
        assert_eq!(serde_json::to_string(&period).unwrap(), "\"2022-03\"");
        assert!(serde_json::from_str::<PeriodId>("\"2022-3\"").is_err());
    }

    #[test]
    fn schema_reports_path_and_value() {
        let err = validate::<MscNumber>(&json!("")).unwrap_err();
        assert_eq!(err.violations()[0].value, Some(json!("")));

        let err = validate::<MscNumber>(&json!(123_456_789)).unwrap_err();
        assert!(matches!(
            err.violations()[0].kind,
            ViolationKind::TypeMismatch {
                expected: "string",
                found: "number"
            }
        ));
    }

    #[test]
    fn year_range() {
        assert_eq!(Year::new(1900).unwrap().get(), 1900);
        assert!(Year::new(9999).is_ok());
        assert!(Year::new(1899).is_err());
        assert!(Year::new(10_000).is_err());
        assert!(Year::new(-1).is_err());

        assert_eq!(validate::<Year>(&json!(2021)).unwrap().get(), 2021);
        let err = validate::<Year>(&json!(2021.5)).unwrap_err();
        assert!(matches!(
            err.violations()[0].kind,
            ViolationKind::TypeMismatch { .. }
        ));
        let err = validate::<Year>(&json!(1800)).unwrap_err();
        assert_eq!(
            err.violations()[0].kind,
            ViolationKind::OutOfRange {
                min: 1900,
                max: 9999
            }
        );
    }

    #[test]
    fn period_to_year() {
        assert_eq!(PeriodId::new("2021-06").unwrap().to_year().unwrap().get(), 2021);
        assert!(PeriodId::new("0001-01").unwrap().to_year().is_err());
    }
}
