//! Path-aware validation of decoded JSON against the response schemas.
//!
//! Every response shape implements [`Schema`]. Reading a value never stops at
//! the first problem: each violated field is recorded in a [`Violations`]
//! sink together with its dotted path and the offending raw value, and the
//! caller gets either a fully populated structure or a [`ValidationFailure`]
//! listing everything that was wrong.
//!
//! Paths use the logical field names of the data model (`billingUnit`,
//! `residentialUnits`, `unitOfMeasure`), not the lowercase wire names.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde_json::{Map, Value};

/// The constraint a field violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// A required field is absent.
    Missing,

    /// The JSON type of the value does not match the field type.
    TypeMismatch {
        /// Expected JSON type.
        expected: &'static str,
        /// Actual JSON type.
        found: &'static str,
    },

    /// A string is shorter or longer than allowed.
    Length {
        /// Minimum length (inclusive).
        min: usize,
        /// Maximum length (inclusive).
        max: usize,
        /// Actual length in characters.
        actual: usize,
    },

    /// A string does not fully match the required pattern.
    Pattern {
        /// The pattern the value must match.
        pattern: &'static str,
    },

    /// A value is not a member of a closed enumeration.
    NotInEnum {
        /// The accepted values.
        allowed: &'static [&'static str],
    },

    /// A number lies outside its declared bounds.
    OutOfRange {
        /// Lower bound (inclusive).
        min: i64,
        /// Upper bound (inclusive).
        max: i64,
    },

    /// A string is not in the expected textual format.
    Format {
        /// Description of the expected format.
        expected: &'static str,
    },

    /// Two individually valid fields contradict each other.
    Invariant {
        /// The fields involved.
        fields: [&'static str; 2],
        /// What the invariant requires.
        reason: &'static str,
    },

    /// The body is not a JSON document at all.
    Decode {
        /// Parser error message.
        message: String,
    },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "required field missing"),
            Self::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {expected}, found {found}")
            }
            Self::Length { min, max, actual } => {
                write!(f, "length {actual} out of [{min},{max}]")
            }
            Self::Pattern { pattern } => write!(f, "pattern mismatch: expected {pattern}"),
            Self::NotInEnum { allowed } => write!(f, "expected one of {{{}}}", allowed.join(",")),
            Self::OutOfRange { min, max } => write!(f, "value out of [{min},{max}]"),
            Self::Format { expected } => write!(f, "invalid format: expected {expected}"),
            Self::Invariant {
                fields: [a, b],
                reason,
            } => write!(f, "invariant violation between `{a}` and `{b}`: {reason}"),
            Self::Decode { message } => write!(f, "invalid JSON: {message}"),
        }
    }
}

impl std::error::Error for ViolationKind {}

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Dotted path to the field, e.g. `billingUnit.periods[0].period`.
    /// Empty for the document root.
    pub path: String,
    /// The constraint that was violated.
    pub kind: ViolationKind,
    /// The offending raw value, absent when the field itself is missing.
    pub value: Option<Value>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.kind)?;
        } else {
            write!(f, "{}: {}", self.path, self.kind)?;
        }
        if let Some(value) = &self.value {
            write!(f, " (got {value})")?;
        }
        Ok(())
    }
}

/// Every violation found while validating one document, in document order.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    violations: Vec<Violation>,
}

impl ValidationFailure {
    /// Returns the number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Always false; kept for API symmetry with [`len`](Self::len).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns all violations.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Find the first violation recorded at `path`.
    #[must_use]
    pub fn at(&self, path: &str) -> Option<&Violation> {
        self.violations.iter().find(|v| v.path == path)
    }

    /// Consumes self and returns the inner Vec.
    #[must_use]
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {v}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// Dotted location of a value inside a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(String);

impl FieldPath {
    /// The document root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of a named child field.
    #[must_use]
    pub fn field(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}.{name}", self.0))
        }
    }

    /// Path of a list element.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// The path as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Collects violations during a single validation pass.
#[derive(Debug, Default)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Record a violation at `path`.
    pub fn push(&mut self, path: &FieldPath, kind: ViolationKind, value: Option<&Value>) {
        self.0.push(Violation {
            path: path.as_str().to_string(),
            kind,
            value: value.cloned(),
        });
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn finish<T>(self, parsed: Option<T>) -> Result<T, ValidationFailure> {
        match parsed {
            Some(value) if self.0.is_empty() => Ok(value),
            // A failed read always records at least one violation.
            _ => Err(ValidationFailure { violations: self.0 }),
        }
    }
}

/// A shape that can be read out of decoded JSON with full diagnostics.
///
/// Implementations must record at least one violation whenever they return
/// `None`.
pub trait Schema: Sized {
    /// Read `value`, recording every violation under `path` into `sink`.
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self>;
}

/// Validate a decoded JSON document.
///
/// # Errors
///
/// Returns every violated constraint if the document does not match `T`.
pub fn validate<T: Schema>(value: &Value) -> Result<T, ValidationFailure> {
    let mut sink = Violations::default();
    let parsed = T::read(value, &FieldPath::root(), &mut sink);
    sink.finish(parsed)
}

/// Decode a raw body as JSON and validate it.
///
/// # Errors
///
/// Returns a single [`ViolationKind::Decode`] violation if the body is not
/// JSON, otherwise every violated constraint of `T`.
pub fn from_slice<T: Schema>(bytes: &[u8]) -> Result<T, ValidationFailure> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| ValidationFailure {
        violations: vec![Violation {
            path: String::new(),
            kind: ViolationKind::Decode {
                message: e.to_string(),
            },
            value: None,
        }],
    })?;
    validate(&value)
}

/// Name of the JSON type of `value`, as used in type-mismatch reports.
#[must_use]
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(value: &Value, expected: &'static str) -> ViolationKind {
    ViolationKind::TypeMismatch {
        expected,
        found: json_type(value),
    }
}

/// Borrow `value` as a string or record a type mismatch.
pub fn expect_str<'a>(value: &'a Value, path: &FieldPath, sink: &mut Violations) -> Option<&'a str> {
    if let Value::String(s) = value {
        Some(s.as_str())
    } else {
        sink.push(path, mismatch(value, "string"), Some(value));
        None
    }
}

/// Check a string length (in characters) against inclusive bounds.
///
/// # Errors
///
/// Returns [`ViolationKind::Length`] when out of bounds.
pub fn check_length(value: &str, min: usize, max: usize) -> Result<(), ViolationKind> {
    let actual = value.chars().count();
    if (min..=max).contains(&actual) {
        Ok(())
    } else {
        Err(ViolationKind::Length { min, max, actual })
    }
}

/// Read a string member of a closed enumeration.
///
/// Matching is exact and case-sensitive.
pub fn read_enum<T>(
    value: &Value,
    path: &FieldPath,
    sink: &mut Violations,
    allowed: &'static [&'static str],
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let s = expect_str(value, path, sink)?;
    let parsed = parse(s);
    if parsed.is_none() {
        sink.push(path, ViolationKind::NotInEnum { allowed }, Some(value));
    }
    parsed
}

/// View over a JSON object that reads named members.
#[derive(Debug)]
pub struct ObjectReader<'a> {
    map: &'a Map<String, Value>,
    path: &'a FieldPath,
}

impl<'a> ObjectReader<'a> {
    /// Borrow `value` as an object or record a type mismatch.
    pub fn new(value: &'a Value, path: &'a FieldPath, sink: &mut Violations) -> Option<Self> {
        if let Value::Object(map) = value {
            Some(Self { map, path })
        } else {
            sink.push(path, mismatch(value, "object"), Some(value));
            None
        }
    }

    /// Read a required member. `wire` is the JSON key, `name` the path segment.
    pub fn required<T: Schema>(&self, wire: &str, name: &str, sink: &mut Violations) -> Option<T> {
        let path = self.path.field(name);
        if let Some(value) = self.map.get(wire) {
            T::read(value, &path, sink)
        } else {
            sink.push(&path, ViolationKind::Missing, None);
            None
        }
    }

    /// Read an optional member. Absence and `null` both yield `Some(None)`.
    pub fn optional<T: Schema>(
        &self,
        wire: &str,
        name: &str,
        sink: &mut Violations,
    ) -> Option<Option<T>> {
        match self.map.get(wire) {
            None | Some(Value::Null) => Some(None),
            Some(value) => T::read(value, &self.path.field(name), sink).map(Some),
        }
    }
}

impl Schema for bool {
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        if let Value::Bool(b) = value {
            Some(*b)
        } else {
            sink.push(path, mismatch(value, "boolean"), Some(value));
            None
        }
    }
}

impl Schema for f64 {
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        if let Some(n) = value.as_f64() {
            Some(n)
        } else {
            sink.push(path, mismatch(value, "number"), Some(value));
            None
        }
    }
}

impl<T: Schema> Schema for Vec<T> {
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        let Value::Array(items) = value else {
            sink.push(path, mismatch(value, "array"), Some(value));
            return None;
        };

        let mut out = Vec::with_capacity(items.len());
        let mut complete = true;
        for (i, item) in items.iter().enumerate() {
            match T::read(item, &path.index(i), sink) {
                Some(parsed) => out.push(parsed),
                None => complete = false,
            }
        }
        complete.then_some(out)
    }
}

/// Timestamps are RFC 3339; a timestamp without an offset is taken as UTC.
impl Schema for DateTime<FixedOffset> {
    fn read(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Self> {
        let s = expect_str(value, path, sink)?;
        let parsed = DateTime::parse_from_rfc3339(s).ok().or_else(|| {
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|naive| naive.and_utc().fixed_offset())
        });
        if parsed.is_none() {
            sink.push(
                path,
                ViolationKind::Format {
                    expected: "RFC 3339 timestamp",
                },
                Some(value),
            );
        }
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_path_formatting() {
        let path = FieldPath::root()
            .field("billingUnit")
            .field("residentialUnits")
            .index(2)
            .field("consumptions")
            .index(0)
            .field("amount");
        assert_eq!(
            path.as_str(),
            "billingUnit.residentialUnits[2].consumptions[0].amount"
        );
    }

    #[test]
    fn no_coercion_between_strings_and_numbers() {
        let err = validate::<f64>(&json!("12.5")).unwrap_err();
        assert_eq!(
            err.violations()[0].kind,
            ViolationKind::TypeMismatch {
                expected: "number",
                found: "string"
            }
        );

        let err = validate::<bool>(&json!(1)).unwrap_err();
        assert!(matches!(
            err.violations()[0].kind,
            ViolationKind::TypeMismatch {
                expected: "boolean",
                ..
            }
        ));
    }

    #[test]
    fn integers_are_numbers() {
        assert_eq!(validate::<f64>(&json!(80)).unwrap(), 80.0);
    }

    #[test]
    fn list_collects_every_bad_element() {
        let err = validate::<Vec<bool>>(&json!([true, "x", false, 3])).unwrap_err();
        let paths: Vec<_> = err.violations().iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, ["[1]", "[3]"]);
    }

    #[test]
    fn timestamps() {
        let ts = validate::<DateTime<FixedOffset>>(&json!("2021-07-01T00:00:00Z")).unwrap();
        assert_eq!(ts.to_rfc3339(), "2021-07-01T00:00:00+00:00");

        let naive = validate::<DateTime<FixedOffset>>(&json!("2021-07-01T12:30:00")).unwrap();
        assert_eq!(naive.offset().local_minus_utc(), 0);

        let err = validate::<DateTime<FixedOffset>>(&json!("yesterday")).unwrap_err();
        assert!(matches!(
            err.violations()[0].kind,
            ViolationKind::Format { .. }
        ));
    }

    #[test]
    fn malformed_json_is_a_decode_violation() {
        let err = from_slice::<bool>(b"{not json").unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(err.violations()[0].path.is_empty());
        assert!(matches!(
            err.violations()[0].kind,
            ViolationKind::Decode { .. }
        ));
    }

    #[test]
    fn display_lists_one_violation_per_line() {
        let err = validate::<Vec<bool>>(&json!([1, 2])).unwrap_err();
        let rendered = err.to_string();
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.contains("[0]: type mismatch: expected boolean, found number (got 1)"));
    }

    #[test]
    fn enum_message_lists_allowed_values() {
        let kind = ViolationKind::NotInEnum {
            allowed: &["KWH", "HCU", "M3"],
        };
        assert_eq!(kind.to_string(), "expected one of {KWH,HCU,M3}");
    }
}
