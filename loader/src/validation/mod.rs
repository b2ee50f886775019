//! Field-level validation of raw fleet records.
//!
//! Each vehicle kind has a fixed set of required fields and one numeric
//! field. A record is checked exhaustively: every missing field produces its
//! own [`DataError`], and the numeric check runs independently of the
//! presence check, so a missing numeric field is reported twice.
//!
//! # Presence
//!
//! A field counts as missing when it is *falsy*: absent, `null`, `false`,
//! `0` or `""`. Arrays and objects are always present, even when empty.
//! Note that this flags a legitimate zero (e.g. `"miles": 0`) as missing.
//!
//! # Numeric parsing
//!
//! Numeric fields are read by [`parse_float`], which accepts JSON numbers and
//! strings starting with a decimal number (`"12.5km"` reads as `12.5`).
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use fleet_loader::validation::check_car;
//!
//! let errors = check_car(&json!({ "type": "car", "license": "ABC1" }));
//! // model, latLong, miles, make missing + miles not numeric
//! assert_eq!(errors.len(), 5);
//! ```

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::models::VehicleKind;

// =============================================================================
// Collected errors
// =============================================================================

/// What went wrong with a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DataErrorKind {
    /// A required field was absent or falsy.
    MissingField { field: String },
    /// A numeric field did not start with a number.
    InvalidNumeric { field: String, value: String },
    /// The `type` discriminant was not a known vehicle kind.
    UnknownType { discriminant: String },
    /// Field checks passed but the entity rejected the values.
    Construction { vehicle: VehicleKind, cause: String },
}

/// A problem found in one raw record, kept alongside a copy of the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataError {
    message: String,
    kind: DataErrorKind,
    record: Value,
}

impl DataError {
    pub fn missing_field(field: &str, record: &Value) -> Self {
        Self {
            message: format!("invalid field {}", field),
            kind: DataErrorKind::MissingField {
                field: field.to_string(),
            },
            record: record.clone(),
        }
    }

    pub fn invalid_numeric(rules: &FieldRules, record: &Value) -> Self {
        let value = describe_value(record.get(rules.numeric_field));
        Self {
            message: format!("invalid {} {}", rules.numeric_label, value),
            kind: DataErrorKind::InvalidNumeric {
                field: rules.numeric_field.to_string(),
                value,
            },
            record: record.clone(),
        }
    }

    pub fn unknown_type(record: &Value) -> Self {
        Self {
            message: "Invalid vehicle type".to_string(),
            kind: DataErrorKind::UnknownType {
                discriminant: describe_value(record.get("type")),
            },
            record: record.clone(),
        }
    }

    pub fn construction(vehicle: VehicleKind, cause: impl fmt::Display, record: &Value) -> Self {
        Self {
            message: format!("error loading {}", vehicle),
            kind: DataErrorKind::Construction {
                vehicle,
                cause: cause.to_string(),
            },
            record: record.clone(),
        }
    }

    /// Human-readable message, e.g. `invalid field make`.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &DataErrorKind {
        &self.kind
    }

    /// The raw record that produced this error.
    pub fn record(&self) -> &Value {
        &self.record
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// =============================================================================
// Rules
// =============================================================================

/// Required fields and the numeric field checked for one vehicle kind.
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub required: &'static [&'static str],
    pub numeric_field: &'static str,
    /// Word used in the numeric error message (`invalid <label> <value>`).
    pub numeric_label: &'static str,
}

pub const CAR_RULES: FieldRules = FieldRules {
    required: &["license", "model", "latLong", "miles", "make"],
    numeric_field: "miles",
    numeric_label: "mileage",
};

pub const DRONE_RULES: FieldRules = FieldRules {
    required: &["license", "model", "latLong", "airTimeHours", "base"],
    numeric_field: "airTimeHours",
    numeric_label: "hours",
};

/// Check a record against a rule set, returning every problem found.
pub fn check_record(record: &Value, rules: &FieldRules) -> Vec<DataError> {
    let mut errors: Vec<DataError> = rules
        .required
        .iter()
        .filter(|field| is_falsy(record.get(**field)))
        .map(|field| DataError::missing_field(field, record))
        .collect();

    if parse_float(record.get(rules.numeric_field)).is_none() {
        errors.push(DataError::invalid_numeric(rules, record));
    }

    errors
}

pub fn check_car(record: &Value) -> Vec<DataError> {
    check_record(record, &CAR_RULES)
}

pub fn check_drone(record: &Value) -> Vec<DataError> {
    check_record(record, &DRONE_RULES)
}

// =============================================================================
// Value helpers
// =============================================================================

/// Whether a field value counts as missing.
pub fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Read a float from the leading part of a value.
///
/// Strings are read up to the first character that cannot continue a
/// decimal literal; leading whitespace is skipped. An array reads as its
/// first element. Booleans, `null`, objects and absent values give `None`.
pub fn parse_float(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        Value::Array(items) => parse_float(items.first()),
        _ => None,
    }
}

fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        let inf = if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        return Some(inf);
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Render a field value for an error message.
pub fn describe_value(value: Option<&Value>) -> String {
    match value {
        None => "<missing>".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
