//! Single-field updates
//!
//! Clients name the field to change and send an untyped JSON value. That pair is
//! decoded once into a `FieldUpdate`, so everything past the HTTP edge works
//! with typed values.

use serde_json::Value;

use crate::error::{PartError, Result};

use super::part::validate_serial_number;
use super::RobotPart;

/// A change to exactly one field of a robot part
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Name(String),
    SerialNumber(String),
    Manufacturer(String),
    Weight(i32),
    Compatibilities(Vec<String>),
}

impl FieldUpdate {
    // Wire names, matching the camelCase part object keys
    pub const NAME: &'static str = "name";
    pub const SERIAL_NUMBER: &'static str = "serialNumber";
    pub const MANUFACTURER: &'static str = "manufacturer";
    pub const WEIGHT: &'static str = "weight";
    pub const COMPATIBILITIES: &'static str = "compatibilities";

    /// Decode a field name and an untyped value
    ///
    /// Fails with `InvalidArgument` if the field is unknown or the value has
    /// the wrong JSON type for that field.
    pub fn from_field(field: &str, value: Value) -> Result<Self> {
        match field {
            Self::NAME => expect_string(field, value).map(FieldUpdate::Name),
            Self::SERIAL_NUMBER => expect_string(field, value).map(FieldUpdate::SerialNumber),
            Self::MANUFACTURER => expect_string(field, value).map(FieldUpdate::Manufacturer),
            Self::WEIGHT => expect_i32(field, value).map(FieldUpdate::Weight),
            Self::COMPATIBILITIES => {
                expect_strings(field, value).map(FieldUpdate::Compatibilities)
            }
            _ => Err(PartError::InvalidArgument("Unrecognized field.".to_string())),
        }
    }

    /// Wire name of the field this update targets
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldUpdate::Name(_) => Self::NAME,
            FieldUpdate::SerialNumber(_) => Self::SERIAL_NUMBER,
            FieldUpdate::Manufacturer(_) => Self::MANUFACTURER,
            FieldUpdate::Weight(_) => Self::WEIGHT,
            FieldUpdate::Compatibilities(_) => Self::COMPATIBILITIES,
        }
    }

    /// The new value as JSON
    pub fn value(&self) -> Value {
        match self {
            FieldUpdate::Name(s) | FieldUpdate::SerialNumber(s) | FieldUpdate::Manufacturer(s) => {
                Value::String(s.clone())
            }
            FieldUpdate::Weight(w) => Value::from(*w),
            FieldUpdate::Compatibilities(c) => {
                Value::Array(c.iter().cloned().map(Value::String).collect())
            }
        }
    }

    /// Check the new value against the same rules a new part must pass
    pub fn validate(&self) -> Result<()> {
        match self {
            FieldUpdate::SerialNumber(s) => validate_serial_number(s),
            _ => Ok(()),
        }
    }

    /// Write the new value into `part`, leaving every other field alone
    pub fn apply(&self, part: &mut RobotPart) {
        match self {
            FieldUpdate::Name(name) => part.name = name.clone(),
            FieldUpdate::SerialNumber(serial) => part.serial_number = serial.clone(),
            FieldUpdate::Manufacturer(manufacturer) => part.manufacturer = manufacturer.clone(),
            FieldUpdate::Weight(weight) => part.weight = *weight,
            FieldUpdate::Compatibilities(c) => part.compatibilities = c.clone(),
        }
    }
}

fn invalid_value(field: &str) -> PartError {
    PartError::InvalidArgument(format!("Invalid value for field {}.", field))
}

fn expect_string(field: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(invalid_value(field)),
    }
}

fn expect_i32(field: &str, value: Value) -> Result<i32> {
    value
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| invalid_value(field))
}

fn expect_strings(field: &str, value: Value) -> Result<Vec<String>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                _ => Err(invalid_value(field)),
            })
            .collect(),
        _ => Err(invalid_value(field)),
    }
}
