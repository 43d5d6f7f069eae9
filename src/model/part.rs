//! Robot part record

use serde::{Deserialize, Serialize};

use crate::error::{PartError, Result};

/// A robot component record keyed by serial number
///
/// The JSON shape uses camelCase keys (`serialNumber`); unknown keys are ignored
/// on input and every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotPart {
    pub name: String,

    /// Primary key, unique across the store
    pub serial_number: String,

    pub manufacturer: String,

    pub weight: i32,

    /// Serial numbers of parts this one pairs with. Not checked for existence
    /// and not required to be symmetric.
    pub compatibilities: Vec<String>,
}

impl RobotPart {
    pub fn new(
        name: impl Into<String>,
        serial_number: impl Into<String>,
        manufacturer: impl Into<String>,
        weight: i32,
        compatibilities: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            serial_number: serial_number.into(),
            manufacturer: manufacturer.into(),
            weight,
            compatibilities,
        }
    }

    /// Check the fields the store depends on
    pub fn validate(&self) -> Result<()> {
        validate_serial_number(&self.serial_number)
    }
}

/// A serial number is a primary key and must not be empty
pub fn validate_serial_number(serial_number: &str) -> Result<()> {
    if serial_number.is_empty() {
        return Err(PartError::InvalidArgument(
            "Serial number must not be empty.".to_string(),
        ));
    }
    Ok(())
}
