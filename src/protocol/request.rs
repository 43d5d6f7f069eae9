//! Request definitions
//!
//! JSON bodies sent by clients. Unknown keys are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::model::FieldUpdate;

/// Body of `/read`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadRequest {
    pub serial_number: String,
}

/// Body of `/delete`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    pub serial_number: String,
}

/// Body of `/list-compatible`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCompatibleRequest {
    pub serial_number: String,

    /// Maximum number of compatibility entries to resolve
    pub number: i64,
}

impl ListCompatibleRequest {
    /// The requested limit; negative values mean zero
    pub fn limit(&self) -> usize {
        usize::try_from(self.number.max(0)).unwrap_or(usize::MAX)
    }
}

/// Body of `/update`
///
/// `valueOfField` stays untyped until `into_update` pairs it with the
/// named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub original_serial_number: String,
    pub field_to_update: String,
    pub value_of_field: Value,
}

impl UpdateRequest {
    pub fn new(original_serial_number: impl Into<String>, update: &FieldUpdate) -> Self {
        Self {
            original_serial_number: original_serial_number.into(),
            field_to_update: update.field_name().to_string(),
            value_of_field: update.value(),
        }
    }

    /// Split into the target serial number and a typed update
    pub fn into_update(self) -> Result<(String, FieldUpdate)> {
        let update = FieldUpdate::from_field(&self.field_to_update, self.value_of_field)?;
        Ok((self.original_serial_number, update))
    }
}
