//! Protocol codec
//!
//! JSON decoding of request bodies.

use serde::de::DeserializeOwned;

use crate::error::{PartError, Result};

/// Decode a request body
///
/// Any failure (bad syntax, missing field, wrong type) is a `Protocol` error,
/// which the server answers with 422.
pub fn decode_request<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| PartError::Protocol(e.to_string()))
}
