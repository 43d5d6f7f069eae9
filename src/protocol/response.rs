//! Response definitions

use serde::{Deserialize, Serialize};

/// `{message}` body used for acknowledgements and every error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonMessage {
    pub message: String,
}

impl JsonMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The success acknowledgement
    pub fn ok() -> Self {
        Self::new(messages::OK)
    }
}

/// Fixed response messages
pub mod messages {
    pub const OK: &str = "OK";
    pub const UNPROCESSABLE: &str = "Unprocessable Entity";
    pub const ALREADY_EXISTS: &str = "Bad request. Item already exists.";
    pub const SERIAL_CONFLICT: &str = "Bad request. New serial number already exists.";
    pub const BAD_REQUEST_PREFIX: &str = "Bad request.";
    pub const NOT_FOUND: &str = "Item not found.";
    pub const INTERNAL: &str = "Internal Server error";
    pub const TIMED_OUT: &str = "Request timed out";
}
