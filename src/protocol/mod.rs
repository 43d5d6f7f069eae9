//! Protocol Module
//!
//! Defines the HTTP/JSON contract between client and server.
//!
//! ## Endpoints
//! ```text
//! POST /add              RobotPart                                  → {message}
//! POST /read             {serialNumber}                             → RobotPart
//! POST /update           {originalSerialNumber, fieldToUpdate,
//!                         valueOfField}                             → {message}
//! POST /delete           {serialNumber}                             → {message}
//! GET  /list-all                                                    → [RobotPart]
//! POST /list-compatible  {serialNumber, number}                     → [RobotPart]
//! ```
//!
//! ### Status Codes
//! - 200: OK
//! - 400: domain rejection (duplicate, unknown field, invalid value)
//! - 404: serial number not found
//! - 422: body could not be decoded
//! - 500: storage fault or timeout

mod codec;
mod request;
mod response;

pub use codec::decode_request;
pub use request::{DeleteRequest, ListCompatibleRequest, ReadRequest, UpdateRequest};
pub use response::{messages, JsonMessage};

/// Add a new part
pub const ENDPOINT_ADD: &str = "/add";
/// Read one part by serial number
pub const ENDPOINT_READ: &str = "/read";
/// Change one field of a part
pub const ENDPOINT_UPDATE: &str = "/update";
/// Delete a part
pub const ENDPOINT_DELETE: &str = "/delete";
/// List every part (GET)
pub const ENDPOINT_LIST_ALL: &str = "/list-all";
/// List parts compatible with a given part
pub const ENDPOINT_LIST_COMPATIBLE: &str = "/list-compatible";
