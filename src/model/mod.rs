//! Model Module
//!
//! The robot part record and everything that shapes it.
//!
//! ## Contents
//! - `RobotPart`: the sole entity, keyed by serial number
//! - `FieldUpdate`: a typed single-field change, decoded once at the edge

mod part;
mod update;

pub use part::RobotPart;
pub use update::FieldUpdate;
