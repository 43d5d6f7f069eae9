//! Store Module
//!
//! Keyed record storage for robot parts, addressed by serial number.
//!
//! ## Responsibilities
//! - Plain keyed access: exists / get / insert / delete / scan / get_many
//! - Conditional writes that close check-then-act races:
//!   `insert_if_absent` and `rename`
//! - In-place field mutation under the store's own write lock
//!
//! ## Implementations
//! - `MemoryStore`: a locked in-memory index, nothing persisted
//! - `DurableStore`: the same index fronted by a write-ahead log and
//!   rebuilt from it on open

mod durable;
mod index;
mod memory;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::model::RobotPart;

pub use durable::DurableStore;
pub use index::PartIndex;
pub use memory::MemoryStore;

/// Outcome of a key rename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The record now lives under the new key
    Renamed,

    /// Nothing is stored under the old key
    SourceMissing,

    /// The new key is taken; nothing changed
    TargetExists,
}

/// Keyed storage backing the parts service
///
/// Every method is a single critical section with respect to other writers.
pub trait RecordStore: Send + Sync {
    /// Whether a record is stored under `key`
    fn exists(&self, key: &str) -> Result<bool>;

    /// Insert or replace the record keyed by `part.serial_number`
    fn insert(&self, part: RobotPart) -> Result<()>;

    /// Insert only if the key is free. Returns `false` if it was taken.
    fn insert_if_absent(&self, part: RobotPart) -> Result<bool>;

    fn get(&self, key: &str) -> Result<Option<RobotPart>>;

    /// Mutate the record under `key` in place. Returns `false` if absent.
    ///
    /// `apply` must not change the serial number; use `rename` for that.
    fn update(&self, key: &str, apply: &dyn Fn(&mut RobotPart)) -> Result<bool>;

    /// Move the record under `from` to `to`, changing its serial number
    fn rename(&self, from: &str, to: &str) -> Result<RenameOutcome>;

    /// Remove the record under `key`; absent keys are not an error
    fn delete(&self, key: &str) -> Result<()>;

    /// Every stored record, in ascending key order
    fn scan(&self) -> Result<Vec<RobotPart>>;

    /// Records for the keys that exist, at most `limit`, in the order the keys
    /// are given. A key repeated in `keys` yields its record once.
    fn get_many(&self, keys: &[String], limit: usize) -> Result<Vec<RobotPart>>;
}

/// Open the store selected by `config`
pub fn open(config: &Config) -> Result<Arc<dyn RecordStore>> {
    if config.in_memory {
        tracing::info!("Using in-memory part store");
        Ok(Arc::new(MemoryStore::new()))
    } else {
        tracing::info!("Using durable part store in {}", config.data_dir.display());
        Ok(Arc::new(DurableStore::open(config)?))
    }
}
