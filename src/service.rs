//! Service Module
//!
//! The parts catalog operations, built on a `RecordStore`.
//!
//! ## Responsibilities
//! - Enforce serial-number uniqueness on add and rename
//! - Apply single-field updates without touching other fields
//! - Resolve bounded compatibility lookups
//! - Translate low-level storage faults into `StoreUnavailable`

use std::sync::Arc;

use crate::error::{PartError, Result};
use crate::model::{FieldUpdate, RobotPart};
use crate::store::{RecordStore, RenameOutcome};

/// The parts catalog
///
/// Holds nothing but a handle to the store, so clones are cheap and share
/// the same data. Every operation runs to completion synchronously.
#[derive(Clone)]
pub struct PartsService {
    store: Arc<dyn RecordStore>,
}

impl PartsService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Add a new part
    ///
    /// Fails with `AlreadyExists` if the serial number is taken. The check and
    /// the insert are one store operation.
    pub fn add(&self, part: RobotPart) -> Result<()> {
        part.validate()?;
        let serial_number = part.serial_number.clone();

        if !self.store.insert_if_absent(part).map_err(PartError::into_store_error)? {
            return Err(PartError::AlreadyExists(serial_number));
        }

        tracing::debug!("Added part {}", serial_number);
        Ok(())
    }

    /// Read the part stored under `serial_number`
    pub fn read(&self, serial_number: &str) -> Result<RobotPart> {
        self.store
            .get(serial_number)
            .map_err(PartError::into_store_error)?
            .ok_or_else(|| PartError::NotFound(serial_number.to_string()))
    }

    /// Change one field of the part stored under `serial_number`
    ///
    /// A `SerialNumber` update re-keys the record in a single store operation
    /// and fails with `Conflict` if the new serial number is taken.
    pub fn update(&self, serial_number: &str, update: FieldUpdate) -> Result<()> {
        update.validate()?;

        match &update {
            FieldUpdate::SerialNumber(new_serial) => {
                match self
                    .store
                    .rename(serial_number, new_serial)
                    .map_err(PartError::into_store_error)?
                {
                    RenameOutcome::Renamed => {}
                    RenameOutcome::SourceMissing => {
                        return Err(PartError::NotFound(serial_number.to_string()))
                    }
                    RenameOutcome::TargetExists => {
                        return Err(PartError::Conflict(new_serial.clone()))
                    }
                }
            }
            _ => {
                let found = self
                    .store
                    .update(serial_number, &|part: &mut RobotPart| update.apply(part))
                    .map_err(PartError::into_store_error)?;
                if !found {
                    return Err(PartError::NotFound(serial_number.to_string()));
                }
            }
        }

        tracing::debug!("Updated {} of part {}", update.field_name(), serial_number);
        Ok(())
    }

    /// Delete a part. Deleting an unknown serial number succeeds.
    pub fn delete(&self, serial_number: &str) -> Result<()> {
        self.store.delete(serial_number).map_err(PartError::into_store_error)?;
        tracing::debug!("Deleted part {}", serial_number);
        Ok(())
    }

    /// Every stored part, in store order
    pub fn list_all(&self) -> Result<Vec<RobotPart>> {
        self.store.scan().map_err(PartError::into_store_error)
    }

    /// Parts listed as compatible with `serial_number`
    ///
    /// Only the first `limit` compatibility entries are considered, in the
    /// order the source part lists them. Entries naming unknown parts are
    /// dropped, so the result may be shorter than `limit`.
    pub fn list_compatible(&self, serial_number: &str, limit: usize) -> Result<Vec<RobotPart>> {
        let part = self.read(serial_number)?;

        let count = limit.min(part.compatibilities.len());
        if count == 0 {
            return Ok(Vec::new());
        }

        let keys = &part.compatibilities[..count];
        let parts = self.store.get_many(keys, count).map_err(PartError::into_store_error)?;

        if parts.len() < count {
            tracing::debug!(
                "{} of {} compatibilities of part {} did not resolve",
                count - parts.len(),
                count,
                serial_number
            );
        }
        Ok(parts)
    }
}
