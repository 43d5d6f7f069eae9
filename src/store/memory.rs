//! In-memory record store

use parking_lot::RwLock;

use crate::error::Result;
use crate::model::RobotPart;

use super::{PartIndex, RecordStore, RenameOutcome};

/// Record store that keeps everything in memory
///
/// Readers share the lock; each write holds it exclusively for its whole
/// check-and-apply.
#[derive(Debug, Default)]
pub struct MemoryStore {
    index: RwLock<PartIndex>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.index.read().contains(key))
    }

    fn insert(&self, part: RobotPart) -> Result<()> {
        self.index.write().put(part);
        Ok(())
    }

    fn insert_if_absent(&self, part: RobotPart) -> Result<bool> {
        let mut index = self.index.write();
        if index.contains(&part.serial_number) {
            return Ok(false);
        }
        index.put(part);
        Ok(true)
    }

    fn get(&self, key: &str) -> Result<Option<RobotPart>> {
        Ok(self.index.read().get(key).cloned())
    }

    fn update(&self, key: &str, apply: &dyn Fn(&mut RobotPart)) -> Result<bool> {
        let mut index = self.index.write();
        match index.get_mut(key) {
            Some(part) => {
                apply(part);
                part.serial_number = key.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn rename(&self, from: &str, to: &str) -> Result<RenameOutcome> {
        Ok(self.index.write().rename(from, to))
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.index.write().remove(key);
        Ok(())
    }

    fn scan(&self) -> Result<Vec<RobotPart>> {
        Ok(self.index.read().values().cloned().collect())
    }

    fn get_many(&self, keys: &[String], limit: usize) -> Result<Vec<RobotPart>> {
        Ok(self.index.read().get_many(keys, limit))
    }
}
