//! Part index
//!
//! BTreeMap-based index shared by both store implementations.

use std::collections::{BTreeMap, HashSet};

use crate::model::RobotPart;
use crate::wal::Operation;

use super::RenameOutcome;

/// Ordered map from serial number to part
///
/// Not synchronized; callers wrap it in a lock.
#[derive(Debug, Default, Clone)]
pub struct PartIndex {
    parts: BTreeMap<String, RobotPart>,
}

impl PartIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.parts.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&RobotPart> {
        self.parts.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut RobotPart> {
        self.parts.get_mut(key)
    }

    pub fn put(&mut self, part: RobotPart) {
        self.parts.insert(part.serial_number.clone(), part);
    }

    pub fn remove(&mut self, key: &str) -> Option<RobotPart> {
        self.parts.remove(key)
    }

    /// Check whether `rename(from, to)` would succeed
    pub fn check_rename(&self, from: &str, to: &str) -> RenameOutcome {
        if !self.parts.contains_key(from) {
            RenameOutcome::SourceMissing
        } else if from != to && self.parts.contains_key(to) {
            RenameOutcome::TargetExists
        } else {
            RenameOutcome::Renamed
        }
    }

    pub fn rename(&mut self, from: &str, to: &str) -> RenameOutcome {
        let outcome = self.check_rename(from, to);
        if outcome != RenameOutcome::Renamed || from == to {
            return outcome;
        }

        if let Some(mut part) = self.parts.remove(from) {
            part.serial_number = to.to_string();
            self.parts.insert(to.to_string(), part);
        }
        outcome
    }

    pub fn values(&self) -> impl Iterator<Item = &RobotPart> {
        self.parts.values()
    }

    pub fn get_many(&self, keys: &[String], limit: usize) -> Vec<RobotPart> {
        let mut seen = HashSet::new();
        keys.iter()
            .filter(|key| seen.insert(key.as_str()))
            .filter_map(|key| self.parts.get(key))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Replay a logged operation
    pub fn apply(&mut self, operation: &Operation) {
        match operation {
            Operation::Put { part } => self.put(part.clone()),
            Operation::Delete { key } => {
                self.remove(key);
            }
            Operation::Rename { from, to } => {
                self.rename(from, to);
            }
        }
    }

    /// One `Put` per live record, for compaction
    pub fn snapshot(&self) -> Vec<Operation> {
        self.parts
            .values()
            .map(|part| Operation::Put { part: part.clone() })
            .collect()
    }
}
