//! WAL-backed record store
//!
//! ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
//!
//! - **Writes**: serialized by the `wal` mutex. A writer checks its condition
//!   against the index, appends to the WAL, then takes the index write lock
//!   only long enough to apply the change.
//! - **Reads**: take the index read lock; they see a change only once it is
//!   both logged and applied.
//!
//! Lock order is always `wal` → `index`.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};

use crate::config::{Config, WalSyncStrategy};
use crate::error::Result;
use crate::model::RobotPart;
use crate::wal::{Operation, WalRecovery, WalWriter};

use super::{PartIndex, RecordStore, RenameOutcome};

/// Record store that logs every mutation before applying it
pub struct DurableStore {
    data_dir: PathBuf,

    sync_strategy: WalSyncStrategy,

    /// Serializes writers; the log itself
    wal: Mutex<WalWriter>,

    index: RwLock<PartIndex>,
}

impl DurableStore {
    const WAL_FILENAME: &'static str = "parts.wal";
    const COMPACT_FILENAME: &'static str = "parts.wal.compact";

    /// Open or create a store in `config.data_dir`
    ///
    /// On startup:
    /// 1. Create the data directory
    /// 2. Recover the WAL (corrupt frames skipped, torn tail truncated)
    /// 3. Replay recovered entries into the index
    /// 4. Compact the WAL down to one entry per live part
    pub fn open(config: &Config) -> Result<Self> {
        Self::open_with(&config.data_dir, config.wal_sync_strategy)
    }

    /// Open with a path (convenience method)
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open_with(path, WalSyncStrategy::EveryWrite)
    }

    fn open_with(data_dir: &Path, sync_strategy: WalSyncStrategy) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        let wal_path = data_dir.join(Self::WAL_FILENAME);

        let (entries, recovery) = WalRecovery::recover(&wal_path)?;
        if recovery.entries_recovered > 0 || recovery.entries_corrupted > 0 {
            tracing::info!(
                "WAL recovery: {} entries recovered, {} corrupted, last_lsn={}",
                recovery.entries_recovered,
                recovery.entries_corrupted,
                recovery.last_lsn
            );
        }

        let mut index = PartIndex::new();
        for entry in &entries {
            index.apply(&entry.operation);
        }

        let store = Self {
            data_dir: data_dir.to_path_buf(),
            sync_strategy,
            wal: Mutex::new(WalWriter::open(&wal_path, sync_strategy)?),
            index: RwLock::new(index),
        };

        if !entries.is_empty() {
            store.compact()?;
        }

        Ok(store)
    }

    /// Rewrite the WAL as one `Put` per live part
    ///
    /// The snapshot is written beside the log and renamed over it, so a crash
    /// mid-compaction leaves the old log intact.
    pub fn compact(&self) -> Result<()> {
        let mut wal = self.wal.lock();
        let snapshot = self.index.read().snapshot();
        let parts = snapshot.len();

        let wal_path = self.wal_path();
        let compact_path = self.data_dir.join(Self::COMPACT_FILENAME);
        if compact_path.exists() {
            fs::remove_file(&compact_path)?;
        }

        {
            let mut compacted = WalWriter::open(
                &compact_path,
                WalSyncStrategy::EveryNEntries { count: usize::MAX },
            )?;
            for operation in snapshot {
                compacted.append(operation)?;
            }
            compacted.sync()?;
        }

        fs::rename(&compact_path, &wal_path)?;
        *wal = WalWriter::open(&wal_path, self.sync_strategy)?;

        tracing::debug!("Compacted WAL to {} parts", parts);
        Ok(())
    }

    /// Flush and fsync any buffered WAL entries
    pub fn sync(&self) -> Result<()> {
        self.wal.lock().sync()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn wal_path(&self) -> PathBuf {
        self.data_dir.join(Self::WAL_FILENAME)
    }

    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    fn log_put(wal: &mut WalWriter, part: &RobotPart) -> Result<u64> {
        wal.append(Operation::Put { part: part.clone() })
    }
}

impl RecordStore for DurableStore {
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.index.read().contains(key))
    }

    fn insert(&self, part: RobotPart) -> Result<()> {
        let mut wal = self.wal.lock();
        Self::log_put(&mut wal, &part)?;
        self.index.write().put(part);
        Ok(())
    }

    fn insert_if_absent(&self, part: RobotPart) -> Result<bool> {
        let mut wal = self.wal.lock();
        if self.index.read().contains(&part.serial_number) {
            return Ok(false);
        }

        Self::log_put(&mut wal, &part)?;
        self.index.write().put(part);
        Ok(true)
    }

    fn get(&self, key: &str) -> Result<Option<RobotPart>> {
        Ok(self.index.read().get(key).cloned())
    }

    fn update(&self, key: &str, apply: &dyn Fn(&mut RobotPart)) -> Result<bool> {
        let mut wal = self.wal.lock();
        let mut part = match self.index.read().get(key) {
            Some(part) => part.clone(),
            None => return Ok(false),
        };
        apply(&mut part);
        part.serial_number = key.to_string();

        Self::log_put(&mut wal, &part)?;
        self.index.write().put(part);
        Ok(true)
    }

    fn rename(&self, from: &str, to: &str) -> Result<RenameOutcome> {
        let mut wal = self.wal.lock();
        let outcome = self.index.read().check_rename(from, to);
        if outcome != RenameOutcome::Renamed || from == to {
            return Ok(outcome);
        }

        wal.append(Operation::Rename {
            from: from.to_string(),
            to: to.to_string(),
        })?;
        Ok(self.index.write().rename(from, to))
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut wal = self.wal.lock();
        if !self.index.read().contains(key) {
            return Ok(());
        }

        wal.append(Operation::Delete {
            key: key.to_string(),
        })?;
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
