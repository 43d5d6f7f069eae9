//! WAL Writer
//!
//! Handles appending entries to the WAL file.
//!
//! An append either lands whole or not at all: if writing, flushing or
//! syncing a frame fails, the file is cut back to the end of the last good
//! frame before the error is returned. If that rollback fails too, the
//! writer refuses every later append.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use crate::config::WalSyncStrategy;
use crate::error::{PartError, Result};

use super::reader::{Frame, WalReader};
use super::{Operation, WalEntry};

/// File the WAL is written to
///
/// Implemented for `std::fs::File`; other implementations wrap a file to
/// observe or inject I/O failures.
pub trait WalFile: Write + Seek + Send {
    /// Cut or extend the file to `len` bytes
    fn set_len(&mut self, len: u64) -> io::Result<()>;

    /// Flush file contents to stable storage
    fn sync_data(&mut self) -> io::Result<()>;
}

impl WalFile for File {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        File::set_len(self, len)
    }

    fn sync_data(&mut self) -> io::Result<()> {
        File::sync_data(self)
    }
}

/// Writes entries to the WAL file
pub struct WalWriter<F: WalFile = File> {
    /// `None` once a rollback has failed
    writer: Option<BufWriter<F>>,

    /// File length covering exactly the frames appended so far
    committed_len: u64,

    /// LSN assigned to the next appended entry
    next_lsn: u64,

    sync_strategy: WalSyncStrategy,

    /// Entries appended since the last fsync
    unsynced: usize,
}

impl WalWriter<File> {
    /// Open or create a WAL file
    ///
    /// Appends after any existing entries; LSNs continue from the last one
    /// found. Run `WalRecovery::recover` first so a torn tail is already gone.
    pub fn open(path: &Path, sync_strategy: WalSyncStrategy) -> Result<Self> {
        let last_lsn = if path.exists() {
            Self::last_lsn(path)?
        } else {
            0
        };

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path)?;

        Self::from_file(file, last_lsn + 1, sync_strategy)
    }

    fn last_lsn(path: &Path) -> Result<u64> {
        let mut reader = WalReader::open(path)?;
        let mut last = 0;
        loop {
            match reader.read_frame()? {
                Frame::Entry(entry) => last = last.max(entry.lsn),
                Frame::Corrupt(_) => continue,
                Frame::End | Frame::BadLength(_) => return Ok(last),
            }
        }
    }
}

impl<F: WalFile> WalWriter<F> {
    /// Append to an already opened file, starting at `next_lsn`
    pub fn from_file(mut file: F, next_lsn: u64, sync_strategy: WalSyncStrategy) -> Result<Self> {
        let committed_len = file.seek(SeekFrom::End(0))?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            committed_len,
            next_lsn,
            sync_strategy,
            unsynced: 0,
        })
    }

    /// Append an operation to the WAL, returning its LSN
    pub fn append(&mut self, operation: Operation) -> Result<u64> {
        let lsn = self.next_lsn;
        let bytes = WalEntry::new(lsn, operation).serialize()?;

        if let Err(e) = self.write_frame(&bytes) {
            self.rollback();
            return Err(e);
        }

        self.committed_len += bytes.len() as u64;
        self.next_lsn += 1;
        Ok(lsn)
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(Self::failed)?;
        writer.flush()?;
        writer.get_mut().sync_data()?;
        self.unsynced = 0;
        Ok(())
    }

    /// Get the LSN the next append will use
    pub fn current_lsn(&self) -> u64 {
        self.next_lsn
    }

    /// Whether an unrecoverable write failure has disabled this writer
    pub fn is_failed(&self) -> bool {
        self.writer.is_none()
    }

    fn write_frame(&mut self, bytes: &[u8]) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(Self::failed)?;
        writer.write_all(bytes)?;
        writer.flush()?;

        let sync_due = match self.sync_strategy {
            WalSyncStrategy::EveryWrite => true,
            WalSyncStrategy::EveryNEntries { count } => self.unsynced + 1 >= count.max(1),
        };
        if sync_due {
            writer.get_mut().sync_data()?;
            self.unsynced = 0;
        } else {
            self.unsynced += 1;
        }
        Ok(())
    }

    /// Drop buffered bytes and cut the file back to `committed_len`
    fn rollback(&mut self) {
        let Some(writer) = self.writer.take() else {
            return;
        };

        // into_parts hands back the file without flushing the failed frame
        let (mut file, _unwritten) = writer.into_parts();
        let restored = file
            .set_len(self.committed_len)
            .and_then(|()| file.seek(SeekFrom::Start(self.committed_len)))
            .and_then(|_| file.sync_data());

        match restored {
            Ok(()) => {
                tracing::warn!(
                    "WAL append failed; rolled back to byte {}",
                    self.committed_len
                );
                self.writer = Some(BufWriter::new(file));
            }
            Err(e) => {
                tracing::error!(
                    "WAL rollback to byte {} failed, refusing further writes: {}",
                    self.committed_len,
                    e
                );
            }
        }
    }

    fn failed() -> PartError {
        PartError::StoreUnavailable("WAL writer disabled after a failed rollback".to_string())
    }
}
