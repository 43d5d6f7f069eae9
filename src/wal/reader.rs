//! WAL Reader
//!
//! Handles reading entries from the WAL file.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::error::{PartError, Result};

use super::entry::{FrameHeader, HEADER_SIZE, MAX_ENTRY_SIZE};
use super::WalEntry;

/// Outcome of reading one frame
pub(crate) enum Frame {
    /// A well-formed entry
    Entry(WalEntry),

    /// A complete frame whose checksum or payload did not verify
    Corrupt(PartError),

    /// Clean end of file, or a torn frame at the tail
    End,

    /// A header whose length no real frame can have; nothing after it can
    /// be framed
    BadLength(u32),
}

/// Reads entries from the WAL file
pub struct WalReader {
    reader: BufReader<File>,

    /// Byte offset just past the last complete frame
    position: u64,
}

impl WalReader {
    /// Open a WAL file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            position: 0,
        })
    }

    /// Read the next entry from the WAL
    ///
    /// Returns `Ok(None)` at end of file, at a partially written tail frame or
    /// at a header with an impossible length, and `WalCorruption` for a
    /// complete frame that fails verification.
    pub fn next_entry(&mut self) -> Result<Option<WalEntry>> {
        match self.read_frame()? {
            Frame::Entry(entry) => Ok(Some(entry)),
            Frame::Corrupt(e) => Err(e),
            Frame::End | Frame::BadLength(_) => Ok(None),
        }
    }

    /// Iterate over all entries
    pub fn entries(self) -> WalIterator {
        WalIterator {
            reader: self,
            done: false,
        }
    }

    /// Byte offset just past the last complete frame read
    pub fn position(&self) -> u64 {
        self.position
    }

    pub(crate) fn read_frame(&mut self) -> Result<Frame> {
        let mut header_bytes = [0u8; HEADER_SIZE];
        if !self.fill(&mut header_bytes)? {
            return Ok(Frame::End);
        }
        let header = FrameHeader::parse(&header_bytes)?;

        if header.len > MAX_ENTRY_SIZE {
            return Ok(Frame::BadLength(header.len));
        }

        let mut payload = vec![0u8; header.len as usize];
        if !self.fill(&mut payload)? {
            return Ok(Frame::End);
        }

        self.position += (HEADER_SIZE + payload.len()) as u64;

        match WalEntry::from_payload(&header, &payload) {
            Ok(entry) => Ok(Frame::Entry(entry)),
            Err(e @ PartError::WalCorruption(_)) => Ok(Frame::Corrupt(e)),
            Err(e) => Err(e),
        }
    }

    /// Fill `buf` completely; `false` if the file ended first
    fn fill(&mut self, buf: &mut [u8]) -> Result<bool> {
        match self.reader.read_exact(buf) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Iterator over WAL entries
///
/// Corrupted frames are yielded as errors and iteration continues; it stops
/// at end of file, a torn tail or an impossible frame length.
pub struct WalIterator {
    reader: WalReader,
    done: bool,
}

impl Iterator for WalIterator {
    type Item = Result<WalEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.read_frame() {
            Ok(Frame::Entry(entry)) => Some(Ok(entry)),
            Ok(Frame::Corrupt(e)) => Some(Err(e)),
            Ok(Frame::End) | Ok(Frame::BadLength(_)) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
