//! Write-Ahead Log (WAL) Module
//!
//! Provides durability for the part store through append-only logging.
//!
//! ## Responsibilities
//! - Append a log entry before any store mutation becomes visible
//! - CRC32 checksums for corruption detection
//! - Log Sequence Numbers (LSN) for ordering
//! - Crash recovery and replay
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Entry 1                                 │
//! │ ┌─────────┬─────────┬────────┬────────┐ │
//! │ │ LSN (8) │ CRC (4) │Len (4) │ Data   │ │
//! │ └─────────┴─────────┴────────┴────────┘ │
//! ├─────────────────────────────────────────┤
//! │ Entry 2                                 │
//! │ ┌─────────┬─────────┬────────┬────────┐ │
//! │ │ LSN (8) │ CRC (4) │Len (4) │ Data   │ │
//! │ └─────────┴─────────┴────────┴────────┘ │
//! └─────────────────────────────────────────┘
//! ```
//!
//! `Data` is the bincode encoding of the whole `WalEntry`.

mod entry;
mod writer;
mod reader;
mod recovery;

pub use entry::{WalEntry, Operation, HEADER_SIZE, MAX_ENTRY_SIZE};
pub use writer::{WalFile, WalWriter};
pub use reader::{WalReader, WalIterator};
pub use recovery::{WalRecovery, RecoveryResult};
