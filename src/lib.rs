//! # partdb
//!
//! A catalog service for robot parts with:
//! - Serial-number keyed records with uniqueness enforced by the store
//! - Single-field updates, including atomic serial-number renames
//! - Bounded compatibility lookups
//! - Write-Ahead Logging (WAL) for durability and crash recovery
//! - An HTTP/JSON API and a matching client library
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 PartsClient  (reqwest)                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ HTTP / JSON
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 HTTP Server  (axum)                          │
//! │        decode → service call → status code                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   PartsService                               │
//! │     add / read / update / delete / list / compatible         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ RecordStore
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────┐
//!   │ MemoryStore │          │ DurableStore │
//!   │  (RwLock)   │          │  WAL + index │
//!   └─────────────┘          └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod model;
pub mod wal;
pub mod store;
pub mod service;
pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{PartError, Result};
pub use config::Config;
pub use model::{FieldUpdate, RobotPart};
pub use service::PartsService;
pub use client::PartsClient;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of partdb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
