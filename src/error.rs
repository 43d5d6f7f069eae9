//! Error types for partdb
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using PartError
pub type Result<T> = std::result::Result<T, PartError>;

/// Unified error type for partdb operations
#[derive(Debug, Error)]
pub enum PartError {
    // -------------------------------------------------------------------------
    // Catalog Errors
    // -------------------------------------------------------------------------
    #[error("No robot part with serial number {0}")]
    NotFound(String),

    #[error("Serial number already exists: {0}")]
    AlreadyExists(String),

    #[error("New serial number already exists: {0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // WAL Errors
    // -------------------------------------------------------------------------
    #[error("WAL corruption detected: {0}")]
    WalCorruption(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Non-success response from a remote server, carrying its message
    #[error("Server responded {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Request timed out")]
    Timeout,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PartError {
    /// Collapse low-level storage failures into `StoreUnavailable`.
    ///
    /// Catalog errors pass through unchanged.
    pub fn into_store_error(self) -> Self {
        match self {
            PartError::Io(_) | PartError::WalCorruption(_) | PartError::Serialization(_) => {
                PartError::StoreUnavailable(self.to_string())
            }
            other => other,
        }
    }
}

impl From<bincode::Error> for PartError {
    fn from(e: bincode::Error) -> Self {
        PartError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for PartError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PartError::Timeout
        } else if e.is_decode() {
            PartError::Protocol(e.to_string())
        } else {
            PartError::Network(e.to_string())
        }
    }
}
