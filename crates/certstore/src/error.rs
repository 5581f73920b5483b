//! Error types for certstore

use std::io;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias for certstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for certificate file storage
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No stored version of the certificate is recent enough
    #[error("certificate file not found: {id}")]
    NotFound {
        /// Certificate identifier
        id: String,
    },

    /// Certificate id cannot be encoded in a file name
    #[error("invalid certificate id: {0:?}")]
    InvalidId(String),

    /// A directory entry is not named `<id>_<unix-nanos>.pdf`
    #[error("invalid certificate file name: {0}")]
    InvalidFileName(String),

    /// Timestamp cannot be encoded as nanoseconds since the epoch
    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(DateTime<Utc>),
}

impl Error {
    /// Whether this error means the requested certificate is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
