//! Error types for certdb

use thiserror::Error;

use crate::record::RecordKind;

/// Result type alias for certdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by a [`Querier`](crate::Querier)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No record with the given id
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of the missing record
        kind: RecordKind,
        /// Identifier that was looked up
        id: String,
    },

    /// The backing store failed
    #[error("backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Whether this error means the record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
