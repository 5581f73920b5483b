//! Certificate storage contract

use chrono::{DateTime, Utc};

use crate::error::Result;

/// Versioned certificate file store
///
/// Each id has at most one live version. A request for version `t` is
/// satisfied by any stored version at `t` or later.
pub trait Storage: Send + Sync {
    /// Store version `timestamp` of certificate `id`
    ///
    /// Does nothing if an equal or newer version is already stored. Returns
    /// whether this version was stored.
    fn add(&self, id: &str, cert: &[u8], timestamp: DateTime<Utc>) -> Result<bool>;

    /// Fetch the stored version of `id` if it is at least `timestamp`
    fn get(&self, id: &str, timestamp: DateTime<Utc>) -> Result<Vec<u8>>;

    /// Drop the stored version of `id` if it is not newer than `timestamp`
    fn delete(&self, id: &str, timestamp: DateTime<Utc>);

    /// Whether a version of `id` at least as new as `timestamp` is stored
    fn exists(&self, id: &str, timestamp: DateTime<Utc>) -> bool;

    /// Rebuild in-memory state from the backing medium
    fn load(&self) -> Result<()>;
}

/// Whether a stored version satisfies a request for `requested`
pub(crate) fn is_fresh(stored: DateTime<Utc>, requested: DateTime<Utc>) -> bool {
    stored >= requested
}
