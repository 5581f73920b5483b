//! # certstore
//!
//! Versioned certificate file storage.
//!
//! Each certificate id maps to at most one stored version, kept on disk as
//! `<id>_<unix-nanos>.pdf`. A size-bounded LRU cache indexes the files and its
//! eviction callback deletes them, so the byte budget of the cache is the disk
//! budget of the store.
//!
//! ```no_run
//! use certstore::{CachedStorage, FileSystem, Storage};
//! use certcache::CacheConfig;
//! use chrono::Utc;
//!
//! # fn main() -> certstore::Result<()> {
//! let storage = CachedStorage::new(FileSystem::new("/tmp/certs")?, CacheConfig::bytes(64 << 20));
//! storage.load()?;
//!
//! let now = Utc::now();
//! storage.add("a1b2c3", b"%PDF-1.7", now)?;
//! assert_eq!(storage.get("a1b2c3", now)?, b"%PDF-1.7");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod cached;
mod error;
mod filename;
mod filesystem;
mod storage;

pub use cached::CachedStorage;
pub use error::{Error, Result};
pub use filename::{from_file_name, to_file_name, EXTENSION};
pub use filesystem::{EvictionFailure, FileSystem, FileSystemConfig};
pub use storage::Storage;
