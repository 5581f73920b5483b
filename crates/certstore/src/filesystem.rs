//! File-backed certificate storage
//!
//! The LRU cache is the only index of which files exist. Every version that
//! leaves the cache (replacement, explicit delete, capacity eviction) has its
//! file removed by the eviction callback, so the directory and the index
//! never drift apart while the process runs. [`FileSystem::load`] rebuilds the
//! index after a restart.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use certcache::{hash_string, Cache, CacheStats, Event, SafeCache, Sizeable};

use crate::error::{Error, Result};
use crate::filename::{from_file_name, to_file_name};
use crate::storage::{is_fresh, Storage};

/// Configuration for [`FileSystem`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemConfig {
    /// Directory holding the certificate files
    pub root: PathBuf,
    /// Byte budget for stored files; 0 means unbounded
    pub capacity: u64,
}

impl FileSystemConfig {
    /// Unbounded storage rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            capacity: 0,
        }
    }

    /// Limit the total size of stored files
    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Index entry pointing at one stored version
#[derive(Debug, Clone, PartialEq)]
struct CertLink {
    path: PathBuf,
    timestamp: DateTime<Utc>,
    size: u64,
}

impl Sizeable for CertLink {
    fn size(&self) -> u64 {
        self.size
    }
}

/// A file the eviction callback failed to delete
#[derive(Debug)]
pub struct EvictionFailure {
    /// File that is now orphaned on disk
    pub path: PathBuf,
    /// Error returned by the delete attempt
    pub error: io::Error,
}

/// Certificate storage on the local file system
pub struct FileSystem {
    root: PathBuf,
    index: SafeCache<u32, CertLink>,
    stats: Arc<CacheStats>,
    failures: Arc<Mutex<Vec<EvictionFailure>>>,
}

impl FileSystem {
    /// Open storage rooted at `config.root`, creating the directory if needed
    ///
    /// The index starts empty; call [`Storage::load`] to pick up files from a
    /// previous run.
    pub fn open(config: FileSystemConfig) -> Result<Self> {
        if let Err(e) = fs::create_dir_all(&config.root) {
            error!(
                root = %config.root.display(),
                error = %e,
                "Failed to initialize file system storage"
            );
            return Err(e.into());
        }

        let stats = Arc::new(CacheStats::new());
        let failures = Arc::new(Mutex::new(Vec::new()));

        let evicted_stats = Arc::clone(&stats);
        let evicted_failures = Arc::clone(&failures);
        let on_evict = move |_key: u32, link: CertLink| {
            evicted_stats.record(Event::Eviction);
            // Single attempt; failures are surfaced through take_eviction_failures
            match fs::remove_file(&link.path) {
                Ok(()) => debug!(path = %link.path.display(), "Removed evicted certificate file"),
                Err(e) => {
                    warn!(
                        path = %link.path.display(),
                        error = %e,
                        "Failed to remove evicted certificate file"
                    );
                    evicted_failures.lock().push(EvictionFailure {
                        path: link.path,
                        error: e,
                    });
                }
            }
        };
        let index = SafeCache::lru_with_eviction(config.capacity, on_evict);

        Ok(Self {
            root: config.root,
            index,
            stats,
            failures,
        })
    }

    /// Open unbounded storage rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::open(FileSystemConfig::new(root))
    }

    /// Directory holding the certificate files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Index statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of stored certificates
    pub fn len(&self) -> u64 {
        self.index.len()
    }

    /// Whether no certificate is stored
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Total bytes of stored files
    pub fn size(&self) -> u64 {
        self.index.size()
    }

    /// Change the byte budget, deleting the least recently used files if it shrinks
    pub fn resize(&self, capacity: u64) {
        self.index.resize(capacity);
    }

    /// Drain the files that could not be deleted on eviction
    pub fn take_eviction_failures(&self) -> Vec<EvictionFailure> {
        std::mem::take(&mut *self.failures.lock())
    }

    /// Insert `link` unless an equal or newer version is indexed
    ///
    /// On rejection returns the rejected link and the path of the live version.
    fn index_link(&self, key: u32, link: CertLink) -> Option<(CertLink, PathBuf)> {
        self.index.update(|index| {
            let live = index
                .peek(&key)
                .filter(|current| is_fresh(current.timestamp, link.timestamp))
                .map(|current| current.path.clone());
            match live {
                Some(live) => Some((link, live)),
                None => {
                    index.add(key, link);
                    None
                }
            }
        })
    }

    /// Remove the file of a link that lost against a fresher version
    ///
    /// An equal version shares the live file name and must be kept.
    fn discard_rejected(rejected: &CertLink, live: &Path) {
        if rejected.path == live {
            return;
        }
        debug!(path = %rejected.path.display(), "Removing superseded certificate file");
        if let Err(e) = fs::remove_file(&rejected.path) {
            warn!(
                path = %rejected.path.display(),
                error = %e,
                "Failed to remove superseded certificate file"
            );
        }
    }

    fn load_entry(&self, entry: &fs::DirEntry) -> Result<()> {
        let name = entry.file_name();
        let name = name
            .to_str()
            .ok_or_else(|| Error::InvalidFileName(name.to_string_lossy().into_owned()))?;
        let (id, timestamp) = from_file_name(name)?;
        let size = entry.metadata()?.len();

        let link = CertLink {
            path: self.root.join(name),
            timestamp,
            size,
        };
        if let Some((stale, live)) = self.index_link(hash_string(&id), link) {
            Self::discard_rejected(&stale, &live);
        }
        Ok(())
    }
}

impl Storage for FileSystem {
    fn add(&self, id: &str, cert: &[u8], timestamp: DateTime<Utc>) -> Result<bool> {
        let name = to_file_name(id, timestamp)?;
        let key = hash_string(id);
        if let Some(link) = self.index.peek(&key) {
            if is_fresh(link.timestamp, timestamp) {
                info!(
                    id,
                    requested = %timestamp,
                    stored = %link.timestamp,
                    "Same or newer certificate already stored"
                );
                return Ok(false);
            }
        }

        let path = self.root.join(name);
        if let Err(e) = fs::write(&path, cert) {
            error!(
                id,
                timestamp = %timestamp,
                path = %path.display(),
                error = %e,
                "Failed to store certificate file"
            );
            return Err(e.into());
        }

        let link = CertLink {
            path,
            timestamp,
            size: cert.len() as u64,
        };
        match self.index_link(key, link) {
            None => {
                self.stats.record(Event::Insert);
                Ok(true)
            }
            Some((rejected, live)) => {
                info!(id, requested = %timestamp, "Same or newer certificate stored concurrently");
                Self::discard_rejected(&rejected, &live);
                Ok(false)
            }
        }
    }

    fn get(&self, id: &str, timestamp: DateTime<Utc>) -> Result<Vec<u8>> {
        let key = hash_string(id);
        let link = match self.index.peek(&key) {
            Some(link) if is_fresh(link.timestamp, timestamp) => link,
            _ => {
                self.stats.record(Event::Miss);
                debug!(id, timestamp = %timestamp, "Requested certificate not found");
                return Err(Error::NotFound { id: id.to_string() });
            }
        };

        match fs::read(&link.path) {
            Ok(cert) => {
                self.index.touch(&key);
                self.stats.record(Event::Hit);
                Ok(cert)
            }
            // Evicted by another thread between the lookup and the read
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.stats.record(Event::Miss);
                debug!(id, path = %link.path.display(), "Certificate file removed before read");
                Err(Error::NotFound { id: id.to_string() })
            }
            Err(e) => {
                error!(
                    id,
                    requested = %timestamp,
                    stored = %link.timestamp,
                    path = %link.path.display(),
                    error = %e,
                    "Failed to read certificate file"
                );
                Err(e.into())
            }
        }
    }

    fn delete(&self, id: &str, timestamp: DateTime<Utc>) {
        let key = hash_string(id);
        self.index.update(|index| {
            let outdated = index
                .peek(&key)
                .map_or(false, |link| link.timestamp <= timestamp);
            if outdated {
                index.remove(&key);
            }
        });
    }

    fn exists(&self, id: &str, timestamp: DateTime<Utc>) -> bool {
        self.index
            .peek(&hash_string(id))
            .map_or(false, |link| is_fresh(link.timestamp, timestamp))
    }

    fn load(&self) -> Result<()> {
        let entries = fs::read_dir(&self.root).map_err(|e| {
            error!(root = %self.root.display(), error = %e, "Failed to load file system storage");
            e
        })?;

        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Err(e) = self.load_entry(&entry) {
                error!(
                    root = %self.root.display(),
                    path = %entry.path().display(),
                    error = %e,
                    "Failed to load file system storage"
                );
                return Err(e);
            }
        }

        info!(
            root = %self.root.display(),
            certificates = self.index.len(),
            "Loaded file system storage"
        );
        Ok(())
    }
}
