//! In-memory cache of certificate contents in front of any [`Storage`]

use chrono::{DateTime, Utc};
use tracing::debug;

use std::sync::Arc;

use certcache::{
    hash_string, size_of, Cache, CacheConfig, CacheStats, Event, SafeCache, SizeOf, Sizeable,
};

use crate::error::Result;
use crate::storage::{is_fresh, Storage};

/// Cached certificate body tagged with the version it is valid for
#[derive(Debug, Clone)]
struct CertFile {
    file: Vec<u8>,
    timestamp: DateTime<Utc>,
    size: u64,
}

impl CertFile {
    fn new(file: Vec<u8>, timestamp: DateTime<Utc>) -> Self {
        let mut cert = Self {
            file,
            timestamp,
            size: 0,
        };
        cert.size = size_of(&cert);
        cert
    }
}

impl SizeOf for CertFile {
    fn heap_size(&self) -> u64 {
        self.file.heap_size()
    }
}

impl Sizeable for CertFile {
    fn size(&self) -> u64 {
        self.size
    }
}

/// Read/write-through memory cache over a [`Storage`]
///
/// Uses the same staleness rule as the storage itself: a cached body tagged
/// with version `t` answers every request for `t` or earlier.
pub struct CachedStorage<S> {
    storage: S,
    cache: SafeCache<u32, CertFile>,
    stats: Arc<CacheStats>,
}

impl<S: Storage> CachedStorage<S> {
    /// Wrap `storage` with a memory cache sized by `config`
    pub fn new(storage: S, config: CacheConfig) -> Self {
        let stats = Arc::new(CacheStats::new());
        let evicted = Arc::clone(&stats);
        let on_evict = move |_key: u32, _cert: CertFile| evicted.record(Event::Eviction);
        let cache = SafeCache::lru_with_eviction(config.capacity, on_evict);
        Self {
            storage,
            cache,
            stats,
        }
    }

    /// Wrapped storage
    pub fn inner(&self) -> &S {
        &self.storage
    }

    /// Memory cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of cached bodies
    pub fn cached_len(&self) -> u64 {
        self.cache.len()
    }

    /// Bytes charged by cached bodies
    pub fn cached_size(&self) -> u64 {
        self.cache.size()
    }

    /// Drop every cached body; the wrapped storage is untouched
    pub fn clear_cache(&self) {
        self.cache.purge();
        self.stats.reset();
    }

    /// Cache `cert` unless an equal or newer body is already cached
    fn remember(&self, key: u32, cert: CertFile) {
        let inserted = self.cache.update(|cache| {
            let fresher = cache
                .peek(&key)
                .map_or(false, |current| is_fresh(current.timestamp, cert.timestamp));
            if !fresher {
                cache.add(key, cert);
            }
            !fresher
        });
        if inserted {
            self.stats.record(Event::Insert);
        }
    }
}

impl<S: Storage> Storage for CachedStorage<S> {
    fn add(&self, id: &str, cert: &[u8], timestamp: DateTime<Utc>) -> Result<bool> {
        if !self.storage.add(id, cert, timestamp)? {
            return Ok(false);
        }
        self.remember(hash_string(id), CertFile::new(cert.to_vec(), timestamp));
        Ok(true)
    }

    fn get(&self, id: &str, timestamp: DateTime<Utc>) -> Result<Vec<u8>> {
        let key = hash_string(id);
        if let Some(cached) = self.cache.peek(&key) {
            if is_fresh(cached.timestamp, timestamp) {
                self.cache.touch(&key);
                self.stats.record(Event::Hit);
                debug!(id, timestamp = %timestamp, "Storage cache hit");
                return Ok(cached.file);
            }
        }

        self.stats.record(Event::Miss);
        let cert = self.storage.get(id, timestamp)?;
        self.remember(key, CertFile::new(cert.clone(), timestamp));
        Ok(cert)
    }

    fn delete(&self, id: &str, timestamp: DateTime<Utc>) {
        let key = hash_string(id);
        self.cache.update(|cache| {
            let outdated = cache
                .peek(&key)
                .map_or(false, |cached| cached.timestamp <= timestamp);
            if outdated {
                cache.remove(&key);
            }
        });
        self.storage.delete(id, timestamp);
    }

    fn exists(&self, id: &str, timestamp: DateTime<Utc>) -> bool {
        let cached = self
            .cache
            .peek(&hash_string(id))
            .map_or(false, |cached| is_fresh(cached.timestamp, timestamp));
        cached || self.storage.exists(id, timestamp)
    }

    fn load(&self) -> Result<()> {
        self.storage.load()?;
        self.cache.purge();
        Ok(())
    }
}
