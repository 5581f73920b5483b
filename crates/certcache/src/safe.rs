//! Thread-safe wrapper around any [`Cache`] implementation
//!
//! One `parking_lot::RwLock` per instance. Operations that neither create,
//! destroy nor reorder entries take the shared lock; everything else takes the
//! exclusive lock for its whole duration, eviction callbacks included.

use std::hash::Hash;
use std::marker::PhantomData;
use parking_lot::RwLock;

use crate::cache::{Cache, Sizeable};
use crate::lru::LruCache;

/// Cache shareable across threads
///
/// Lookups return clones because references cannot outlive the lock guard.
pub struct SafeCache<K, V, C = LruCache<K, V>> {
    inner: RwLock<C>,
    _marker: PhantomData<fn(K) -> V>,
}

impl<K, V> SafeCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Sizeable + Clone,
{
    /// Thread-safe LRU cache with the given byte capacity (0 = unbounded)
    pub fn lru(capacity: u64) -> Self {
        Self::new(LruCache::new(capacity))
    }

    /// Thread-safe LRU cache with an eviction callback
    pub fn lru_with_eviction<F>(capacity: u64, on_evict: F) -> Self
    where
        F: FnMut(K, V) + Send + Sync + 'static,
    {
        Self::new(LruCache::with_eviction(capacity, on_evict))
    }
}

impl<K, V, C> SafeCache<K, V, C>
where
    V: Sizeable + Clone,
    C: Cache<K, V>,
{
    /// Wrap an existing cache
    pub fn new(cache: C) -> Self {
        Self {
            inner: RwLock::new(cache),
            _marker: PhantomData,
        }
    }

    /// Unwrap the inner cache
    pub fn into_inner(self) -> C {
        self.inner.into_inner()
    }

    /// Run `f` against the inner cache under the exclusive lock
    ///
    /// For compound check-then-act sequences that must not interleave with
    /// other operations on this instance.
    pub fn update<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// See [`Cache::add`]
    pub fn add(&self, key: K, value: V) {
        self.inner.write().add(key, value);
    }

    /// See [`Cache::get`]
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.write().get(key).cloned()
    }

    /// See [`Cache::get_oldest`]
    pub fn get_oldest(&self) -> Option<V> {
        self.inner.write().get_oldest().cloned()
    }

    /// See [`Cache::peek`]
    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.read().peek(key).cloned()
    }

    /// See [`Cache::touch`]
    pub fn touch(&self, key: &K) {
        self.inner.write().touch(key);
    }

    /// See [`Cache::remove`]
    pub fn remove(&self, key: &K) {
        self.inner.write().remove(key);
    }

    /// See [`Cache::remove_oldest`]
    pub fn remove_oldest(&self) {
        self.inner.write().remove_oldest();
    }

    /// See [`Cache::purge`]
    pub fn purge(&self) {
        self.inner.write().purge();
    }

    /// See [`Cache::contains`]
    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    /// See [`Cache::keys`]
    pub fn keys(&self) -> Vec<K> {
        self.inner.read().keys()
    }

    /// See [`Cache::values`]
    pub fn values(&self) -> Vec<V> {
        self.inner.read().values()
    }

    /// See [`Cache::capacity`]
    pub fn capacity(&self) -> u64 {
        self.inner.read().capacity()
    }

    /// See [`Cache::len`]
    pub fn len(&self) -> u64 {
        self.inner.read().len()
    }

    /// See [`Cache::is_empty`]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// See [`Cache::size`]
    pub fn size(&self) -> u64 {
        self.inner.read().size()
    }

    /// See [`Cache::resize`]
    pub fn resize(&self, capacity: u64) {
        self.inner.write().resize(capacity);
    }
}
