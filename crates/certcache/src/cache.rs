//! Cache contract shared by all cache implementations

/// A value that knows how many bytes it charges against a cache's capacity.
pub trait Sizeable {
    /// Size of the value in bytes.
    fn size(&self) -> u64;
}

/// Operations every cache implementation provides.
///
/// Recency is updated by [`add`](Cache::add), [`get`](Cache::get),
/// [`get_oldest`](Cache::get_oldest) and [`touch`](Cache::touch). Every other
/// read leaves the order untouched.
pub trait Cache<K, V: Sizeable> {
    /// Insert `value` under `key` as the most recently used entry.
    ///
    /// An existing entry for `key` is removed first, so replacement counts as
    /// an eviction of the old value.
    fn add(&mut self, key: K, value: V);

    /// Look up `key` and mark it as most recently used.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Look up the least recently used entry and mark it as most recently used.
    fn get_oldest(&mut self) -> Option<&V>;

    /// Look up `key` without touching recency.
    fn peek(&self, key: &K) -> Option<&V>;

    /// Mark `key` as most recently used. No-op if absent.
    fn touch(&mut self, key: &K);

    /// Remove `key`. No-op if absent.
    fn remove(&mut self, key: &K);

    /// Remove the least recently used entry. No-op if empty.
    fn remove_oldest(&mut self);

    /// Remove every entry.
    fn purge(&mut self);

    /// Whether `key` is present.
    fn contains(&self, key: &K) -> bool;

    /// Keys from least to most recently used.
    fn keys(&self) -> Vec<K>;

    /// Values from least to most recently used.
    fn values(&self) -> Vec<V>;

    /// Capacity in bytes; 0 means unbounded.
    fn capacity(&self) -> u64;

    /// Number of entries.
    fn len(&self) -> u64;

    /// Whether the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of [`Sizeable::size`] over all entries.
    fn size(&self) -> u64;

    /// Change the capacity, evicting the oldest entries if it shrinks.
    fn resize(&mut self, capacity: u64);
}
