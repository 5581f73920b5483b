//! Cache configuration

/// Sizing parameters for a cache instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheConfig {
    /// Byte budget for the sum of cached value sizes; 0 means unbounded
    pub capacity: u64,
}

impl CacheConfig {
    /// Unbounded cache
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Cache limited to `capacity` bytes
    pub fn bytes(capacity: u64) -> Self {
        Self { capacity }
    }

    /// Whether the cache never evicts for capacity reasons
    pub fn is_unbounded(&self) -> bool {
        self.capacity == 0
    }
}
