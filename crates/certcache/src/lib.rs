//! # certcache
//!
//! Size-bounded LRU cache used as the caching core for certificate records
//! and certificate files.
//!
//! ## Architecture
//! - **Arena**: slots addressed by index, reclaimed through a free list
//! - **HashMap**: AHash key → slot index lookups (O(1))
//! - **LRU List**: doubly-linked through slot indices, head = newest
//! - **Budget**: capacity counts bytes reported by [`Sizeable`], 0 = unbounded
//! - **Eviction hook**: optional callback fired once per entry that leaves
//! - **Concurrency**: [`SafeCache`] puts any [`Cache`] behind one RwLock
//!
//! ```
//! use certcache::{Cache, LruCache, Sizeable};
//!
//! #[derive(Clone)]
//! struct Blob(Vec<u8>);
//!
//! impl Sizeable for Blob {
//!     fn size(&self) -> u64 {
//!         self.0.len() as u64
//!     }
//! }
//!
//! let mut cache = LruCache::new(4);
//! cache.add("a", Blob(vec![0; 2]));
//! cache.add("b", Blob(vec![0; 2]));
//! cache.add("c", Blob(vec![0; 2]));
//! assert_eq!(cache.keys(), vec!["b", "c"]);
//! ```

#![warn(missing_docs)]

mod cache;
mod config;
mod hash;
mod lru;
mod safe;
mod size;
mod stats;


pub use cache::{Cache, Sizeable};
pub use config::CacheConfig;
pub use hash::hash_string;
pub use lru::{EvictionCallback, LruCache};
pub use safe::SafeCache;
pub use size::{size_of, SizeOf};
pub use stats::{CacheStats, Event, StatsSnapshot};
