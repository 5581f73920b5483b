//! LRU (Least Recently Used) cache implementation
//!
//! Entries live in a slot arena threaded by a doubly-linked recency list
//! (indices instead of pointers) with a free list of reclaimed slots. Capacity
//! is a byte budget charged by [`Sizeable::size`].

use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;

use crate::cache::{Cache, Sizeable};
use crate::config::CacheConfig;

/// Side effect run once for every entry that leaves the cache.
///
/// Invoked synchronously, before the operation that evicted the entry
/// returns.
pub type EvictionCallback<K, V> = Box<dyn FnMut(K, V) + Send + Sync>;

/// Node in the LRU doubly-linked list
///
/// `prev` points towards the head (newer), `next` towards the tail (older).
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// LRU cache bounded by the total size of its values
pub struct LruCache<K, V> {
    map: HashMap<K, usize, RandomState>,
    nodes: Vec<Option<Node<K, V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    capacity: u64,
    used: u64,
    on_evict: Option<EvictionCallback<K, V>>,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Sizeable,
{
    /// Create a new LRU cache with the given capacity in bytes (0 = unbounded)
    pub fn new(capacity: u64) -> Self {
        Self {
            map: HashMap::with_hasher(RandomState::new()),
            nodes: Vec::new(),
            head: None,
            tail: None,
            free_list: Vec::new(),
            capacity,
            used: 0,
            on_evict: None,
        }
    }

    /// Create a cache that calls `on_evict` for every entry it drops
    pub fn with_eviction<F>(capacity: u64, on_evict: F) -> Self
    where
        F: FnMut(K, V) + Send + Sync + 'static,
    {
        let mut cache = Self::new(capacity);
        cache.on_evict = Some(Box::new(on_evict));
        cache
    }

    /// Create a cache from configuration
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity)
    }

    fn slot(&self, idx: usize) -> Option<&Node<K, V>> {
        self.nodes.get(idx).and_then(|slot| slot.as_ref())
    }

    fn value_at(&self, idx: usize) -> Option<&V> {
        self.slot(idx).map(|node| &node.value)
    }

    fn push_front(&mut self, idx: usize) {
        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = self.head;
        }

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }

        self.unlink(idx);
        self.push_front(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match &self.nodes[idx] {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    /// Detach slot `idx` and fire the eviction callback for it
    fn evict(&mut self, idx: usize) {
        self.unlink(idx);
        let Some(node) = self.nodes[idx].take() else {
            return;
        };
        self.free_list.push(idx);
        self.map.remove(&node.key);
        self.used -= node.value.size();

        if let Some(on_evict) = self.on_evict.as_mut() {
            on_evict(node.key, node.value);
        }
    }

    fn enforce_capacity(&mut self) {
        while self.capacity != 0 && self.used > self.capacity {
            match self.tail {
                Some(tail_idx) => self.evict(tail_idx),
                None => break,
            }
        }
    }

    fn alloc_node(&mut self, node: Node<K, V>) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx] = Some(node);
            idx
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    /// Iterate slots from tail (oldest) to head (newest)
    fn iter_oldest_first(&self) -> impl Iterator<Item = &Node<K, V>> + '_ {
        let mut cursor = self.tail;
        std::iter::from_fn(move || {
            let node = self.slot(cursor?)?;
            cursor = node.prev;
            Some(node)
        })
    }
}

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Sizeable + Clone,
{
    fn add(&mut self, key: K, value: V) {
        if let Some(&idx) = self.map.get(&key) {
            self.evict(idx);
        }

        self.used += value.size();
        let idx = self.alloc_node(Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.push_front(idx);
        self.map.insert(key, idx);

        self.enforce_capacity();
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.move_to_front(idx);
        self.value_at(idx)
    }

    fn get_oldest(&mut self) -> Option<&V> {
        let idx = self.tail?;
        self.move_to_front(idx);
        self.value_at(idx)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.value_at(idx)
    }

    fn touch(&mut self, key: &K) {
        if let Some(&idx) = self.map.get(key) {
            self.move_to_front(idx);
        }
    }

    fn remove(&mut self, key: &K) {
        if let Some(&idx) = self.map.get(key) {
            self.evict(idx);
        }
    }

    fn remove_oldest(&mut self) {
        if let Some(tail_idx) = self.tail {
            self.evict(tail_idx);
        }
    }

    fn purge(&mut self) {
        while let Some(tail_idx) = self.tail {
            self.evict(tail_idx);
        }
        self.nodes.clear();
        self.free_list.clear();
    }

    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn keys(&self) -> Vec<K> {
        self.iter_oldest_first().map(|node| node.key.clone()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter_oldest_first().map(|node| node.value.clone()).collect()
    }

    fn capacity(&self) -> u64 {
        self.capacity
    }

    fn len(&self) -> u64 {
        self.map.len() as u64
    }

    fn size(&self) -> u64 {
        self.used
    }

    fn resize(&mut self, capacity: u64) {
        let old = self.capacity;
        self.capacity = capacity;
        if capacity >= old {
            return;
        }
        self.enforce_capacity();
    }
}
