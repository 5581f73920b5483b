//! Event counters shared by a cache layer and its eviction callback

use std::sync::atomic::{AtomicU64, Ordering};

/// Something a cache layer can count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Lookup answered from the cache
    Hit,
    /// Lookup that fell through to the backing store
    Miss,
    /// Entry written into the cache
    Insert,
    /// Entry that left the cache by any path
    Eviction,
}

impl Event {
    const ALL: [Event; 4] = [Event::Hit, Event::Miss, Event::Insert, Event::Eviction];

    fn slot(self) -> usize {
        self as usize
    }
}

/// Point-in-time copy of [`CacheStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// [`Event::Hit`] count
    pub hits: u64,
    /// [`Event::Miss`] count
    pub misses: u64,
    /// [`Event::Insert`] count
    pub inserts: u64,
    /// [`Event::Eviction`] count
    pub evictions: u64,
}

impl StatsSnapshot {
    /// Lookups of either outcome
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Share of lookups served from the cache, 0 before the first lookup
    pub fn hit_ratio(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            n => self.hits as f64 / n as f64,
        }
    }
}

/// Lock-free [`Event`] counters
#[derive(Debug, Default)]
pub struct CacheStats {
    counters: [AtomicU64; 4],
}

impl CacheStats {
    /// All counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `event`
    pub fn record(&self, event: Event) {
        self.counters[event.slot()].fetch_add(1, Ordering::Relaxed);
    }

    /// Occurrences of `event` since creation or the last reset
    pub fn count(&self, event: Event) -> u64 {
        self.counters[event.slot()].load(Ordering::Relaxed)
    }

    /// Copy every counter
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.count(Event::Hit),
            misses: self.count(Event::Miss),
            inserts: self.count(Event::Insert),
            evictions: self.count(Event::Eviction),
        }
    }

    /// Zero every counter, returning the values they held
    pub fn reset(&self) -> StatsSnapshot {
        let mut taken = [0; 4];
        for event in Event::ALL {
            taken[event.slot()] = self.counters[event.slot()].swap(0, Ordering::Relaxed);
        }
        StatsSnapshot {
            hits: taken[Event::Hit.slot()],
            misses: taken[Event::Miss.slot()],
            inserts: taken[Event::Insert.slot()],
            evictions: taken[Event::Eviction.slot()],
        }
    }
}
