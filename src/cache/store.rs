//! Cache Store Module
//!
//! Main cache engine combining the lookup table with LRU recency tracking and TTL expiration.
//!
//! `CacheStore` is single-threaded; [`crate::Cache`] wraps it behind a lock.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::cache::entry::Entry;
use crate::cache::{CacheStats, RecencyList};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Cache storage with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key to recency-list handle
    index: HashMap<K, usize>,
    /// Entries ordered most to least recently used
    order: RecencyList<Entry<K, V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore holding at most `capacity` entries.
    ///
    /// Fails with [`CacheError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        Ok(Self {
            index: HashMap::with_capacity(capacity),
            order: RecencyList::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Clear ==
    /// Empties both the lookup table and the recency ordering.
    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
        self.debug_check();
    }

    // == Add ==
    /// Stores a permanent key-value pair.
    ///
    /// Overwriting a key that carried a TTL makes it permanent.
    pub fn add(&mut self, key: K, value: V) {
        self.insert(Entry::permanent(key, value));
    }

    /// Stores a key-value pair that expires `ttl` from now.
    ///
    /// A zero TTL stores an entry that is already expired.
    pub fn add_with_ttl(&mut self, key: K, value: V, ttl: Duration) {
        self.add_with_ttl_at(key, value, ttl, Instant::now());
    }

    pub(crate) fn add_with_ttl_at(&mut self, key: K, value: V, ttl: Duration, now: Instant) {
        self.insert(Entry::with_ttl(key, value, ttl, now));
    }

    /// Insert-or-update path shared by both add variants.
    ///
    /// Existing keys are updated in place and promoted. New keys evict the
    /// least recently used entry first when the store is full.
    fn insert(&mut self, entry: Entry<K, V>) {
        if let Some(&idx) = self.index.get(&entry.key) {
            if let Some(slot) = self.order.get_mut(idx) {
                slot.value = entry.value;
                slot.expires_at = entry.expires_at;
            }
            self.order.move_to_front(idx);
            self.debug_check();
            return;
        }

        if self.order.len() >= self.capacity {
            self.evict_oldest();
        }

        let key = entry.key.clone();
        let idx = self.order.push_front(entry);
        self.index.insert(key, idx);
        self.debug_check();
    }

    // == Evict Oldest ==
    fn evict_oldest(&mut self) {
        if let Some(evicted) = self.order.pop_back() {
            self.index.remove(&evicted.key);
            self.stats.record_eviction();
            trace!(capacity = self.capacity, "evicted least recently used entry");
        }
    }

    // == Get ==
    /// Retrieves a value by key, promoting it to most recently used.
    ///
    /// Expired entries are removed on sight and counted as misses.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_at(key, Instant::now())
    }

    pub(crate) fn get_at<Q>(&mut self, key: &Q, now: Instant) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&idx) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        let expired = self
            .order
            .get(idx)
            .map_or(true, |entry| entry.is_expired_at(now));
        if expired {
            self.unlink(key, idx);
            self.stats.record_expiration();
            self.stats.record_miss();
            return None;
        }

        self.order.move_to_front(idx);
        self.stats.record_hit();
        self.order.get(idx).map(|entry| entry.value.clone())
    }

    // == Remove ==
    /// Removes an entry by key. Returns false, changing nothing, if absent.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index.get(key) {
            Some(&idx) => {
                self.unlink(key, idx);
                true
            }
            None => false,
        }
    }

    fn unlink<Q>(&mut self, key: &Q, idx: usize)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.remove(key);
        self.order.remove(idx);
        self.debug_check();
    }

    // == Expiry ==
    /// Collects the keys of every entry expired as of `now`.
    pub fn expired_keys(&self, now: Instant) -> Vec<K> {
        self.order
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(_, entry)| entry.key.clone())
            .collect()
    }

    /// Removes `key` only if it is still expired as of `now`.
    ///
    /// A key re-added with a fresh TTL, or made permanent, since it was
    /// collected by [`CacheStore::expired_keys`] is kept.
    pub fn remove_expired(&mut self, key: &K, now: Instant) -> bool {
        let Some(&idx) = self.index.get(key) else {
            return false;
        };
        let expired = self
            .order
            .get(idx)
            .is_some_and(|entry| entry.is_expired_at(now));
        if expired {
            self.unlink(key, idx);
            self.stats.record_expiration();
        }
        expired
    }

    /// Remaining TTL for a live key; `Some(None)` for permanent entries.
    ///
    /// Does not promote the entry.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Option<Duration>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        let entry = self.order.get(*self.index.get(key)?)?;
        if entry.is_expired_at(now) {
            return None;
        }
        Some(entry.ttl_remaining_at(now))
    }

    // == Introspection ==
    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        self.order
            .iter()
            .map(|(_, entry)| entry.key.clone())
            .collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.order.len());
        stats
    }

    /// Full structural check of the lookup table against the recency list.
    pub fn is_consistent(&self) -> bool {
        self.order.is_well_formed()
            && self.index.len() == self.order.len()
            && self.order.len() <= self.capacity
            && self
                .index
                .iter()
                .all(|(key, &idx)| self.order.get(idx).is_some_and(|entry| &entry.key == key))
    }

    fn debug_check(&self) {
        debug_assert_eq!(
            self.index.len(),
            self.order.len(),
            "lookup table and recency list disagree on membership"
        );
        debug_assert!(self.order.len() <= self.capacity, "cache exceeds capacity");
    }
}
