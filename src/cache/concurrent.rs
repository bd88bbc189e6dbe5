//! Concurrent Cache Module
//!
//! Thread-safe cache handle: a [`CacheStore`] behind a single `RwLock`, plus
//! the expiry sweeper whose lifetime is tied to the handle.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::runtime::Handle;
use tracing::info;

use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_sweeper, sweep_expired, SweeperHandle};

// == Cache ==
/// Bounded LRU cache with optional per-entry TTL, safe to share across threads.
///
/// Every operation that touches recency order (`get`, `add`, `add_with_ttl`,
/// `remove`, `clear`) takes the exclusive lock. Pure queries take the shared
/// lock. Wrap the cache in an `Arc` to share it.
///
/// Construction starts a sweeper task on the current tokio runtime that
/// drops expired entries at the configured sweep interval. The task
/// stops when the cache is dropped or [`Cache::shutdown`] is awaited.
///
/// # Example
/// ```no_run
/// # async fn demo() -> lru_ttl_cache::Result<()> {
/// use std::time::Duration;
/// use lru_ttl_cache::Cache;
///
/// let cache: Cache<String, u32> = Cache::new(128)?;
/// cache.add("answer".to_string(), 42);
/// cache.add_with_ttl("session".to_string(), 7, Duration::from_secs(30));
/// assert_eq!(cache.get("answer"), Some(42));
/// cache.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct Cache<K, V> {
    store: Arc<RwLock<CacheStore<K, V>>>,
    capacity: usize,
    sweeper: Option<SweeperHandle>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries, sweeping
    /// at the default interval.
    ///
    /// # Errors
    /// - [`CacheError::InvalidCapacity`] if `capacity` is zero
    /// - [`CacheError::NoRuntime`] if called outside a tokio runtime
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(CacheConfig::with_capacity(capacity))
    }

    /// Creates an empty cache from an explicit configuration.
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        let store = Arc::new(RwLock::new(CacheStore::new(config.capacity)?));
        let sweeper = spawn_sweeper(Arc::downgrade(&store), config.sweep_interval, &runtime);
        info!(
            "Cache initialized: capacity={}, sweep_interval={}ms",
            config.capacity,
            config.sweep_interval.as_millis()
        );

        Ok(Self {
            store,
            capacity: config.capacity,
            sweeper: Some(sweeper),
        })
    }

    /// Fixed maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.store.write().clear();
    }

    /// Inserts or updates a permanent entry and marks it most recently used.
    ///
    /// Any TTL previously set on `key` is cleared. When a new key arrives at
    /// capacity, the least recently used entry is evicted first.
    pub fn add(&self, key: K, value: V) {
        self.store.write().add(key, value);
    }

    /// Inserts or updates an entry that expires `ttl` from now.
    pub fn add_with_ttl(&self, key: K, value: V, ttl: Duration) {
        self.store.write().add_with_ttl(key, value, ttl);
    }

    /// Returns a clone of the value for `key` and marks it most recently used.
    ///
    /// An entry whose TTL has elapsed is removed and reported as absent.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.write().get(key)
    }

    /// Removes `key` if present. Returns whether an entry was removed.
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.write().remove(key)
    }

    /// Remaining lifetime of a live entry without promoting it.
    ///
    /// Returns `None` for absent or expired keys and `Some(None)` for
    /// permanent entries.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Option<Duration>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.read().ttl_remaining(key)
    }

    /// Runs one expiry sweep now. Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        sweep_expired(&self.store)
    }

    /// Snapshot of the keys from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        self.store.read().keys()
    }

    pub fn stats(&self) -> CacheStats {
        self.store.read().stats()
    }

    /// Verifies the lookup table and recency ordering agree.
    pub fn is_consistent(&self) -> bool {
        self.store.read().is_consistent()
    }

    /// Returns true while the background sweeper is running.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .as_ref()
            .is_some_and(|sweeper| !sweeper.is_finished())
    }

    /// Stops the background sweeper and waits for it to exit.
    ///
    /// Dropping the cache also stops the sweeper, without waiting.
    pub async fn shutdown(mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.shutdown().await;
        }
    }
}

impl<K, V> std::fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("capacity", &self.capacity)
            .field("sweeper", &self.sweeper)
            .finish_non_exhaustive()
    }
}
