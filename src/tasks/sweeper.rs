//! TTL Expiry Sweeper
//!
//! Background task that periodically removes expired cache entries.

use std::hash::Hash;
use std::sync::Weak;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;

/// Removes every expired entry from `store`, returning how many were dropped.
///
/// Keys are collected under the read lock, then removed one write-lock
/// acquisition at a time so foreground operations interleave with a large
/// sweep. Each removal re-checks expiry, so keys refreshed between the two
/// phases survive.
pub fn sweep_expired<K, V>(store: &RwLock<CacheStore<K, V>>) -> usize
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    let now = Instant::now();
    let expired = store.read().expired_keys(now);

    let mut removed = 0;
    for key in &expired {
        if store.write().remove_expired(key, now) {
            removed += 1;
        }
    }
    removed
}

// == Sweeper Handle ==
/// Owner of a running sweeper task.
///
/// Dropping the handle closes the shutdown channel, which stops the task at
/// its next poll. [`SweeperHandle::shutdown`] does the same and waits for it.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the task to stop and waits for it to exit.
    pub async fn shutdown(self) {
        // The task may already have exited if the store was dropped
        let _ = self.shutdown.send(());
        if let Err(err) = self.task.await {
            warn!("expiry sweeper did not exit cleanly: {}", err);
        }
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a background task on `runtime` that sweeps expired entries every `interval`.
///
/// The task holds only a weak reference to the store and exits on its own
/// once the store is dropped.
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(CacheStore::<String, String>::new(1000)?));
/// let sweeper = spawn_sweeper(Arc::downgrade(&store), Duration::from_secs(60), &Handle::current());
/// // Later, during shutdown:
/// sweeper.shutdown().await;
/// ```
pub fn spawn_sweeper<K, V>(
    store: Weak<RwLock<CacheStore<K, V>>>,
    interval: Duration,
    runtime: &Handle,
) -> SweeperHandle
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    let (shutdown, mut shutdown_rx) = oneshot::channel::<()>();

    let task = runtime.spawn(async move {
        info!(
            "Starting expiry sweeper with interval of {} ms",
            interval.as_millis()
        );

        let start = tokio::time::Instant::now() + interval;
        let mut ticker = tokio::time::interval_at(start, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                // Fires on explicit shutdown and when the handle is dropped
                _ = &mut shutdown_rx => break,
                _ = ticker.tick() => {
                    let Some(strong) = store.upgrade() else {
                        debug!("cache dropped, stopping expiry sweeper");
                        break;
                    };
                    let removed = sweep_expired(&strong);
                    drop(strong);

                    if removed > 0 {
                        info!("TTL sweep: removed {} expired entries", removed);
                    } else {
                        debug!("TTL sweep: no expired entries found");
                    }
                }
            }
        }

        info!("Expiry sweeper stopped");
    });

    SweeperHandle { shutdown, task }
}
