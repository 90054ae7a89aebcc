//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with TTL expiration and a
//! capacity-triggered cleanup pass.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::cache::stats::StatsRecorder;
use crate::cache::{Cache, CacheEntry, CacheStats, Expiry};
use crate::context::Context;
use crate::error::CacheError;
use crate::tasks::{spawn_cleanup_task, Sweep};

// == Sweep Report ==
/// Outcome of one cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Entries removed because their TTL had elapsed
    pub expired: usize,
    /// Entries removed because they were closest to expiring
    pub evicted: usize,
}

impl SweepReport {
    pub fn removed(&self) -> usize {
        self.expired + self.evicted
    }
}

// == Entries ==
/// The map guarded by the cache lock.
#[derive(Debug)]
struct Entries<K, V> {
    map: HashMap<K, CacheEntry<V>>,
    capacity: usize,
}

impl<K, V> Entries<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::new(),
            capacity,
        }
    }

    // == Cleanup ==
    /// Single pass over the map.
    ///
    /// Drops every expired entry while collecting the keys tied for the
    /// soonest remaining expiry. If the map is still at capacity afterwards,
    /// all of those tied keys are dropped too.
    fn cleanup(&mut self, now: Instant) -> SweepReport {
        let mut report = SweepReport::default();
        let mut soonest: Option<Expiry> = None;
        let mut candidates: Vec<K> = Vec::new();

        self.map.retain(|key, entry| {
            if entry.expires_at.is_expired_at(now) {
                report.expired += 1;
                return false;
            }
            match soonest.map(|min| entry.expires_at.cmp(&min)) {
                Some(Ordering::Greater) => {}
                Some(Ordering::Equal) => candidates.push(key.clone()),
                _ => {
                    soonest = Some(entry.expires_at);
                    candidates.clear();
                    candidates.push(key.clone());
                }
            }
            true
        });

        if self.map.len() >= self.capacity {
            for key in &candidates {
                if self.map.remove(key).is_some() {
                    report.evicted += 1;
                }
            }
        }

        report
    }
}

// == Shared State ==
/// State shared between the cache handle and its cleanup task.
#[derive(Debug)]
struct Shared<K, V> {
    entries: RwLock<Entries<K, V>>,
    stats: StatsRecorder,
}

impl<K, V> Sweep for Shared<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn sweep(&self) -> SweepReport {
        let report = self.entries.write().cleanup(Instant::now());
        self.stats.record_evictions(report.removed());
        report
    }
}

// == In-Memory Cache ==
/// Concurrency-safe bounded TTL cache.
///
/// A single reader/writer lock guards the map: `get` takes it shared,
/// `set`, `delete` and cleanup take it exclusively. A background task runs
/// cleanup on a fixed interval until [`InMemoryCache::stop`] is called or
/// the cache is dropped.
pub struct InMemoryCache<K, V> {
    shared: Arc<Shared<K, V>>,
    shutdown: CancellationToken,
    cleanup: Mutex<Option<JoinHandle<()>>>,
}

impl<K, V> InMemoryCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries and starts the
    /// periodic cleanup task.
    ///
    /// Must be called from within a Tokio runtime. A capacity of zero is
    /// raised to one.
    pub fn new(capacity: usize, cleanup_interval: Duration) -> Self {
        let shared = Arc::new(Shared {
            entries: RwLock::new(Entries::new(capacity.max(1))),
            stats: StatsRecorder::default(),
        });
        let shutdown = CancellationToken::new();
        let handle = spawn_cleanup_task(shared.clone(), cleanup_interval, shutdown.clone());

        Self {
            shared,
            shutdown,
            cleanup: Mutex::new(Some(handle)),
        }
    }

    // == Lifecycle ==
    /// Stops the periodic cleanup. Stored entries are kept.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    /// Stops the periodic cleanup and waits for the task to exit.
    pub async fn close(&self) {
        self.stop();
        let handle = self.cleanup.lock().take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                debug!(error = %err, "cache cleanup task ended abnormally");
            }
        }
    }

    /// True while the periodic cleanup task is alive.
    pub fn is_running(&self) -> bool {
        self.cleanup
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Runs a cleanup pass immediately.
    pub fn purge(&self) -> SweepReport {
        self.shared.sweep()
    }

    // == Introspection ==
    /// Number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.shared.entries.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries the cache holds.
    pub fn capacity(&self) -> usize {
        self.shared.entries.read().capacity
    }

    pub fn stats(&self) -> CacheStats {
        self.shared.stats.snapshot(self.len())
    }
}

impl<K, V> Cache<K, V> for InMemoryCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Get ==
    fn get(&self, ctx: &Context, key: &K) -> Result<V, CacheError> {
        ctx.check().map_err(CacheError::NotGet)?;

        let entries = self.shared.entries.read();
        let result = match entries.map.get(key) {
            None => Err(CacheError::NotFound),
            Some(entry) if entry.is_expired() => Err(CacheError::Expired),
            Some(entry) => Ok(entry.value.clone()),
        };
        drop(entries);

        match &result {
            Ok(_) => self.shared.stats.record_hit(),
            Err(_) => self.shared.stats.record_miss(),
        }
        result
    }

    // == Set ==
    fn set(&self, ctx: &Context, key: K, value: V, ttl: Duration) -> Result<(), CacheError> {
        ctx.check().map_err(CacheError::NotSet)?;

        let now = Instant::now();
        let mut entries = self.shared.entries.write();

        if !entries.map.contains_key(&key) && entries.map.len() >= entries.capacity {
            let report = entries.cleanup(now);
            self.shared.stats.record_evictions(report.removed());
            trace!(
                expired = report.expired,
                evicted = report.evicted,
                "cache at capacity, cleanup ran before insert"
            );
        }

        entries.map.insert(key, CacheEntry::new_at(value, ttl, now));
        drop(entries);

        self.shared.stats.record_set();
        Ok(())
    }

    // == Delete ==
    fn delete(&self, ctx: &Context, key: &K) -> Result<(), CacheError> {
        ctx.check().map_err(CacheError::NotDelete)?;

        self.shared.entries.write().map.remove(key);
        Ok(())
    }
}

impl<K, V> Drop for InMemoryCache<K, V> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl<K, V> std::fmt::Debug for InMemoryCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCache")
            .field("stopped", &self.shutdown.is_cancelled())
            .finish_non_exhaustive()
    }
}
