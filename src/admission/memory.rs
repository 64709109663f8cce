use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use super::store::{CounterStore, StoreFuture};

/// Map size past which increments start sweeping expired entries.
const PURGE_THRESHOLD: usize = 4096;
/// Minimum gap between two automatic sweeps.
const PURGE_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
struct CounterEntry {
    count: u64,
    expires_at: Instant,
}

impl CounterEntry {
    fn live_count(&self, now: Instant) -> u64 {
        if now >= self.expires_at { 0 } else { self.count }
    }
}

/// In-process counter store.
///
/// Each key has its own lock; the map lock is only held long enough to look
/// up or insert an entry, so different clients never wait on each other's
/// counters. Expiry runs on `tokio::time`, which lets tests pause the clock.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    counters: Mutex<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    entries: HashMap<String, Arc<Mutex<CounterEntry>>>,
    next_sweep: Option<Instant>,
}

impl Counters {
    /// Sweep at most once per `PURGE_INTERVAL`, and only once the map is large.
    fn maybe_purge(&mut self, now: Instant) {
        if self.entries.len() < PURGE_THRESHOLD
            || self.next_sweep.is_some_and(|next| now < next)
        {
            return;
        }
        let purged = self.purge_expired(now);
        self.next_sweep = Some(now + PURGE_INTERVAL);
        tracing::debug!(purged, remaining = self.entries.len(), "swept expired counters");
    }

    fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        // An entry another caller has cloned may be mid-increment; leave it.
        self.entries.retain(|_, entry| {
            if Arc::strong_count(entry) > 1 {
                return true;
            }
            let entry = entry.lock().unwrap_or_else(PoisonError::into_inner);
            now < entry.expires_at
        });
        before - self.entries.len()
    }
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Counters> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn entry(&self, key: &str, now: Instant) -> Arc<Mutex<CounterEntry>> {
        let mut counters = self.lock();
        if !counters.entries.contains_key(key) {
            counters.maybe_purge(now);
        }
        Arc::clone(counters.entries.entry(key.to_string()).or_insert_with(|| {
            Arc::new(Mutex::new(CounterEntry {
                count: 0,
                expires_at: now,
            }))
        }))
    }

    fn existing(&self, key: &str) -> Option<Arc<Mutex<CounterEntry>>> {
        self.lock().entries.get(key).map(Arc::clone)
    }

    /// Drop expired entries nobody else is holding. Returns how many went.
    pub fn purge_expired(&self) -> usize {
        self.lock().purge_expired(Instant::now())
    }

    /// Number of tracked keys, expired or not.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CounterStore for MemoryCounterStore {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, u64> {
        Box::pin(async move {
            let Some(entry) = self.existing(key) else {
                return Ok(0);
            };
            let entry = entry.lock().unwrap_or_else(PoisonError::into_inner);
            Ok(entry.live_count(Instant::now()))
        })
    }

    fn increment_within<'a>(
        &'a self,
        key: &'a str,
        limit: u64,
        ttl: Duration,
    ) -> StoreFuture<'a, Option<u64>> {
        Box::pin(async move {
            let now = Instant::now();
            let entry = self.entry(key, now);
            let mut entry = entry.lock().unwrap_or_else(PoisonError::into_inner);

            let current = entry.live_count(now);
            if current >= limit {
                return Ok(None);
            }
            entry.count = current + 1;
            entry.expires_at = now + ttl;
            Ok(Some(entry.count))
        })
    }
}
