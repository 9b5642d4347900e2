//! # Cache
//!
//! In-process memo for assembled dashboards.
//!
//! - One TTL for the whole cache, fixed at construction
//! - Eviction is lazy: an expired entry is dropped by the `get` that finds it
//! - Values are cloned out, so store something cheap to clone such as an `Arc`
//!
//! [`Coalescer`] serializes rebuilds of the same key so that concurrent misses
//! wait on the run already in flight instead of each hitting Odoo.
use std::{collections::HashMap, sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::{
    sync::{Mutex as AsyncMutex, OwnedMutexGuard},
    time::Instant,
};
use tracing::debug;

struct CacheEntry<V> {
    stored_at: Instant,
    value: V,
}

pub struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock();

        let expired = entries.get(key)?.stored_at.elapsed() > self.ttl;
        if expired {
            debug!("Cache entry {key} expired");
            entries.remove(key);

            return None;
        }

        entries.get(key).map(|entry| entry.value.clone())
    }

    pub fn set(&self, key: &str, value: V) {
        self.entries.lock().insert(
            key.to_string(),
            CacheEntry {
                stored_at: Instant::now(),
                value,
            },
        );
    }
}

pub struct Coalescer {
    inflight: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl Coalescer {
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }

    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = Arc::clone(
            self.inflight
                .lock()
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
        );

        lock.lock_owned().await
    }
}

impl Default for Coalescer {
    fn default() -> Self {
        Self::new()
    }
}
