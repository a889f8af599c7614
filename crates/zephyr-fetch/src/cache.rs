//! Time-bounded cache of provider responses, keyed by canonical query

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tracing::debug;
use zephyr_core::Reading;

/// Default lifetime of a cache entry
pub const DEFAULT_TTL_SECS: i64 = 300;

pub fn default_ttl() -> Duration {
    Duration::seconds(DEFAULT_TTL_SECS)
}

/// Source of "now" for expiry decisions
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Immutable snapshot of one response
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub data: Arc<[Reading]>,
    pub timestamp: DateTime<Utc>,
}

impl CacheEntry {
    /// Fresh while strictly younger than `ttl`
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.timestamp < ttl
    }
}

/// Shared response cache.
///
/// Readers receive `Arc<[Reading]>` snapshots, so nothing handed out can
/// alter what is stored. Expired entries are ignored by `get` and replaced by
/// the next write.
pub struct FetchCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl FetchCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Data for `key` if present and not expired
    pub async fn get(&self, key: &str) -> Option<Arc<[Reading]>> {
        let now = self.now();
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if entry.is_fresh(now, self.ttl) {
            Some(Arc::clone(&entry.data))
        } else {
            debug!(key, "cache entry expired");
            None
        }
    }

    /// Store `data` stamped with the current time, replacing any entry
    pub async fn put(&self, key: impl Into<String>, data: Vec<Reading>) -> Arc<[Reading]> {
        let key = key.into();
        let data: Arc<[Reading]> = data.into();
        let entry = CacheEntry {
            key: key.clone(),
            data: Arc::clone(&data),
            timestamp: self.now(),
        };
        self.entries.write().await.insert(key, entry);
        data
    }

    /// Store the result of a fetch that started at `fetched_at`.
    ///
    /// An entry stamped strictly later than `fetched_at` is kept and its data
    /// returned instead, so a slow response never overwrites a newer one.
    pub async fn put_fetched(
        &self,
        key: impl Into<String>,
        data: Vec<Reading>,
        fetched_at: DateTime<Utc>,
    ) -> Arc<[Reading]> {
        let key = key.into();
        let mut entries = self.entries.write().await;

        if let Some(existing) = entries.get(&key) {
            if existing.timestamp > fetched_at {
                debug!(key = %key, "discarding stale response");
                return Arc::clone(&existing.data);
            }
        }

        let data: Arc<[Reading]> = data.into();
        entries.insert(
            key.clone(),
            CacheEntry {
                key,
                data: Arc::clone(&data),
                timestamp: fetched_at,
            },
        );
        data
    }

    /// Number of stored entries, expired ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

impl Default for FetchCache {
    fn default() -> Self {
        Self::new(default_ttl())
    }
}
