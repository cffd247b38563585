use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
    time::Duration,
};

use chrono::Utc;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::store::CacheStore;

/// Source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// A stored payload and the time it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    #[serde(rename = "data")]
    pub payload: T,
    #[serde(rename = "timestamp")]
    pub stored_at: i64,
}

impl<T> CacheEntry<T> {
    /// An entry stamped in the future (the clock went backwards) is stale.
    pub fn is_fresh(&self, now_millis: i64, ttl: Duration) -> bool {
        let age = now_millis - self.stored_at;
        (0..ttl.as_millis() as i64).contains(&age)
    }
}

/// Read-through cache in front of remote fetches.
///
/// Each slot holds a single entry. A lookup is a hit when the entry exists,
/// deserializes, is younger than the slot's TTL and passes the caller's
/// validity check; anything else is a miss that runs the fetch. Successful
/// fetches overwrite the slot, failed fetches leave it untouched.
#[derive(Clone)]
pub struct CacheGateway {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
}

impl CacheGateway {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    pub async fn fetch_with_cache<T, E, F, Fut>(
        &self,
        slot: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.fetch_with_cache_if(slot, ttl, fetch, |_| true).await
    }

    /// Like [`CacheGateway::fetch_with_cache`], with an extra check the stored
    /// payload must pass before it is served.
    pub async fn fetch_with_cache_if<T, E, F, Fut, V>(
        &self,
        slot: &str,
        ttl: Duration,
        fetch: F,
        is_valid: V,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        V: FnOnce(&T) -> bool,
    {
        debug_assert!(!slot.is_empty(), "cache slot name must not be empty");

        if let Some(entry) = self.lookup::<T>(slot).await {
            if entry.is_fresh(self.clock.now_millis(), ttl) && is_valid(&entry.payload) {
                tracing::debug!(slot, "cache hit");
                return Ok(entry.payload);
            }
        }

        tracing::debug!(slot, "cache miss, fetching");
        let payload = fetch().await?;

        let entry = CacheEntry {
            payload,
            stored_at: self.clock.now_millis(),
        };
        match serde_json::to_string(&entry) {
            Ok(json) => {
                if let Err(e) = self.store.write(slot, &json).await {
                    tracing::warn!(slot, error = %e, "failed to write cache entry");
                }
            }
            Err(e) => tracing::warn!(slot, error = %e, "failed to serialize cache entry"),
        }

        Ok(entry.payload)
    }

    /// Age of the entry stored under `slot`, if there is a readable one.
    pub async fn entry_age(&self, slot: &str) -> Option<Duration> {
        let entry = self.lookup::<serde_json::Value>(slot).await?;
        let age = self.clock.now_millis() - entry.stored_at;
        Some(Duration::from_millis(age.max(0) as u64))
    }

    async fn lookup<T: DeserializeOwned>(&self, slot: &str) -> Option<CacheEntry<T>> {
        let raw = match self.store.read(slot).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::debug!(slot, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(slot, error = %e, "malformed cache entry, treating as miss");
                None
            }
        }
    }
}
