//! Time-bounded memoization for hot read paths.
//!
//! A [`TtlSlot`] holds at most one value together with the time it was last
//! refreshed. Reads inside the TTL window return the stored value; reads after
//! it (or against an empty slot) run the supplied fetch future and store its
//! result. There is no explicit invalidation: staleness is bounded by the TTL.
//!
//! Time comes from an injected [`Clock`] so tests can move time by hand.

use chrono::{DateTime, Duration, Utc};
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Source of "now" for cache age checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
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

#[derive(Debug)]
struct Entry<T> {
    value: T,
    refreshed_at: DateTime<Utc>,
}

/// A single memoized value with a fixed time-to-live.
///
/// Refreshes are serialized: concurrent readers that miss wait for the one
/// in-flight fetch instead of issuing their own.
pub struct TtlSlot<T> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entry: tokio::sync::Mutex<Option<Entry<T>>>,
}

impl<T: Clone> TtlSlot<T> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entry: tokio::sync::Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value, or runs `fetch` when the slot is empty or its
    /// age exceeds the TTL.
    ///
    /// A failed fetch leaves the slot as it was and hands the error back.
    pub async fn get_or_refresh<F, Fut, E>(&self, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut entry = self.entry.lock().await;

        if let Some(current) = entry.as_ref() {
            if self.clock.now() - current.refreshed_at <= self.ttl {
                return Ok(current.value.clone());
            }
        }

        let value = fetch().await?;
        *entry = Some(Entry {
            value: value.clone(),
            refreshed_at: self.clock.now(),
        });
        Ok(value)
    }

    /// When the stored value was last refreshed, if any.
    pub async fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.entry.lock().await.as_ref().map(|e| e.refreshed_at)
    }
}
