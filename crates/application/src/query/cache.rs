//! Client-side query cache.
//!
//! Results are stored as JSON values keyed by [`QueryKey`]. A cached value
//! is served while it is younger than the caller's stale time and has not
//! been invalidated; otherwise the fetcher runs again.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;

use super::QueryKey;
use crate::error::ApiResult;
use crate::ports::Clock;

/// Stale time used when a query does not set its own.
pub const DEFAULT_STALE_TIME: Duration = Duration::minutes(5);

/// Entries untouched for this long are dropped by [`QueryCache::collect_garbage`].
pub const DEFAULT_GC_TIME: Duration = Duration::minutes(30);

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    updated_at: DateTime<Utc>,
    last_used: DateTime<Utc>,
    invalidated: bool,
}

/// Shared cache of query results.
///
/// Clones share the same entries.
#[derive(Clone)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<QueryKey, Entry>>>,
    clock: Arc<dyn Clock>,
    gc_time: Duration,
}

impl QueryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            clock,
            gc_time: DEFAULT_GC_TIME,
        }
    }

    /// Sets how long unused entries are kept.
    #[must_use]
    pub const fn with_gc_time(mut self, gc_time: Duration) -> Self {
        self.gc_time = gc_time;
        self
    }

    /// Returns the cached value if fresh, otherwise runs `fetcher` and
    /// caches its result. Errors are returned and never cached.
    ///
    /// # Errors
    /// Returns the fetcher's error.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, stale_time: Duration, fetcher: F) -> ApiResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        if let Some(value) = self.fresh(&key, stale_time).await {
            tracing::trace!(%key, "Query cache hit");
            return Ok(value);
        }

        tracing::debug!(%key, "Fetching query");
        let value = fetcher().await?;
        self.set(key, &value).await;
        Ok(value)
    }

    /// Reads a cached value regardless of staleness.
    pub async fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        serde_json::from_value(entry.value.clone()).ok()
    }

    /// Writes a value, marking it fresh.
    pub async fn set<T: Serialize>(&self, key: QueryKey, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(%key, %error, "Value could not be cached");
                return;
            }
        };

        let now = self.clock.now();
        self.entries.write().await.insert(
            key,
            Entry {
                value,
                updated_at: now,
                last_used: now,
                invalidated: false,
            },
        );
    }

    /// Marks every entry under `prefix` as stale. Returns how many matched.
    pub async fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries.write().await;
        let mut count = 0;
        for (key, entry) in entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.invalidated = true;
                count += 1;
            }
        }
        tracing::debug!(%prefix, count, "Invalidated queries");
        count
    }

    /// Applies `update` to the cached value in place and returns a snapshot
    /// of what was there before.
    ///
    /// Nothing changes if the key is absent or holds a different shape.
    pub async fn optimistic<T, F>(&self, key: &QueryKey, update: F) -> Snapshot
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T),
    {
        let mut entries = self.entries.write().await;
        let previous = entries.get(key).cloned();

        if let Some(entry) = entries.get_mut(key)
            && let Ok(mut value) = serde_json::from_value::<T>(entry.value.clone())
        {
            update(&mut value);
            if let Ok(updated) = serde_json::to_value(&value) {
                entry.value = updated;
                entry.last_used = self.clock.now();
            }
        }

        Snapshot {
            cache: self.clone(),
            key: key.clone(),
            previous,
        }
    }

    /// Drops entries not used within the GC time. Returns how many went.
    pub async fn collect_garbage(&self) -> usize {
        let cutoff = self.clock.now() - self.gc_time;
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.last_used > cutoff);
        before - entries.len()
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn fresh<T: DeserializeOwned>(&self, key: &QueryKey, stale_time: Duration) -> Option<T> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(key)?;
        entry.last_used = now;

        if entry.invalidated || now - entry.updated_at >= stale_time {
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("gc_time", &self.gc_time)
            .finish_non_exhaustive()
    }
}

/// Value held under a key before an optimistic update.
#[derive(Debug)]
pub struct Snapshot {
    cache: QueryCache,
    key: QueryKey,
    previous: Option<Entry>,
}

impl Snapshot {
    /// Restores the value captured before the optimistic update.
    pub async fn rollback(self) {
        tracing::debug!(key = %self.key, "Rolling back optimistic update");
        let mut entries = self.cache.entries.write().await;
        match self.previous {
            Some(entry) => {
                entries.insert(self.key, entry);
            }
            None => {
                entries.remove(&self.key);
            }
        }
    }
}
