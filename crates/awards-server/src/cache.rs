//! In-process response cache for the public read endpoints.
//!
//! Entries expire per scope and are dropped eagerly when a write touches the
//! resource they were built from.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Resource a cached response was built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheScope {
    Categories,
    Nominees,
    Results(String),
}

/// Lifetime of cached entries, per scope.
#[derive(Debug, Clone, Copy)]
pub struct CacheTtls {
    pub categories: Duration,
    pub nominees: Duration,
    pub results: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            categories: Duration::from_secs(600),
            nominees: Duration::from_secs(300),
            results: Duration::from_secs(60),
        }
    }
}

impl CacheTtls {
    const fn for_scope(&self, scope: &CacheScope) -> Duration {
        match scope {
            CacheScope::Categories => self.categories,
            CacheScope::Nominees => self.nominees,
            CacheScope::Results(_) => self.results,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    body: Value,
    inserted_at: Instant,
    ttl: Duration,
}

impl Entry {
    fn is_fresh(&self, now: Instant) -> bool {
        now.duration_since(self.inserted_at) < self.ttl
    }
}

type CacheKey = (CacheScope, String);

pub struct ResponseCache {
    ttls: CacheTtls,
    capacity: usize,
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl ResponseCache {
    pub fn new(capacity: usize) -> Self {
        Self::with_ttls(capacity, CacheTtls::default())
    }

    pub fn with_ttls(capacity: usize, ttls: CacheTtls) -> Self {
        Self {
            ttls,
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, scope: &CacheScope, key: &str) -> Option<Value> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let cache_key = (scope.clone(), key.to_string());
        match entries.get(&cache_key) {
            Some(entry) if entry.is_fresh(now) => Some(entry.body.clone()),
            Some(_) => {
                entries.remove(&cache_key);
                None
            }
            None => None,
        }
    }

    pub async fn insert(&self, scope: CacheScope, key: &str, body: Value) {
        let now = Instant::now();
        let ttl = self.ttls.for_scope(&scope);
        let mut entries = self.entries.lock().await;

        entries.retain(|_, e| e.is_fresh(now));
        if entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            (scope, key.to_string()),
            Entry {
                body,
                inserted_at: now,
                ttl,
            },
        );
    }

    /// Drop every entry built from `scope`.
    pub async fn invalidate(&self, scope: &CacheScope) {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|(s, _), _| s != scope);
        debug!(?scope, dropped = before - entries.len(), "Cache invalidated");
    }

    pub async fn invalidate_all(&self, scopes: &[CacheScope]) {
        for scope in scopes {
            self.invalidate(scope).await;
        }
    }

    /// Return the cached body or compute, store and return a fresh one.
    ///
    /// The lock is not held while `load` runs; concurrent misses may both load.
    pub async fn get_or_try_insert<F, Fut, E>(
        &self,
        scope: CacheScope,
        key: &str,
        load: F,
    ) -> Result<Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        if let Some(hit) = self.get(&scope, key).await {
            return Ok(hit);
        }
        let body = load().await?;
        self.insert(scope, key, body.clone()).await;
        Ok(body)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;

    fn results(id: &str) -> CacheScope {
        CacheScope::Results(id.to_string())
    }

    #[tokio::test]
    async fn hit_after_insert() {
        let cache = ResponseCache::new(10);
        cache.insert(CacheScope::Categories, "", json!([1])).await;
        assert_eq!(cache.get(&CacheScope::Categories, "").await, Some(json!([1])));
        assert_eq!(cache.get(&CacheScope::Nominees, "").await, None);
    }

    #[tokio::test]
    async fn expired_entries_miss() {
        let ttls = CacheTtls {
            results: Duration::ZERO,
            ..CacheTtls::default()
        };
        let cache = ResponseCache::with_ttls(10, ttls);
        cache.insert(results("c1"), "", json!([])).await;
        cache.insert(CacheScope::Categories, "", json!([])).await;

        assert_eq!(cache.get(&results("c1"), "").await, None);
        assert!(cache.get(&CacheScope::Categories, "").await.is_some());
    }

    #[tokio::test]
    async fn invalidation_is_scoped() {
        let cache = ResponseCache::new(10);
        cache.insert(results("c1"), "", json!("a")).await;
        cache.insert(results("c2"), "", json!("b")).await;
        cache.insert(CacheScope::Nominees, "", json!("all")).await;
        cache.insert(CacheScope::Nominees, "c1", json!("c1 only")).await;

        cache.invalidate(&results("c1")).await;
        assert_eq!(cache.get(&results("c1"), "").await, None);
        assert!(cache.get(&results("c2"), "").await.is_some());

        cache.invalidate(&CacheScope::Nominees).await;
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn oldest_entry_evicted_at_capacity() {
        let cache = ResponseCache::new(2);
        cache.insert(results("a"), "", json!(1)).await;
        tokio::time::sleep(Duration::from_millis(2)).await;
        cache.insert(results("b"), "", json!(2)).await;
        tokio::time::sleep(Duration::from_millis(2)).await;
        cache.insert(results("c"), "", json!(3)).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get(&results("a"), "").await, None);
        assert!(cache.get(&results("c"), "").await.is_some());
    }

    #[tokio::test]
    async fn loader_runs_only_on_miss() {
        let cache = ResponseCache::new(10);
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let load = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(json!({"n": 1}))
        };

        let first = cache
            .get_or_try_insert(CacheScope::Categories, "", load)
            .await
            .unwrap();
        let second = cache
            .get_or_try_insert(CacheScope::Categories, "", load)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn loader_errors_are_not_cached() {
        let cache = ResponseCache::new(10);
        let err = cache
            .get_or_try_insert(CacheScope::Nominees, "", || async {
                Err::<Value, _>("db down")
            })
            .await;
        assert_eq!(err, Err("db down"));
        assert!(cache.is_empty().await);
    }
}
