//! Signature-keyed response cache using moka
//!
//! Entries carry their capture time and are judged fresh or stale on read.
//! moka only bounds the entry count; it never expires entries by time, so an
//! expired entry stays available as a fallback when upstream fails.

use crate::signature::RequestSignature;
use dashmap::DashMap;
use moka::future::Cache;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default freshness window (30 minutes)
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(30 * 60);

/// Default maximum number of cached responses
pub const DEFAULT_CAPACITY: u64 = 10_000;

/// Raw upstream payload plus capture time
#[derive(Debug, Clone)]
pub struct CachedResponse {
    payload: Arc<Value>,
    fetched_at: Instant,
}

impl CachedResponse {
    /// Capture payload now
    #[inline]
    #[must_use]
    pub fn new(payload: Value) -> Self {
        Self {
            payload: Arc::new(payload),
            fetched_at: Instant::now(),
        }
    }

    /// Shared payload
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &Arc<Value> {
        &self.payload
    }

    /// Time since capture
    #[inline]
    #[must_use]
    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    /// Whether the entry is younger than `window`
    #[inline]
    #[must_use]
    pub fn is_fresh(&self, window: Duration) -> bool {
        self.age() < window
    }
}

/// Outcome of a cache read
#[derive(Debug, Clone)]
pub enum Lookup {
    /// Entry within the freshness window
    Fresh(Arc<Value>),
    /// Entry present but expired
    Stale(CachedResponse),
    /// No entry for the signature
    Miss,
}

/// Statistics for cache behaviour monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Approximate number of entries
    pub entry_count: u64,
    /// Reads answered by a fresh entry
    pub hits: u64,
    /// Reads that had to fetch
    pub misses: u64,
    /// Reads answered by another caller's in-flight fetch
    pub coalesced: u64,
    /// Upstream fetches performed
    pub fetches: u64,
    /// Failed fetches answered with a stale entry
    pub stale_served: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    coalesced: AtomicU64,
    fetches: AtomicU64,
    stale_served: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Response cache with stale-on-error fallback
///
/// Cloning is cheap and clones share entries, in-flight gates and counters.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    inner: Cache<RequestSignature, CachedResponse>,
    freshness: Duration,
    inflight: Arc<DashMap<RequestSignature, Arc<Mutex<()>>>>,
    counters: Arc<Counters>,
}

impl ResponseCache {
    /// Create cache with the given freshness window and default capacity
    #[inline]
    #[must_use]
    pub fn new(freshness: Duration) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, freshness)
    }

    /// Create cache with explicit capacity
    #[must_use]
    pub fn with_capacity(max_capacity: u64, freshness: Duration) -> Self {
        Self {
            inner: Cache::builder().max_capacity(max_capacity).build(),
            freshness,
            inflight: Arc::new(DashMap::new()),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Freshness window
    #[inline]
    #[must_use]
    pub fn freshness(&self) -> Duration {
        self.freshness
    }

    /// Read without fetching
    pub async fn lookup(&self, signature: &RequestSignature) -> Lookup {
        match self.inner.get(signature).await {
            Some(entry) if entry.is_fresh(self.freshness) => Lookup::Fresh(entry.payload),
            Some(entry) => Lookup::Stale(entry),
            None => Lookup::Miss,
        }
    }

    /// Store payload captured now, superseding any previous entry
    pub async fn store(&self, signature: RequestSignature, payload: Value) -> Arc<Value> {
        let entry = CachedResponse::new(payload);
        let shared = Arc::clone(entry.payload());
        self.inner.insert(signature, entry).await;
        shared
    }

    /// Serve from cache or run `fetch`
    ///
    /// See the crate docs for the policy. `fetch` runs at most once per call,
    /// and only one caller per signature fetches at a time.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        signature: &RequestSignature,
        fetch: F,
    ) -> Result<Arc<Value>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
        E: fmt::Display,
    {
        if let Lookup::Fresh(payload) = self.lookup(signature).await {
            Counters::bump(&self.counters.hits);
            tracing::debug!(path = signature.path(), "cache hit");
            return Ok(payload);
        }

        let gate = InflightGate::acquire(self, signature);
        let _guard = gate.lock.lock().await;

        // Filled by the caller we waited behind
        if let Lookup::Fresh(payload) = self.lookup(signature).await {
            Counters::bump(&self.counters.coalesced);
            tracing::debug!(path = signature.path(), "cache filled by in-flight request");
            return Ok(payload);
        }

        Counters::bump(&self.counters.misses);
        tracing::debug!(path = signature.path(), "cache miss");
        self.fetch_and_store(signature, fetch).await
    }

    async fn fetch_and_store<F, Fut, E>(
        &self,
        signature: &RequestSignature,
        fetch: F,
    ) -> Result<Arc<Value>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
        E: fmt::Display,
    {
        Counters::bump(&self.counters.fetches);

        match fetch().await {
            Ok(payload) => Ok(self.store(signature.clone(), payload).await),
            Err(e) => match self.inner.get(signature).await {
                Some(stale) => {
                    Counters::bump(&self.counters.stale_served);
                    tracing::warn!(
                        path = signature.path(),
                        age_secs = stale.age().as_secs(),
                        "upstream failed, serving cached response: {}",
                        e
                    );
                    Ok(stale.payload)
                }
                None => {
                    tracing::debug!(path = signature.path(), "upstream failed with nothing cached");
                    Err(e)
                }
            },
        }
    }

    /// Invalidate one entry
    #[inline]
    pub async fn invalidate(&self, signature: &RequestSignature) {
        self.inner.invalidate(signature).await;
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Apply pending maintenance so counts are exact
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }

    /// Get approximate entry count
    #[inline]
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Get cache statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        CacheStats {
            entry_count: self.inner.entry_count(),
            hits: load(&self.counters.hits),
            misses: load(&self.counters.misses),
            coalesced: load(&self.counters.coalesced),
            fetches: load(&self.counters.fetches),
            stale_served: load(&self.counters.stale_served),
        }
    }
}

impl Default for ResponseCache {
    /// Create cache with default capacity and a 30 minute window
    fn default() -> Self {
        Self::new(DEFAULT_FRESHNESS)
    }
}

/// Per-signature lock shared by concurrent callers
///
/// Removed from the map on drop once no other caller holds it, including when
/// the owning future is cancelled.
struct InflightGate<'a> {
    cache: &'a ResponseCache,
    signature: &'a RequestSignature,
    lock: Arc<Mutex<()>>,
}

impl<'a> InflightGate<'a> {
    fn acquire(cache: &'a ResponseCache, signature: &'a RequestSignature) -> Self {
        let lock = cache
            .inflight
            .entry(signature.clone())
            .or_default()
            .value()
            .clone();
        Self {
            cache,
            signature,
            lock,
        }
    }
}

impl Drop for InflightGate<'_> {
    fn drop(&mut self) {
        // one reference in the map, one here
        let lock = &self.lock;
        self.cache.inflight.remove_if(self.signature, |_, current| {
            Arc::ptr_eq(current, lock) && Arc::strong_count(current) <= 2
        });
    }
}
