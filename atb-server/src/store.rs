//! In-memory key/value store with per-entry expiration.
//!
//! A thin layer over moka. Each entry records when it was inserted and how
//! long it lives; a read compares those against the clock, so an entry past
//! its TTL is a miss even if moka has not evicted it yet. Eviction itself is
//! lazy and happens during moka's maintenance, which [`TtlCache::sweep`]
//! (or the task from [`TtlCache::spawn_sweeper`]) drives periodically.

use std::hash::Hash;
use std::time::Duration;

use moka::Expiry;
use moka::future::Cache as MokaCache;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// How long an entry lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// Use the store's configured default.
    Default,
    /// Expire after this long.
    After(Duration),
}

impl From<Duration> for Ttl {
    /// A zero duration means "use the default".
    fn from(duration: Duration) -> Self {
        if duration.is_zero() {
            Ttl::Default
        } else {
            Ttl::After(duration)
        }
    }
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> Entry<V> {
    fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() >= self.ttl
    }
}

/// Tells moka to evict each entry after its own TTL.
struct EntryExpiry;

impl<K, V> Expiry<K, Entry<V>> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &K,
        entry: &Entry<V>,
        _created_at: std::time::Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &K,
        entry: &Entry<V>,
        _updated_at: std::time::Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Concurrent cache where every entry carries its own TTL.
///
/// Cloning is cheap and clones share the same storage.
pub struct TtlCache<K, V> {
    inner: MokaCache<K, Entry<V>>,
    default_ttl: Duration,
}

// Manual impl so clones need neither `K: Clone` nor `V: Clone`.
impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            default_ttl: self.default_ttl,
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a store whose entries default to `default_ttl`.
    pub fn new(default_ttl: Duration, max_capacity: u64) -> Self {
        let inner = MokaCache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryExpiry)
            .build();

        Self { inner, default_ttl }
    }

    /// Get a live value.
    ///
    /// Returns `None` if the key is absent or its entry has expired.
    pub async fn get(&self, key: &K) -> Option<V> {
        let entry = self.inner.get(key).await?;
        if entry.is_expired() {
            return None;
        }
        Some(entry.value)
    }

    /// Insert or replace a value.
    ///
    /// A zero TTL, however it is given, means the store's default.
    pub async fn set(&self, key: K, value: V, ttl: impl Into<Ttl>) {
        let ttl = match ttl.into() {
            Ttl::After(duration) if !duration.is_zero() => duration,
            Ttl::After(_) | Ttl::Default => self.default_ttl,
        };

        let entry = Entry {
            value,
            inserted_at: Instant::now(),
            ttl,
        };
        self.inner.insert(key, entry).await;
    }

    /// Purge expired entries now.
    pub async fn sweep(&self) {
        self.inner.run_pending_tasks().await;
    }

    /// Spawn a task that sweeps every `interval`.
    ///
    /// The task runs until aborted.
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // First tick is immediate, skip it
            loop {
                ticker.tick().await;
                cache.sweep().await;
                debug!(entries = cache.entry_count(), "swept cache");
            }
        })
    }

    /// Approximate number of stored entries, including expired ones not yet
    /// swept.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Remove every entry.
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}
