//! Caching layer for AtB responses.
//!
//! Stops change rarely and the stop list is expensive to fetch, so it is
//! cached as one unit under a single key with a long TTL. Departures are
//! near real-time and cached per stop with a short TTL.
//!
//! Concurrent misses on the same key are not coalesced: both requests call
//! AtB and the later write wins. Both writes hold equivalent data.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::atb::{AtbError, ConversionError, Upstream, convert_bus_stops, convert_forecasts};
use crate::domain::{BusStops, Departures, NodeId};
use crate::store::{Ttl, TtlCache};

/// Key for the stop directory. There is only ever one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StopsKey;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for the stop directory.
    pub stops_ttl: Duration,

    /// TTL for per-stop departures. Also the departure store's default.
    pub departures_ttl: Duration,

    /// How often expired entries are purged.
    pub cleanup_interval: Duration,

    /// Maximum number of cached departure lists.
    pub max_departures: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stops_ttl: Duration::from_secs(30 * 60),
            departures_ttl: Duration::from_secs(60),
            cleanup_interval: Duration::from_secs(30),
            max_departures: 10_000,
        }
    }
}

/// Errors from a cached fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The AtB call failed
    #[error("upstream error: {0}")]
    Upstream(#[from] AtbError),

    /// AtB returned data we could not interpret
    #[error("transform error: {0}")]
    Transform(#[from] ConversionError),
}

/// Cache for AtB data, one typed store per resource.
pub struct AtbCache {
    stops: TtlCache<StopsKey, Arc<BusStops>>,
    stops_ttl: Duration,
    departures: TtlCache<NodeId, Arc<Departures>>,
}

impl AtbCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            stops: TtlCache::new(config.stops_ttl, 16),
            stops_ttl: config.stops_ttl,
            departures: TtlCache::new(config.departures_ttl, config.max_departures),
        }
    }

    /// Spawn background sweepers for both stores.
    pub fn spawn_sweepers(&self, interval: Duration) -> [JoinHandle<()>; 2] {
        [
            self.stops.spawn_sweeper(interval),
            self.departures.spawn_sweeper(interval),
        ]
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.stops.invalidate_all();
        self.departures.invalidate_all();
    }
}

/// Return the cached value for `key`, or fetch, transform and cache it.
async fn fetch_or_populate<K, V, R, F, Fut, T>(
    store: &TtlCache<K, Arc<V>>,
    key: K,
    ttl: Ttl,
    fetch: F,
    transform: T,
) -> Result<Arc<V>, FetchError>
where
    K: Hash + Eq + Send + Sync + std::fmt::Debug + 'static,
    V: Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<R, AtbError>>,
    T: FnOnce(R) -> Result<V, ConversionError>,
{
    if let Some(cached) = store.get(&key).await {
        debug!(?key, "cache hit");
        return Ok(cached);
    }

    debug!(?key, "cache miss");
    let raw = fetch().await?;
    let value = Arc::new(transform(raw)?);

    store.set(key, value.clone(), ttl).await;

    Ok(value)
}

/// AtB client with caching.
///
/// Wraps an [`Upstream`] and caches stop and departure responses.
pub struct CachedAtbClient {
    upstream: Arc<dyn Upstream>,
    cache: AtbCache,
}

impl CachedAtbClient {
    /// Create a new cached client.
    pub fn new(upstream: impl Upstream, cache_config: &CacheConfig) -> Self {
        Self {
            upstream: Arc::new(upstream),
            cache: AtbCache::new(cache_config),
        }
    }

    /// Get the stop directory, using the cache if available.
    ///
    /// The directory and its node ID index are built together and cached
    /// as one value, so a reader never sees one without the other.
    pub async fn get_bus_stops(&self) -> Result<Arc<BusStops>, FetchError> {
        fetch_or_populate(
            &self.cache.stops,
            StopsKey,
            Ttl::After(self.cache.stops_ttl),
            || self.upstream.fetch_stops(),
            convert_bus_stops,
        )
        .await
    }

    /// Get departures for a stop, using the cache if available.
    ///
    /// Does not check that the stop exists; callers that take node IDs from
    /// clients should look it up in [`Self::get_bus_stops`] first.
    pub async fn get_departures(&self, node_id: NodeId) -> Result<Arc<Departures>, FetchError> {
        fetch_or_populate(
            &self.cache.departures,
            node_id,
            Ttl::Default,
            || self.upstream.fetch_forecast(node_id),
            |raw| convert_forecasts(node_id, raw),
        )
        .await
    }

    /// Access the cache, e.g. to start sweepers.
    pub fn cache(&self) -> &AtbCache {
        &self.cache
    }
}
