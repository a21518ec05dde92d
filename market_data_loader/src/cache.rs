//! Explicit, passed-in memoization cache in front of a [`DataProvider`].
//!
//! [`CachedLoader`] owns a provider and a map from exact request parameters
//! ([`CacheKey`]) to the series they produced. Reads load an `Arc` snapshot of
//! the map with no locking; a miss fetches from the provider and swaps in a new
//! snapshot with the entry added.
//!
//! Implementation notes:
//! - Eviction policy is [`EvictionPolicy::Never`]: entries stay valid for the
//!   life of the loader. Nothing expires and nothing is revalidated.
//! - Only successful fetches are stored. A failed fetch is retried by the next
//!   identical request rather than pinned as "no data" for the whole process.
//! - Empty or inverted date ranges never reach the provider and are not stored.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::NaiveDate;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::{
    models::{bar::PriceSeries, request::BarsRequest},
    providers::{DataProvider, ProviderError},
};

/// How long cached entries stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// Keep every entry until the loader is dropped or [`CachedLoader::clear`] is called.
    #[default]
    Never,
}

/// Exact request parameters an entry was fetched for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl From<&BarsRequest> for CacheKey {
    fn from(request: &BarsRequest) -> Self {
        Self {
            symbol: request.symbol.clone(),
            start: request.start,
            end: request.end,
        }
    }
}

/// Snapshot type held inside the cache; insertion ordered.
type Entries = IndexMap<CacheKey, Arc<PriceSeries>>;

/// Data loader that memoizes provider responses by request parameters.
pub struct CachedLoader<P> {
    provider: P,
    entries: ArcSwap<Entries>,
    policy: EvictionPolicy,
}

impl<P: DataProvider> CachedLoader<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            entries: ArcSwap::from_pointee(Entries::new()),
            policy: EvictionPolicy::Never,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Loads the series for `request`, reporting any provider failure as an
    /// empty series.
    ///
    /// Unknown tickers, network failures, and rate limiting all look the same
    /// to the caller: a series with no bars. The failure is logged at `warn`.
    pub async fn load(&self, request: &BarsRequest) -> Arc<PriceSeries> {
        match self.try_load(request).await {
            Ok(series) => series,
            Err(error) => {
                warn!(
                    provider = self.provider.name(),
                    symbol = %request.symbol,
                    %error,
                    "loading daily bars failed; reporting no data"
                );
                Arc::new(PriceSeries::empty(request.symbol.clone()))
            }
        }
    }

    /// Like [`load`](Self::load), but hands provider errors back to the caller.
    pub async fn try_load(&self, request: &BarsRequest) -> Result<Arc<PriceSeries>, ProviderError> {
        if request.is_empty_range() {
            debug!(symbol = %request.symbol, start = %request.start, end = %request.end, "empty date range; skipping fetch");
            return Ok(Arc::new(PriceSeries::empty(request.symbol.clone())));
        }

        let key = CacheKey::from(request);
        if let Some(hit) = self.entries.load().get(&key).cloned() {
            debug!(symbol = %key.symbol, bars = hit.len(), "cache hit");
            return Ok(hit);
        }

        info!(provider = self.provider.name(), symbol = %key.symbol, "cache miss; fetching daily bars");
        let series = Arc::new(self.provider.fetch_daily_bars(request).await?);

        self.entries.rcu(|current| {
            let mut next = Entries::clone(current);
            next.insert(key.clone(), Arc::clone(&series));
            next
        });

        Ok(series)
    }

    /// `true` if a successful fetch for exactly these parameters is cached.
    pub fn contains(&self, request: &BarsRequest) -> bool {
        self.entries.load().contains_key(&CacheKey::from(request))
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    /// Cached keys in the order they were first fetched.
    pub fn keys(&self) -> Vec<CacheKey> {
        self.entries.load().keys().cloned().collect()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.store(Arc::new(Entries::new()));
    }
}
