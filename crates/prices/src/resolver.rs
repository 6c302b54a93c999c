use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{Duration, Utc};
use models::AccountStatement;
use tracing::{debug, info, warn};

use crate::cache::PriceCache;
use crate::error::{PriceError, Result};
use crate::rate_limiter::RateLimiter;

/// Resolves identifiers to prices. The mapping may be partial.
pub trait PriceResolver {
    fn resolve(&self, identifiers: &BTreeSet<String>) -> HashMap<String, f64>;
}

/// One lookup per identifier against an external quote provider.
///
/// `Ok(None)` means the provider has no quote for the identifier.
pub trait QuoteSource {
    fn name(&self) -> &str;
    fn fetch(&self, identifier: &str) -> Result<Option<f64>>;
}

/// Quote source backed by a JSON file of `identifier → price`.
pub struct StaticPriceSource {
    prices: HashMap<String, f64>,
}

impl StaticPriceSource {
    pub fn new(prices: HashMap<String, f64>) -> Self {
        Self { prices }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| PriceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let prices = serde_json::from_str(&raw).map_err(|source| PriceError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(prices))
    }
}

impl QuoteSource for StaticPriceSource {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self, identifier: &str) -> Result<Option<f64>> {
        Ok(self.prices.get(identifier).copied())
    }
}

/// Cache-first resolver: fresh cache entries are reused, everything else
/// goes to the source through the rate limiter, and every new price is
/// persisted before the next lookup.
pub struct CachedResolver<S: QuoteSource> {
    source: S,
    cache: Mutex<PriceCache>,
    limiter: RateLimiter,
    max_age: Duration,
}

impl<S: QuoteSource> CachedResolver<S> {
    pub fn new(source: S, cache: PriceCache, limiter: RateLimiter, max_age: Duration) -> Self {
        Self {
            source,
            cache: Mutex::new(cache),
            limiter,
            max_age,
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, PriceCache> {
        self.cache.lock().unwrap_or_else(|poisoned| {
            warn!("Price cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn cached(&self, identifier: &str) -> Option<f64> {
        self.lock_cache().get_fresh(identifier, self.max_age, Utc::now())
    }

    fn store(&self, identifier: &str, price: f64) {
        let mut cache = self.lock_cache();
        cache.insert(identifier, price, Utc::now());
        if let Err(e) = cache.persist() {
            warn!("Could not persist price cache: {}", e.detail());
        }
    }
}

impl<S: QuoteSource> PriceResolver for CachedResolver<S> {
    fn resolve(&self, identifiers: &BTreeSet<String>) -> HashMap<String, f64> {
        let mut out = HashMap::new();
        let mut fetched = 0usize;

        for id in identifiers {
            if let Some(price) = self.cached(id) {
                out.insert(id.clone(), price);
                continue;
            }

            self.limiter.acquire();
            fetched += 1;
            match self.source.fetch(id) {
                Ok(Some(price)) if price.is_finite() && price > 0.0 => {
                    self.store(id, price);
                    out.insert(id.clone(), price);
                }
                Ok(Some(price)) => debug!("Ignoring non-positive quote {} for {}", price, id),
                Ok(None) => debug!("No quote from {} for {}", self.source.name(), id),
                Err(e) => warn!("Price lookup via {} failed: {}", self.source.name(), e.detail()),
            }
        }

        info!(
            "Resolved {}/{} identifiers ({} looked up via {})",
            out.len(),
            identifiers.len(),
            fetched,
            self.source.name()
        );
        out
    }
}

/// Prices every holding whose identifier was resolved. Returns the number
/// of holdings updated.
pub fn apply_prices(statement: &mut AccountStatement, prices: &HashMap<String, f64>) -> usize {
    let mut updated = 0;
    for holding in &mut statement.holdings {
        if let Some(&price) = prices.get(&holding.identifier) {
            holding.set_price(price);
            updated += 1;
        }
    }
    updated
}
