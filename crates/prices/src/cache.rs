//! Persistent identifier → price cache, stored as a JSON object.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PriceError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedPrice {
    pub price: f64,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct PriceCache {
    path: Option<PathBuf>,
    entries: BTreeMap<String, CachedPrice>,
}

impl PriceCache {
    /// A cache that lives only for this process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the cache at `path`. A missing file is an empty cache; an
    /// unreadable one is logged and replaced on the next write.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring unreadable price cache {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self {
            path: Some(path),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, identifier: &str) -> Option<&CachedPrice> {
        self.entries.get(identifier)
    }

    /// Cached price if it was fetched less than `max_age` before `now`.
    pub fn get_fresh(&self, identifier: &str, max_age: Duration, now: DateTime<Utc>) -> Option<f64> {
        self.entries
            .get(identifier)
            .filter(|c| now.signed_duration_since(c.fetched_at) < max_age)
            .map(|c| c.price)
    }

    pub fn insert(&mut self, identifier: impl Into<String>, price: f64, fetched_at: DateTime<Utc>) {
        self.entries
            .insert(identifier.into(), CachedPrice { price, fetched_at });
    }

    /// Writes the cache to disk. In-memory caches are a no-op.
    pub fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| PriceError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let body = serde_json::to_string_pretty(&self.entries).map_err(|source| PriceError::Json {
            path: path.clone(),
            source,
        })?;

        // Write-then-rename: the cache file on disk is never half written.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|source| PriceError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, path).map_err(|source| PriceError::Io {
            path: path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache/prices.json");

        let mut cache = PriceCache::load(&path);
        assert!(cache.is_empty());
        cache.insert("INE1", 101.5, Utc::now());
        cache.persist().unwrap();

        let reloaded = PriceCache::load(&path);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get("INE1").map(|c| c.price), Some(101.5));
    }

    #[test]
    fn test_get_fresh_respects_max_age() {
        let mut cache = PriceCache::in_memory();
        let now = Utc::now();
        cache.insert("OLD", 1.0, now - Duration::hours(30));
        cache.insert("NEW", 2.0, now - Duration::hours(1));

        assert_eq!(cache.get_fresh("OLD", Duration::hours(24), now), None);
        assert_eq!(cache.get_fresh("NEW", Duration::hours(24), now), Some(2.0));
        assert_eq!(cache.get_fresh("MISSING", Duration::hours(24), now), None);
    }

    #[test]
    fn test_corrupt_cache_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.json");
        fs::write(&path, "{ broken").unwrap();
        assert!(PriceCache::load(&path).is_empty());
    }
}
