//! Schema cache with per-key single-flight population
//!
//! One cache object per run. A key is retrieved at most once; concurrent
//! callers for the same uncached key wait on the in-flight retrieval, while
//! different keys populate independently. The outcome is stored either way:
//! a failed category stays failed for the rest of the run, so an offline run
//! pays the retrieval timeout once per category rather than once per file.

use crate::features::schema_cache::domain::SchemaCategory;
use crate::features::schema_cache::error::{SchemaFetchError, SchemaFetchResult};
use crate::features::schema_cache::ports::SchemaSource;
use moka::sync::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

type Outcome = Result<Arc<str>, SchemaFetchError>;

pub struct SchemaCache {
    source: Arc<dyn SchemaSource>,

    /// Retrieval outcomes, immutable for the rest of the run
    entries: Cache<SchemaCategory, Outcome>,

    /// Outbound retrievals issued (hit/miss accounting)
    retrievals: AtomicU64,
    hits: AtomicU64,
}

impl SchemaCache {
    pub fn new(source: Arc<dyn SchemaSource>) -> Self {
        Self {
            source,
            // Capacity covers the whole key set: entries are never evicted
            entries: Cache::new(SchemaCategory::ALL.len() as u64 * 2),
            retrievals: AtomicU64::new(0),
            hits: AtomicU64::new(0),
        }
    }

    /// Fetch by string key; unknown keys fail without I/O
    pub fn fetch(&self, key: &str) -> SchemaFetchResult<Arc<str>> {
        let category = SchemaCategory::from_key(key)
            .ok_or_else(|| SchemaFetchError::UnknownCategory(key.to_string()))?;
        self.fetch_category(category)
    }

    pub fn fetch_category(&self, category: SchemaCategory) -> SchemaFetchResult<Arc<str>> {
        if let Some(outcome) = self.entries.get(&category) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("schema cache hit: {}", category);
            return outcome;
        }

        self.entries.get_with(category, || {
            self.retrievals.fetch_add(1, Ordering::Relaxed);
            info!(
                "fetching {} schema from {}",
                category,
                self.source.describe()
            );
            let outcome = self.source.retrieve(category).map(Arc::<str>::from);
            if let Err(e) = &outcome {
                warn!("schema fetch failed, skipping {} for this run: {}", category, e);
            }
            outcome
        })
    }

    /// Number of outbound retrievals issued so far
    pub fn retrievals(&self) -> u64 {
        self.retrievals.load(Ordering::Relaxed)
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Whether `category` was retrieved successfully
    pub fn contains(&self, category: SchemaCategory) -> bool {
        matches!(self.entries.get(&category), Some(Ok(_)))
    }

    /// Whether `category` was attempted and failed during this run
    pub fn has_failed(&self, category: SchemaCategory) -> bool {
        matches!(self.entries.get(&category), Some(Err(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;
    use std::time::Duration;

    /// Source that counts retrievals and fails the first `failures` calls
    struct CountingSource {
        calls: AtomicUsize,
        failures: usize,
        delay: Duration,
    }

    impl CountingSource {
        fn new(failures: usize, delay: Duration) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures,
                delay,
            }
        }
    }

    impl SchemaSource for CountingSource {
        fn retrieve(&self, category: SchemaCategory) -> SchemaFetchResult<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(self.delay);
            if n < self.failures {
                return Err(SchemaFetchError::Unavailable("offline".to_string()));
            }
            Ok(format!("<grammar id=\"{}\"/>", category))
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    #[test]
    fn test_hit_after_miss_does_no_io() {
        let source = Arc::new(CountingSource::new(0, Duration::ZERO));
        let cache = SchemaCache::new(source.clone());

        let first = cache.fetch("list").unwrap();
        let second = cache.fetch("list").unwrap();

        assert_eq!(first, second);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_unknown_key_fails_immediately() {
        let source = Arc::new(CountingSource::new(0, Duration::ZERO));
        let cache = SchemaCache::new(source.clone());

        let err = cache.fetch("kanban").unwrap_err();
        assert_eq!(err, SchemaFetchError::UnknownCategory("kanban".to_string()));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_single_flight_for_same_key() {
        let source = Arc::new(CountingSource::new(0, Duration::from_millis(50)));
        let cache = Arc::new(SchemaCache::new(source.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.fetch("search").unwrap())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().contains("search"));
        }

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.retrievals(), 1);
    }

    #[test]
    fn test_different_keys_each_retrieved_once() {
        let source = Arc::new(CountingSource::new(0, Duration::from_millis(10)));
        let cache = Arc::new(SchemaCache::new(source.clone()));

        let handles: Vec<_> = ["common", "list", "common", "list"]
            .into_iter()
            .map(|key| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.fetch(key).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert!(cache.contains(SchemaCategory::Common));
        assert!(cache.contains(SchemaCategory::List));
    }

    #[test]
    fn test_failure_is_remembered_for_the_run() {
        let source = Arc::new(CountingSource::new(1, Duration::ZERO));
        let cache = SchemaCache::new(source.clone());

        let first = cache.fetch("graph").unwrap_err();
        let second = cache.fetch("graph").unwrap_err();

        assert_eq!(first, second);
        assert!(!cache.contains(SchemaCategory::Graph));
        assert!(cache.has_failed(SchemaCategory::Graph));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_concurrent_waiters_share_a_failure() {
        let source = Arc::new(CountingSource::new(usize::MAX, Duration::from_millis(50)));
        let cache = Arc::new(SchemaCache::new(source.clone()));

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.fetch("pivot"))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().is_err());
        }

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
