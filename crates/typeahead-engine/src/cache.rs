//! LRU cache of finished suggestion lists.

use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use typeahead_core::types::{SearchOptions, Suggestions};

/// Identity of one (query, filter) combination.
///
/// The query is trimmed but keeps its case. The multi-category list is
/// sorted, so request order does not split entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    query: String,
    category: Option<String>,
    categories: Vec<String>,
    include_sub_categories: bool,
}

impl CacheKey {
    pub fn new(query: &str, options: &SearchOptions) -> Self {
        let mut categories = options.categories.clone();
        categories.sort();
        Self {
            query: query.trim().to_string(),
            category: options.single_category().map(str::to_string),
            categories,
            include_sub_categories: options.include_sub_categories,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|c:{}|cs:{}|sub:{}",
            self.query,
            self.category.as_deref().unwrap_or(""),
            self.categories.join(","),
            u8::from(self.include_sub_categories)
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Hits over lookups, `0.0` before the first lookup.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 { 0.0 } else { self.hits as f64 / total as f64 }
    }
}

/// Bounded map from [`CacheKey`] to shared results. Capacity 0 disables it.
pub struct ResultCache {
    entries: Option<LruCache<CacheKey, Suggestions>>,
    stats: CacheStats,
}

impl ResultCache {
    pub fn new(capacity: usize) -> Self {
        Self { entries: NonZeroUsize::new(capacity).map(LruCache::new), stats: CacheStats::default() }
    }

    /// Look up `key`, refreshing its recency on a hit.
    pub fn get(&mut self, key: &CacheKey) -> Option<Suggestions> {
        let hit = self.entries.as_mut().and_then(|entries| entries.get(key)).map(Arc::clone);
        match hit {
            Some(_) => {
                self.stats.hits += 1;
                tracing::debug!(key = %key, "result cache hit");
            }
            None => self.stats.misses += 1,
        }
        hit
    }

    /// Store `results`, evicting the least recently used entry when full.
    pub fn put(&mut self, key: CacheKey, results: Suggestions) {
        if let Some(entries) = self.entries.as_mut() {
            let full = entries.len() == entries.cap().get() && !entries.contains(&key);
            if let Some((evicted, _)) = entries.push(key, results).filter(|_| full) {
                tracing::trace!(key = %evicted, "result cache eviction");
            }
        }
    }

    /// Drop every entry. Hit and miss counters are kept.
    pub fn clear(&mut self) {
        if let Some(entries) = self.entries.as_mut() {
            entries.clear();
        }
    }

    /// Change capacity in place; shrinking evicts the least recent entries.
    pub fn resize(&mut self, capacity: usize) {
        let Some(cap) = NonZeroUsize::new(capacity) else {
            self.entries = None;
            return;
        };
        match self.entries.as_mut() {
            Some(entries) => entries.resize(cap),
            None => self.entries = Some(LruCache::new(cap)),
        }
    }

    pub fn len(&self) -> usize { self.entries.as_ref().map_or(0, LruCache::len) }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn capacity(&self) -> usize { self.entries.as_ref().map_or(0, |entries| entries.cap().get()) }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.as_ref().is_some_and(|entries| entries.contains(key))
    }

    pub fn stats(&self) -> CacheStats { self.stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeahead_core::types::RankedResult;

    fn key(query: &str) -> CacheKey {
        CacheKey::new(query, &SearchOptions::default())
    }

    fn empty() -> Suggestions {
        Arc::from(Vec::<RankedResult>::new())
    }

    #[test]
    fn key_is_trimmed_case_sensitive_and_order_free() {
        assert_eq!(key("  iph "), key("iph"));
        assert_ne!(key("iph"), key("IPH"));
        let a = CacheKey::new("x", &SearchOptions::categories(["B", "A"]));
        let b = CacheKey::new("x", &SearchOptions::categories(["A", "B"]));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "x|c:|cs:A,B|sub:0");
    }

    #[test]
    fn key_distinguishes_filters() {
        let plain = key("x");
        let single = CacheKey::new("x", &SearchOptions::category("Phones"));
        let sub = CacheKey::new("x", &SearchOptions::category("Phones").with_sub_categories());
        assert_ne!(plain, single);
        assert_ne!(single, sub);
        assert_eq!(sub.to_string(), "x|c:Phones|cs:|sub:1");
        assert_eq!(CacheKey::new("x", &SearchOptions::category("")), plain);
    }

    #[test]
    fn hit_returns_same_allocation() {
        let mut cache = ResultCache::new(4);
        let stored = empty();
        cache.put(key("a"), Arc::clone(&stored));
        let hit = cache.get(&key("a")).expect("hit");
        assert!(Arc::ptr_eq(&hit, &stored));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 0 });
    }

    #[test]
    fn least_recently_used_is_evicted() {
        let mut cache = ResultCache::new(2);
        cache.put(key("a"), empty());
        cache.put(key("b"), empty());
        assert!(cache.get(&key("a")).is_some());
        cache.put(key("c"), empty());
        assert!(cache.contains(&key("a")));
        assert!(!cache.contains(&key("b")), "b was least recently used");
        assert!(cache.contains(&key("c")));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn zero_capacity_never_stores() {
        let mut cache = ResultCache::new(0);
        cache.put(key("a"), empty());
        assert!(cache.get(&key("a")).is_none());
        assert_eq!(cache.capacity(), 0);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn resize_shrinks_and_reenables() {
        let mut cache = ResultCache::new(3);
        for q in ["a", "b", "c"] {
            cache.put(key(q), empty());
        }
        cache.resize(1);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&key("c")));
        cache.resize(0);
        assert!(cache.is_empty());
        cache.resize(2);
        cache.put(key("d"), empty());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_keeps_counters() {
        let mut cache = ResultCache::new(2);
        cache.put(key("a"), empty());
        let _ = cache.get(&key("a"));
        cache.clear();
        assert!(cache.get(&key("a")).is_none());
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
        assert!((cache.stats().hit_rate() - 0.5).abs() < f64::EPSILON);
    }
}
