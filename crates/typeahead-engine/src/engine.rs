//! Search orchestration: candidate selection, matching, ranking and caching.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use typeahead_core::config::{ConfigPatch, SearchConfig};
use typeahead_core::phonetic::ReadingTable;
use typeahead_core::traits::PhoneticProvider;
use typeahead_core::types::{CategoryStat, Item, MatchKind, RankedResult, SearchOptions, SearchReport, Suggestions};

use crate::cache::{CacheKey, ResultCache};
use crate::index::CategoryIndex;
use crate::matcher::{MatchTarget, Matcher};
use crate::scorer::Scorer;

/// Counters and sizes for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineStats {
    pub total_items: usize,
    pub total_categories: usize,
    pub cache_len: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Matcher invocations since construction.
    pub classifications: u64,
    pub categories: Vec<CategoryStat>,
}

/// In-memory suggestion engine over a mutable catalog.
///
/// Results are shared snapshots: a search hands out `Arc<Item>`s, and later
/// mutations replace catalog entries instead of rewriting them.
pub struct SearchEngine<P: PhoneticProvider = ReadingTable> {
    items: Vec<Arc<Item>>,
    /// Lower-cased `text` per slot.
    folded: Vec<String>,
    index: CategoryIndex,
    cache: ResultCache,
    config: SearchConfig,
    phonetic: P,
    classifications: u64,
}

impl SearchEngine<ReadingTable> {
    /// Default config and an empty reading table.
    pub fn with_defaults(items: impl IntoIterator<Item = Item>) -> Self {
        Self::new(items, SearchConfig::default(), ReadingTable::new())
    }
}

impl<P: PhoneticProvider> SearchEngine<P> {
    pub fn new(items: impl IntoIterator<Item = Item>, config: SearchConfig, phonetic: P) -> Self {
        let mut engine = Self {
            items: Vec::new(),
            folded: Vec::new(),
            index: CategoryIndex::default(),
            cache: ResultCache::new(config.cache_capacity),
            config,
            phonetic,
            classifications: 0,
        };
        let (items, folded): (Vec<_>, Vec<_>) = items.into_iter().map(|item| engine.ingest(item)).unzip();
        engine.items = items;
        engine.folded = folded;
        engine.index = CategoryIndex::build(&engine.items);
        tracing::info!(items = engine.items.len(), categories = engine.index.len(), "search engine ready");
        engine
    }

    /// Top `top_n` suggestions for `query` under `options`.
    ///
    /// A blank query lists the most popular candidates and bypasses the cache.
    pub fn search(&mut self, query: &str, options: &SearchOptions) -> Suggestions {
        let query = query.trim();
        if query.is_empty() {
            let mut hot = self.hot(options);
            hot.truncate(self.config.top_n);
            return hot.into();
        }

        let key = CacheKey::new(query, options);
        if let Some(hit) = self.cache.get(&key) {
            return hit;
        }
        tracing::debug!(key = %key, "result cache miss");

        let mut ranked = self.rank(query, options);
        ranked.truncate(self.config.top_n);
        let results: Suggestions = ranked.into();
        self.cache.put(key, Arc::clone(&results));
        results
    }

    /// Like [`SearchEngine::search`], plus per-category counts over every
    /// match before truncation. Never reads or writes the cache.
    pub fn search_with_category_stats(&mut self, query: &str, options: &SearchOptions) -> SearchReport {
        let query = query.trim();
        let mut results = if query.is_empty() { self.hot(options) } else { self.rank(query, options) };
        let category_stats = count_categories(&results);
        results.truncate(self.config.top_n);
        SearchReport { results, category_stats }
    }

    /// Merge `patch` over the current config. Always invalidates the cache.
    pub fn update_config(&mut self, patch: &ConfigPatch) {
        self.config.apply(patch);
        self.cache.resize(self.config.cache_capacity);
        self.cache.clear();
        tracing::info!(config = ?self.config, "search config updated");
    }

    pub fn add_item(&mut self, item: Item) {
        let (item, folded) = self.ingest(item);
        self.index.insert(self.items.len(), &item);
        self.items.push(item);
        self.folded.push(folded);
        self.cache.clear();
    }

    /// Append a batch and rebuild the category index once.
    pub fn add_items(&mut self, items: impl IntoIterator<Item = Item>) {
        let before = self.items.len();
        let (ingested, folded): (Vec<_>, Vec<_>) = items.into_iter().map(|item| self.ingest(item)).unzip();
        self.items.extend(ingested);
        self.folded.extend(folded);
        self.index = CategoryIndex::build(&self.items);
        self.cache.clear();
        tracing::info!(added = self.items.len() - before, total = self.items.len(), "category index rebuilt");
    }

    /// Set the popularity of the first item with `id`. Returns whether it
    /// was found; an unknown id changes nothing.
    pub fn update_popularity(&mut self, id: &str, popularity: f64) -> bool {
        let Some(slot) = self.items.iter().position(|item| item.id == id) else {
            tracing::debug!(id, "update_popularity: unknown id");
            return false;
        };
        Arc::make_mut(&mut self.items[slot]).popularity = popularity;
        self.cache.clear();
        true
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> EngineStats {
        let cache = self.cache.stats();
        EngineStats {
            total_items: self.items.len(),
            total_categories: self.index.len(),
            cache_len: self.cache.len(),
            cache_hits: cache.hits,
            cache_misses: cache.misses,
            classifications: self.classifications,
            categories: self
                .index
                .categories()
                .into_iter()
                .map(|(category, count)| CategoryStat { category: category.to_string(), count })
                .collect(),
        }
    }

    pub fn config(&self) -> &SearchConfig { &self.config }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn get(&self, id: &str) -> Option<&Arc<Item>> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[Arc<Item>] { &self.items }

    /// Fill in missing phonetic views and fold everything matching reads.
    /// Returns the stored item and its lower-cased text.
    fn ingest(&self, mut item: Item) -> (Arc<Item>, String) {
        let phonetic = item.phonetic.take().unwrap_or_else(|| self.phonetic.phonetic(&item.text));
        let initials = item.phonetic_initials.take().unwrap_or_else(|| self.phonetic.initials(&item.text));
        item.phonetic = Some(phonetic.to_lowercase());
        item.phonetic_initials = Some(initials.to_lowercase());
        let folded = item.text.to_lowercase();
        (Arc::new(item), folded)
    }

    // Multi-category beats single category; no filter means the whole catalog.
    fn candidates(&self, options: &SearchOptions) -> Cow<'_, [usize]> {
        if !options.categories.is_empty() {
            Cow::Owned(self.index.union_of(&options.categories, &self.items))
        } else if let Some(category) = options.single_category() {
            if options.include_sub_categories {
                Cow::Owned(self.index.with_sub_categories(category, &self.items))
            } else {
                Cow::Borrowed(self.index.get(category))
            }
        } else {
            Cow::Owned((0..self.items.len()).collect())
        }
    }

    /// Every candidate, most popular first, scored by popularity alone.
    fn hot(&self, options: &SearchOptions) -> Vec<RankedResult> {
        let mut hot: Vec<RankedResult> = self
            .candidates(options)
            .iter()
            .map(|&slot| {
                let item = &self.items[slot];
                RankedResult { item: Arc::clone(item), kind: MatchKind::Prefix, raw_score: 0.0, final_score: item.popularity }
            })
            .collect();
        hot.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
        hot
    }

    /// Full match set for a non-blank trimmed query, best first.
    fn rank(&mut self, query: &str, options: &SearchOptions) -> Vec<RankedResult> {
        let matcher = Matcher::from(&self.config);
        let scorer = Scorer::from(&self.config);
        let min_raw_score = self.config.min_raw_score;
        let folded = query.to_lowercase();

        let candidates = self.candidates(options);
        let mut ranked = Vec::new();
        for &slot in candidates.iter() {
            let item = &self.items[slot];
            let target = MatchTarget {
                text: &self.folded[slot],
                phonetic: item.phonetic.as_deref(),
                initials: item.phonetic_initials.as_deref(),
            };
            let outcome = matcher.classify_folded(target, &folded);
            if outcome.raw_score > min_raw_score {
                ranked.push(RankedResult {
                    item: Arc::clone(item),
                    kind: outcome.kind,
                    raw_score: outcome.raw_score,
                    final_score: scorer.score(outcome, item.popularity),
                });
            }
        }
        let classified = candidates.len() as u64;
        drop(candidates);
        self.classifications += classified;

        ranked.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
        tracing::debug!(query, candidates = classified, matched = ranked.len(), "ranked candidates");
        ranked
    }
}

/// Matches per category, most frequent first; ties keep first appearance.
fn count_categories(results: &[RankedResult]) -> Vec<CategoryStat> {
    let mut stats: Vec<CategoryStat> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for result in results {
        let category = result.item.category.as_str();
        match positions.get(category) {
            Some(&pos) => stats[pos].count += 1,
            None => {
                positions.insert(category, stats.len());
                stats.push(CategoryStat { category: category.to_string(), count: 1 });
            }
        }
    }
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SearchEngine {
        SearchEngine::with_defaults([
            Item::new("1", "iPhone 15", 90.0, "Phones"),
            Item::new("2", "MacBook", 80.0, "Laptops"),
            Item::new("3", "iPad Air", 70.0, "Tablets"),
        ])
    }

    #[test]
    fn ingestion_fills_missing_phonetics_only() {
        let mut engine = SearchEngine::new(
            [Item::new("a", "苹果", 10.0, "Fruit"), Item::new("b", "Pear", 5.0, "Fruit").with_phonetic("custom", "c")],
            SearchConfig::default(),
            ReadingTable::from_pairs([('苹', "ping"), ('果', "guo")]),
        );
        engine.add_item(Item::new("c", "果", 1.0, "Fruit"));

        assert_eq!(engine.get("a").and_then(|i| i.phonetic.as_deref()), Some("pingguo"));
        assert_eq!(engine.get("a").and_then(|i| i.phonetic_initials.as_deref()), Some("pg"));
        assert_eq!(engine.get("b").and_then(|i| i.phonetic.as_deref()), Some("custom"));
        assert_eq!(engine.get("c").and_then(|i| i.phonetic.as_deref()), Some("guo"));
    }

    #[test]
    fn supplied_readings_are_stored_lower_cased() {
        let mut engine = SearchEngine::with_defaults([Item::new("a", "苹果", 10.0, "Fruit").with_phonetic("PingGuo", "PG")]);
        assert_eq!(engine.get("a").and_then(|i| i.phonetic.as_deref()), Some("pingguo"));
        assert_eq!(engine.get("a").and_then(|i| i.phonetic_initials.as_deref()), Some("pg"));
        assert_eq!(engine.get("a").map(|i| i.text.as_str()), Some("苹果"));

        let results = engine.search("PG", &SearchOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, MatchKind::PhoneticInitials);

        engine.add_item(Item::new("b", "MacBook", 80.0, "Laptops"));
        let results = engine.search("MACB", &SearchOptions::default());
        assert_eq!(results.first().map(|r| (r.item.text.as_str(), r.kind)), Some(("MacBook", MatchKind::Prefix)));
    }

    #[test]
    fn category_stats_count_full_match_set() {
        let mut engine = engine();
        engine.update_config(&ConfigPatch { top_n: Some(1), ..ConfigPatch::default() });
        let report = engine.search_with_category_stats("i", &SearchOptions::default());

        assert_eq!(report.results.len(), 1);
        let total: usize = report.category_stats.iter().map(|s| s.count).sum();
        assert!(total >= 2, "stats cover untruncated matches: {:?}", report.category_stats);
        assert_eq!(engine.stats().cache_len, 0, "stats search does not populate the cache");
    }

    #[test]
    fn count_categories_orders_by_count_then_first_seen() {
        let engine = SearchEngine::with_defaults([
            Item::new("1", "a", 1.0, "X"),
            Item::new("2", "b", 1.0, "Y"),
            Item::new("3", "c", 1.0, "Y"),
            Item::new("4", "d", 1.0, "Z"),
        ]);
        let results: Vec<RankedResult> = engine
            .items()
            .iter()
            .map(|item| RankedResult { item: Arc::clone(item), kind: MatchKind::Prefix, raw_score: 0.0, final_score: 0.0 })
            .collect();
        let names: Vec<(String, usize)> = count_categories(&results).into_iter().map(|s| (s.category, s.count)).collect();
        assert_eq!(names, vec![("Y".to_string(), 2), ("X".to_string(), 1), ("Z".to_string(), 1)]);
    }

    #[test]
    fn min_raw_score_is_strict() {
        let mut engine = engine();
        engine.update_config(&ConfigPatch { min_raw_score: Some(80.0), ..ConfigPatch::default() });
        // "book" is a contains match (raw 80) and must be excluded
        assert!(engine.search("book", &SearchOptions::default()).is_empty());
        assert_eq!(engine.search("mac", &SearchOptions::default()).len(), 1);
    }

    #[test]
    fn popularity_update_keeps_old_snapshots() {
        let mut engine = engine();
        let before = engine.search("iph", &SearchOptions::default());
        assert!(engine.update_popularity("1", 10.0));
        assert!(!engine.update_popularity("missing", 1.0));

        assert!((before[0].item.popularity - 90.0).abs() < f64::EPSILON);
        let after = engine.search("iph", &SearchOptions::default());
        assert!((after[0].item.popularity - 10.0).abs() < f64::EPSILON);
        assert!(!Arc::ptr_eq(&before, &after));
    }
}
