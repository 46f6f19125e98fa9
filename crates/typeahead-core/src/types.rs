//! Domain types shared by the engine, the catalog loader and the CLI.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub type ItemId = String;

/// One suggestion in the catalog.
///
/// - `id`: caller-guaranteed unique identifier
/// - `text`: display string, the only field queries are matched against
/// - `popularity`: hotness in `[0, 100]`, blended into the final score
/// - `category`/`parent_category`: one level of hierarchy; the category index
///   files an item under both
/// - `phonetic`/`phonetic_initials`: romanized reading of `text`, filled in at
///   ingestion when absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    #[serde(alias = "hotScore")]
    pub popularity: f64,
    pub category: String,
    #[serde(default, alias = "parentCategory", skip_serializing_if = "Option::is_none")]
    pub parent_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "pinyin", skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(default, alias = "pinyinFirst", skip_serializing_if = "Option::is_none")]
    pub phonetic_initials: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<String>, text: impl Into<String>, popularity: f64, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            popularity,
            category: category.into(),
            parent_category: None,
            description: None,
            phonetic: None,
            phonetic_initials: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_category = Some(parent.into());
        self
    }

    pub fn with_phonetic(mut self, phonetic: impl Into<String>, initials: impl Into<String>) -> Self {
        self.phonetic = Some(phonetic.into());
        self.phonetic_initials = Some(initials.into());
        self
    }
}

/// Which strategy produced a match. Declaration order is priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Prefix,
    Contains,
    Phonetic,
    PhoneticInitials,
    Fuzzy,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Prefix => write!(f, "prefix"),
            MatchKind::Contains => write!(f, "contains"),
            MatchKind::Phonetic => write!(f, "phonetic"),
            MatchKind::PhoneticInitials => write!(f, "phonetic_initials"),
            MatchKind::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

/// Classification of one (item, query) pair. Never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOutcome {
    pub kind: MatchKind,
    pub raw_score: f64,
}

impl MatchOutcome {
    pub const fn new(kind: MatchKind, raw_score: f64) -> Self {
        Self { kind, raw_score }
    }
}

/// A ranked suggestion. `item` is a snapshot shared with the catalog at the
/// time the result was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub item: Arc<Item>,
    pub kind: MatchKind,
    pub raw_score: f64,
    pub final_score: f64,
}

/// Ordered, immutable output of a search. Cache hits hand out the same
/// allocation again.
pub type Suggestions = Arc<[RankedResult]>;

/// Category filters accepted by a search.
///
/// `categories` wins over `category` when both are set and non-empty.
/// `include_sub_categories` only affects the single-category filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub category: Option<String>,
    pub categories: Vec<String>,
    #[serde(alias = "includeSubCategories")]
    pub include_sub_categories: bool,
}

impl SearchOptions {
    pub fn category(category: impl Into<String>) -> Self {
        Self { category: Some(category.into()), ..Self::default() }
    }

    pub fn categories<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { categories: categories.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    pub fn with_sub_categories(mut self) -> Self {
        self.include_sub_categories = true;
        self
    }

    /// The single-category filter; an empty name counts as unset.
    pub fn single_category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    pub fn has_filter(&self) -> bool {
        !self.categories.is_empty() || self.single_category().is_some()
    }
}

/// Count of matched items per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: String,
    pub count: usize,
}

/// Top-N results plus category counts over the whole match set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    pub results: Vec<RankedResult>,
    pub category_stats: Vec<CategoryStat>,
}
