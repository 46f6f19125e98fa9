//! Final-score blending.

use typeahead_core::config::SearchConfig;
use typeahead_core::types::{MatchKind, MatchOutcome};

/// Per-kind multiplier applied to the raw match score.
pub fn type_weight(kind: MatchKind) -> f64 {
    match kind {
        MatchKind::Prefix => 1.2,
        MatchKind::Contains => 1.0,
        MatchKind::Phonetic => 0.9,
        MatchKind::PhoneticInitials => 0.8,
        MatchKind::Fuzzy => 0.7,
    }
}

/// `raw * type_weight(kind) * match_weight + popularity * popularity_weight`.
/// No normalization or clamping.
pub fn final_score(raw_score: f64, popularity: f64, kind: MatchKind, match_weight: f64, popularity_weight: f64) -> f64 {
    raw_score * type_weight(kind) * match_weight + popularity * popularity_weight
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorer {
    pub match_weight: f64,
    pub popularity_weight: f64,
}

impl From<&SearchConfig> for Scorer {
    fn from(config: &SearchConfig) -> Self {
        Self { match_weight: config.match_weight, popularity_weight: config.popularity_weight }
    }
}

impl Scorer {
    pub fn score(&self, outcome: MatchOutcome, popularity: f64) -> f64 {
        final_score(outcome.raw_score, popularity, outcome.kind, self.match_weight, self.popularity_weight)
    }
}
