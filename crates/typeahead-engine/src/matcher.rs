//! Match-strategy selection.
//!
//! A query is tried against one target with a fixed chain of strategies,
//! highest priority first; the first one that applies decides the match kind
//! and its raw score. All comparisons are case-insensitive.

use typeahead_core::config::SearchConfig;
use typeahead_core::types::{MatchKind, MatchOutcome};

pub const PREFIX_SCORE: f64 = 100.0;
pub const CONTAINS_SCORE: f64 = 80.0;
pub const PHONETIC_SCORE: f64 = 70.0;
pub const PHONETIC_INITIALS_SCORE: f64 = 60.0;
pub const FUZZY_SCORE: f64 = 40.0;

/// Evaluation order of the strategy chain.
const STRATEGIES: [(MatchKind, f64); 5] = [
    (MatchKind::Prefix, PREFIX_SCORE),
    (MatchKind::Contains, CONTAINS_SCORE),
    (MatchKind::Phonetic, PHONETIC_SCORE),
    (MatchKind::PhoneticInitials, PHONETIC_INITIALS_SCORE),
    (MatchKind::Fuzzy, FUZZY_SCORE),
];

/// The searchable views of one item.
#[derive(Debug, Clone, Copy)]
pub struct MatchTarget<'a> {
    pub text: &'a str,
    pub phonetic: Option<&'a str>,
    pub initials: Option<&'a str>,
}

impl<'a> MatchTarget<'a> {
    /// A target with no phonetic views; phonetic strategies never apply.
    pub fn plain(text: &'a str) -> Self {
        Self { text, phonetic: None, initials: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matcher {
    pub enable_phonetic: bool,
    pub enable_fuzzy: bool,
}

impl Default for Matcher {
    fn default() -> Self {
        Self { enable_phonetic: true, enable_fuzzy: true }
    }
}

impl From<&SearchConfig> for Matcher {
    fn from(config: &SearchConfig) -> Self {
        Self { enable_phonetic: config.enable_phonetic, enable_fuzzy: config.enable_fuzzy }
    }
}

impl Matcher {
    pub fn new(enable_phonetic: bool, enable_fuzzy: bool) -> Self {
        Self { enable_phonetic, enable_fuzzy }
    }

    pub fn classify(&self, target: MatchTarget<'_>, query: &str) -> MatchOutcome {
        let text = target.text.to_lowercase();
        let phonetic = target.phonetic.map(str::to_lowercase);
        let initials = target.initials.map(str::to_lowercase);
        let folded = MatchTarget { text: &text, phonetic: phonetic.as_deref(), initials: initials.as_deref() };
        self.classify_folded(folded, &query.to_lowercase())
    }

    /// Like [`Matcher::classify`] when every view of `target` and the query
    /// are already lower-cased.
    pub fn classify_folded(&self, target: MatchTarget<'_>, query: &str) -> MatchOutcome {
        if query.is_empty() {
            return MatchOutcome::new(MatchKind::Prefix, 0.0);
        }
        for (kind, score) in STRATEGIES {
            if self.enabled(kind) && Self::applies(kind, &target, query) {
                return MatchOutcome::new(kind, score);
            }
        }
        MatchOutcome::new(MatchKind::Fuzzy, 0.0)
    }

    fn enabled(&self, kind: MatchKind) -> bool {
        match kind {
            MatchKind::Prefix | MatchKind::Contains => true,
            MatchKind::Phonetic | MatchKind::PhoneticInitials => self.enable_phonetic,
            MatchKind::Fuzzy => self.enable_fuzzy,
        }
    }

    fn applies(kind: MatchKind, target: &MatchTarget<'_>, query: &str) -> bool {
        match kind {
            MatchKind::Prefix => target.text.starts_with(query),
            MatchKind::Contains => target.text.contains(query),
            MatchKind::Phonetic => target.phonetic.is_some_and(|p| p.contains(query)),
            MatchKind::PhoneticInitials => target.initials.is_some_and(|p| p.contains(query)),
            MatchKind::Fuzzy => is_subsequence(target.text, query),
        }
    }
}

/// Every char of `query` appears in `text` in order, not necessarily adjacent.
pub fn is_subsequence(text: &str, query: &str) -> bool {
    if query.chars().count() > text.chars().count() {
        return false;
    }
    let mut wanted = query.chars().peekable();
    for ch in text.chars() {
        match wanted.peek() {
            Some(&q) if q == ch => {
                wanted.next();
            }
            Some(_) => {}
            None => break,
        }
    }
    wanted.peek().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn target<'a>(text: &'a str, phonetic: &'a str, initials: &'a str) -> MatchTarget<'a> {
        MatchTarget { text, phonetic: Some(phonetic), initials: Some(initials) }
    }

    #[rstest]
    #[case("iPhone 15", "iph", MatchKind::Prefix, 100.0)]
    #[case("iPhone 15", "IPHONE", MatchKind::Prefix, 100.0)]
    #[case("MacBook Pro", "book", MatchKind::Contains, 80.0)]
    #[case("MacBook Pro", "mcbk", MatchKind::Fuzzy, 40.0)]
    #[case("iPad Air", "iph", MatchKind::Fuzzy, 0.0)]
    #[case("ab", "abc", MatchKind::Fuzzy, 0.0)]
    fn plain_text_chain(#[case] text: &str, #[case] query: &str, #[case] kind: MatchKind, #[case] score: f64) {
        let outcome = Matcher::default().classify(MatchTarget::plain(text), query);
        assert_eq!(outcome, MatchOutcome::new(kind, score));
    }

    #[test]
    fn empty_query_is_zero_prefix() {
        let outcome = Matcher::default().classify(MatchTarget::plain("anything"), "");
        assert_eq!(outcome, MatchOutcome::new(MatchKind::Prefix, 0.0));
    }

    #[test]
    fn phonetic_then_initials() {
        let phone = target("苹果手机", "pingguoshouji", "pgsj");
        let matcher = Matcher::default();
        assert_eq!(matcher.classify(phone, "guoshou").kind, MatchKind::Phonetic);
        assert_eq!(matcher.classify(phone, "PGS").kind, MatchKind::PhoneticInitials);
        assert!((matcher.classify(phone, "pgsj").raw_score - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn higher_priority_wins() {
        // "pi" is a prefix of the text, of the reading, and a fuzzy subsequence
        let pixel = target("Pixel", "pixel", "p");
        assert_eq!(Matcher::default().classify(pixel, "pi").kind, MatchKind::Prefix);
    }

    #[test]
    fn disabled_phonetic_falls_through_to_fuzzy() {
        let phone = target("苹果手机", "pingguoshouji", "pgsj");
        let matcher = Matcher::new(false, true);
        let outcome = matcher.classify(phone, "pgsj");
        assert_eq!(outcome, MatchOutcome::new(MatchKind::Fuzzy, 0.0));
    }

    #[test]
    fn disabled_fuzzy_reports_failed_fuzzy() {
        let outcome = Matcher::new(true, false).classify(MatchTarget::plain("MacBook"), "mcbk");
        assert_eq!(outcome, MatchOutcome::new(MatchKind::Fuzzy, 0.0));
    }

    #[test]
    fn folded_views_are_compared_as_given() {
        let target = MatchTarget { text: "macbook pro", phonetic: Some("macbook pro"), initials: Some("mp") };
        let matcher = Matcher::default();
        assert_eq!(matcher.classify_folded(target, "mac").kind, MatchKind::Prefix);
        assert_eq!(matcher.classify_folded(target, "mp"), MatchOutcome::new(MatchKind::PhoneticInitials, 60.0));
        // upper-case views are not folded again
        let raw = MatchTarget::plain("MacBook");
        assert_eq!(matcher.classify_folded(raw, "mac"), MatchOutcome::new(MatchKind::Fuzzy, 0.0));
        assert_eq!(matcher.classify(raw, "mac").kind, MatchKind::Prefix);
    }

    #[test]
    fn subsequence_scan() {
        assert!(is_subsequence("macbook", "mcbk"));
        assert!(is_subsequence("airpods", "apo"));
        assert!(!is_subsequence("ipad air", "iph"));
        assert!(!is_subsequence("abc", "abcd"));
        assert!(is_subsequence("abc", ""));
        assert!(is_subsequence("华为手机", "华机"));
    }

    proptest! {
        #[test]
        fn any_prefix_classifies_as_prefix(text in "[a-zA-Z0-9 ]{1,24}", cut in 1usize..24) {
            let cut = cut.min(text.len());
            let query = &text[..cut];
            let outcome = Matcher::default().classify(MatchTarget::plain(&text), query);
            prop_assert_eq!(outcome, MatchOutcome::new(MatchKind::Prefix, PREFIX_SCORE));
        }

        #[test]
        fn scattered_subsequence_is_fuzzy(text in "[a-z]{4,24}", picks in proptest::collection::vec(any::<bool>(), 24)) {
            let query: String = text.chars().zip(picks.iter()).filter(|(_, keep)| **keep).map(|(c, _)| c).collect();
            prop_assume!(!query.is_empty() && !text.contains(query.as_str()));
            let outcome = Matcher::new(false, true).classify(MatchTarget::plain(&text), &query);
            prop_assert_eq!(outcome, MatchOutcome::new(MatchKind::Fuzzy, FUZZY_SCORE));
        }
    }
}
