//! Scoring and ranking of name records against a query.
//!
//! A record's composite score is `similarity + prefix`:
//!
//! - `similarity` is the best [`partial_ratio`] of the raw or translated query
//!   against the record name (0..=100).
//! - `prefix` is 100 when the name starts with either query form, 50 when the
//!   first three characters agree, else 0.
//!
//! A record is a candidate when `similarity` exceeds the threshold, or when
//! its phonetic code equals the query's. The phonetic path admits records at
//! any similarity. Results are sorted by composite score, descending, keeping
//! input order on ties.

use crate::fuzzy::partial_ratio;
use crate::normalize::{Normalizer, QueryVariant};
use crate::record::NameRecord;

pub const DEFAULT_THRESHOLD: u32 = 60;
pub const PREFIX_FULL: u32 = 100;
pub const PREFIX_HEAD: u32 = 50;
const HEAD_LEN: usize = 3;

/// Per-name sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signals {
    pub similarity: u32,
    pub prefix: u32,
    pub phonetic_match: bool,
}

impl Signals {
    pub fn composite(&self) -> u32 {
        self.similarity + self.prefix
    }

    pub fn is_candidate(&self, threshold: u32) -> bool {
        self.similarity > threshold || self.phonetic_match
    }
}

pub fn score(query: &QueryVariant, record_lower: &str, record_phonetic: Option<&str>) -> Signals {
    if query.is_empty() || record_lower.is_empty() {
        return Signals::default();
    }
    let similarity = partial_ratio(&query.raw, record_lower)
        .max(partial_ratio(&query.translated, record_lower));
    let phonetic_match = match (query.phonetic_code.as_deref(), record_phonetic) {
        (Some(q), Some(r)) => q == r,
        _ => false,
    };
    Signals { similarity, prefix: prefix_score(query, record_lower), phonetic_match }
}

pub fn prefix_score(query: &QueryVariant, record_lower: &str) -> u32 {
    let variants = [query.raw.as_str(), query.translated.as_str()];
    if variants.iter().any(|v| !v.is_empty() && record_lower.starts_with(v)) {
        return PREFIX_FULL;
    }
    if let Some(record_head) = head(record_lower) {
        if variants.iter().any(|v| head(v).as_deref() == Some(record_head.as_str())) {
            return PREFIX_HEAD;
        }
    }
    0
}

/// First three characters, or `None` for shorter strings.
fn head(s: &str) -> Option<String> {
    let h: String = s.chars().take(HEAD_LEN).collect();
    (h.chars().count() == HEAD_LEN).then_some(h)
}

/// One ranked candidate. Borrows the record from the caller's snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'a> {
    pub record: &'a NameRecord,
    pub similarity: u32,
    /// Ranking weight, `similarity + prefix`. Can exceed 100.
    pub score: u32,
    pub phonetic_match: bool,
}

impl MatchResult<'_> {
    /// User-facing percentage: the score capped at 100.
    pub fn confidence(&self) -> u32 {
        self.score.min(100)
    }
}

pub struct Matcher {
    normalizer: Normalizer,
    threshold: u32,
}

impl Matcher {
    pub fn new(normalizer: Normalizer, threshold: u32) -> Self {
        Self { normalizer, threshold }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Full search: every candidate, best first.
    pub fn search<'a>(&self, raw: &str, records: &'a [NameRecord]) -> Vec<MatchResult<'a>> {
        let query = self.normalizer.normalize_query(raw);
        self.rank_and_filter(&query, records, None)
    }

    /// Suggestions: the first `limit` entries of [`Matcher::search`].
    pub fn suggest<'a>(
        &self,
        raw: &str,
        records: &'a [NameRecord],
        limit: usize,
    ) -> Vec<MatchResult<'a>> {
        let query = self.normalizer.normalize_query(raw);
        self.rank_and_filter(&query, records, Some(limit))
    }

    pub fn rank_and_filter<'a>(
        &self,
        query: &QueryVariant,
        records: &'a [NameRecord],
        limit: Option<usize>,
    ) -> Vec<MatchResult<'a>> {
        if query.is_empty() {
            return Vec::new();
        }
        let mut results: Vec<MatchResult<'a>> = records
            .iter()
            .filter_map(|record| self.score_record(query, record))
            .collect();

        // `sort_by` is stable: equal scores keep record order.
        results.sort_by(|a, b| b.score.cmp(&a.score));

        if let Some(limit) = limit {
            results.truncate(limit);
        }
        results
    }

    /// Best signals over the record's name forms, or `None` if it is not a
    /// candidate. Records without a name never match.
    fn score_record<'a>(&self, query: &QueryVariant, record: &'a NameRecord) -> Option<MatchResult<'a>> {
        if !record.has_name() {
            return None;
        }
        let mut similarity = 0;
        let mut best = 0;
        let mut phonetic_match = false;
        for form in record.name_forms() {
            let name = self.normalizer.normalize_record_name(form);
            let signals = score(query, &name.lower, name.phonetic_code.as_deref());
            similarity = similarity.max(signals.similarity);
            best = best.max(signals.composite());
            phonetic_match |= signals.phonetic_match;
        }

        let overall = Signals { similarity, prefix: 0, phonetic_match };
        overall.is_candidate(self.threshold).then_some(MatchResult {
            record,
            similarity,
            score: best,
            phonetic_match,
        })
    }
}
