//! Filtering strategies for the dropdown list.
//!
//! The default strategy is a case-insensitive substring ranking; a fuzzy
//! scorer backed by nucleo-matcher is available as an alternative. Hosts can
//! supply their own strategy through [`FilterFn`].

use std::sync::Arc;

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

/// Result of a filter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterMatch {
    /// Index of the matched item in the original option list.
    pub index: usize,
    /// Match score (higher is better). The substring filter only uses
    /// 1 (prefix match) and 0 (interior match).
    pub score: u32,
}

/// A replaceable filter strategy.
///
/// Takes the query and the option labels, returns the retained indices in
/// display order.
pub type FilterFn = Arc<dyn Fn(&str, &[String]) -> Vec<FilterMatch> + Send + Sync>;

/// Default substring ranking.
///
/// Retains labels that contain the query case-insensitively. Prefix matches
/// come before interior matches; within each group, labels are ordered
/// case-insensitively, with the original index as the final tie-break so the
/// ordering is total. An empty query returns every item in original order.
pub fn substring_filter(query: &str, labels: &[String]) -> Vec<FilterMatch> {
    if query.is_empty() {
        return labels
            .iter()
            .enumerate()
            .map(|(index, _)| FilterMatch { index, score: 0 })
            .collect();
    }

    let needle = query.to_lowercase();

    let mut matches: Vec<FilterMatch> = labels
        .iter()
        .enumerate()
        .filter_map(|(index, label)| {
            let haystack = label.to_lowercase();
            if haystack.contains(&needle) {
                let score = u32::from(haystack.starts_with(&needle));
                Some(FilterMatch { index, score })
            } else {
                None
            }
        })
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| {
                labels[a.index]
                    .to_lowercase()
                    .cmp(&labels[b.index].to_lowercase())
            })
            .then_with(|| a.index.cmp(&b.index))
    });

    matches
}

/// Fuzzy filter using nucleo-matcher.
///
/// Returns matches sorted by score (highest first). Empty query returns all
/// items with score 0. Not the default; install via
/// `Autocomplete::with_filter(Arc::new(fuzzy_filter))`.
pub fn fuzzy_filter(query: &str, labels: &[String]) -> Vec<FilterMatch> {
    if query.is_empty() {
        return labels
            .iter()
            .enumerate()
            .map(|(index, _)| FilterMatch { index, score: 0 })
            .collect();
    }

    let mut matcher = Matcher::new(Config::DEFAULT);
    let pattern = Pattern::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
    );

    let mut matches: Vec<FilterMatch> = labels
        .iter()
        .enumerate()
        .filter_map(|(index, label)| {
            let mut buf = Vec::new();
            let haystack = Utf32Str::new(label, &mut buf);
            pattern
                .score(haystack, &mut matcher)
                .map(|score| FilterMatch { index, score })
        })
        .collect();

    // Sort by score descending (higher score = better match)
    matches.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.index.cmp(&b.index)));

    matches
}
