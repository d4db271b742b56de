//! Keyword matcher
//!
//! Scores a free-text query against every knowledge base entry and picks
//! the best one. Scoring is lexical:
//!
//! - every keyword contained in the lower-cased query adds `1.0`;
//! - every query token longer than three characters adds `0.5` per keyword
//!   it contains or is contained in.
//!
//! The raw score is divided by the number of tokens (at least one) and the
//! winner must be strictly above the threshold. Equal scores keep the
//! earlier entry.

use crate::core::knowledge::{Entry, KnowledgeBase};

/// Threshold used when the caller has no preference
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Weight of a keyword found anywhere in the query
pub const EXACT_WEIGHT: f64 = 1.0;

/// Weight of a keyword/token partial overlap
pub const PARTIAL_WEIGHT: f64 = 0.5;

/// Tokens must be longer than this to take part in partial matching
pub const MIN_PARTIAL_TOKEN_CHARS: usize = 3;

/// Winning entry of a query together with its normalized score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'a> {
    pub entry: &'a Entry,
    pub score: f64,
}

/// A query folded and tokenized once, reused for every entry
struct PreparedQuery<'q> {
    folded: &'q str,
    words: Vec<&'q str>,
}

impl<'q> PreparedQuery<'q> {
    fn new(folded: &'q str) -> Self {
        Self {
            folded,
            words: folded.split_whitespace().collect(),
        }
    }

    fn denominator(&self) -> f64 {
        self.words.len().max(1) as f64
    }
}

fn raw_score(entry: &Entry, query: &PreparedQuery<'_>) -> f64 {
    let keywords: Vec<String> = entry.keywords.iter().map(|k| k.to_lowercase()).collect();
    let mut score = 0.0;

    for keyword in &keywords {
        if query.folded.contains(keyword.as_str()) {
            score += EXACT_WEIGHT;
        }
    }

    for word in &query.words {
        if word.chars().count() <= MIN_PARTIAL_TOKEN_CHARS {
            continue;
        }

        for keyword in &keywords {
            if word.contains(keyword.as_str()) || keyword.contains(word) {
                score += PARTIAL_WEIGHT;
            }
        }
    }

    score
}

/// Normalized score of a single entry for `query`
pub fn normalized_score(entry: &Entry, query: &str) -> f64 {
    let folded = query.to_lowercase();
    let prepared = PreparedQuery::new(&folded);
    raw_score(entry, &prepared) / prepared.denominator()
}

/// Best entry strictly above `threshold`, with its score
pub fn best_match<'a>(kb: &'a KnowledgeBase, query: &str, threshold: f64) -> Option<MatchResult<'a>> {
    let folded = query.to_lowercase();
    let prepared = PreparedQuery::new(&folded);
    let denominator = prepared.denominator();

    let mut best: Option<MatchResult<'a>> = None;
    for entry in kb {
        let score = raw_score(entry, &prepared) / denominator;
        if score <= threshold {
            continue;
        }

        // strict comparison keeps the earlier entry on ties
        if best.map_or(true, |current| score > current.score) {
            best = Some(MatchResult { entry, score });
        }
    }

    best
}

/// Entry answering `query`, if any
pub fn search<'a>(kb: &'a KnowledgeBase, query: &str, threshold: f64) -> Option<&'a Entry> {
    best_match(kb, query, threshold).map(|m| m.entry)
}

impl KnowledgeBase {
    /// See [`search`]
    pub fn search(&self, query: &str, threshold: f64) -> Option<&Entry> {
        search(self, query, threshold)
    }

    /// See [`best_match`]
    pub fn best_match(&self, query: &str, threshold: f64) -> Option<MatchResult<'_>> {
        best_match(self, query, threshold)
    }
}
