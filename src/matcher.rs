//! Host-facing matching API.
//!
//! Every call is stateless: the configured precision travels with the
//! request, and scoring the same inputs twice yields identical results.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, trace};

use crate::aggregate::{MatchKind, match_terms};
use crate::align::Candidate;
use crate::precision::{PrecisionLevel, classify};
use crate::query::Query;

/// Outcome of matching one query against one candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Unnormalized score; 0 means no usable match.
    pub raw_score: u32,
    /// Raw score when it clears the precision level, 0 otherwise.
    pub normalized_score: u32,
    /// Matched char positions in the candidate, sorted and unique.
    pub matched_indices: Vec<usize>,
    /// Level the result was classified against.
    pub precision: PrecisionLevel,
    /// Whether the result clears `precision`.
    pub passes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<MatchKind>,
}

impl MatchResult {
    fn no_match(precision: PrecisionLevel) -> Self {
        let classification = classify(0, precision);
        Self {
            raw_score: 0,
            normalized_score: classification.normalized,
            matched_indices: Vec::new(),
            precision,
            passes: classification.passes,
            kind: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.raw_score > 0
    }

    pub fn is_precision_met(&self) -> bool {
        self.passes
    }
}

fn score_parsed(query: &Query<'_>, candidate: &str, precision: PrecisionLevel) -> MatchResult {
    let Some(matched) = match_terms(query, &Candidate::new(candidate)) else {
        return MatchResult::no_match(precision);
    };

    let raw_score = matched.raw_score();
    let kind = matched.kind();
    let classification = classify(raw_score, precision);
    trace!(candidate, raw_score, passes = classification.passes, "scored candidate");

    MatchResult {
        raw_score,
        normalized_score: classification.normalized,
        matched_indices: matched.into_indices(),
        precision,
        passes: classification.passes,
        kind: Some(kind),
    }
}

/// Score `candidate` against `query` at the given precision level.
///
/// Never fails: empty queries, blank queries and empty candidates all yield
/// a zero-score non-match.
pub fn score(query: &str, candidate: &str, precision: PrecisionLevel) -> MatchResult {
    score_parsed(&Query::parse(query), candidate, precision)
}

/// A candidate that survived ranking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Ranked {
    /// Position of the candidate in the input slice.
    pub index: usize,
    pub result: MatchResult,
}

/// Score every candidate and keep passing matches, best first.
///
/// Ties keep input order. With the `parallel` feature candidates are scored
/// on the rayon pool; the output is the same either way.
pub fn rank<S>(query: &str, candidates: &[S], precision: PrecisionLevel) -> Vec<Ranked>
where
    S: AsRef<str> + Sync,
{
    let parsed = Query::parse(query);
    if parsed.is_empty() {
        return Vec::new();
    }

    let keep = |(index, candidate): (usize, &S)| {
        let result = score_parsed(&parsed, candidate.as_ref(), precision);
        (result.is_match() && result.passes).then_some(Ranked { index, result })
    };

    #[cfg(feature = "parallel")]
    let mut ranked: Vec<Ranked> = candidates.par_iter().enumerate().filter_map(keep).collect();
    #[cfg(not(feature = "parallel"))]
    let mut ranked: Vec<Ranked> = candidates.iter().enumerate().filter_map(keep).collect();

    ranked.sort_by(|a, b| {
        b.result
            .raw_score
            .cmp(&a.result.raw_score)
            .then_with(|| a.index.cmp(&b.index))
    });

    debug!(
        query,
        candidates = candidates.len(),
        kept = ranked.len(),
        %precision,
        "ranked candidates"
    );
    ranked
}

/// A matcher bound to one precision level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StringMatcher {
    pub precision: PrecisionLevel,
}

impl StringMatcher {
    pub fn new(precision: PrecisionLevel) -> Self {
        Self { precision }
    }

    pub fn fuzzy_match(&self, query: &str, candidate: &str) -> MatchResult {
        score(query, candidate, self.precision)
    }

    pub fn rank<S>(&self, query: &str, candidates: &[S]) -> Vec<Ranked>
    where
        S: AsRef<str> + Sync,
    {
        rank(query, candidates, self.precision)
    }
}

// ============================================================================
// Tests
// ============================================================================
