//! Multi-term aggregation.
//!
//! Every term is aligned on its own against the whole candidate; terms may
//! appear in any order and may overlap. All terms are required. The combined
//! geometry of the per-term alignments is scored once, and matched indices
//! are the union of every term's positions.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::align::{Alignment, Candidate, align, align_acronym};
use crate::query::{Query, Term};
use crate::scoring::{Geometry, raw_score};

/// Which matcher produced a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Subsequence alignment of every term.
    Fuzzy,
    /// Single term matched against the candidate's acronym letters.
    Acronym,
}

impl MatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchKind::Fuzzy => "fuzzy",
            MatchKind::Acronym => "acronym",
        }
    }
}

/// An unclassified match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawMatch {
    raw_score: u32,
    indices: Vec<usize>,
    alignments: Vec<Alignment>,
    kind: MatchKind,
}

impl RawMatch {
    /// Always positive.
    pub fn raw_score(&self) -> u32 {
        self.raw_score
    }

    /// Sorted, de-duplicated matched positions.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Per-term alignments in query order.
    pub fn alignments(&self) -> &[Alignment] {
        &self.alignments
    }

    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }
}

fn fuzzy(alignments: Vec<Alignment>, query: &str, candidate: &Candidate) -> Option<RawMatch> {
    let geometry = Geometry::from_alignments(&alignments, query, candidate)?;
    let indices: BTreeSet<usize> = alignments
        .iter()
        .flat_map(|a| a.indices().iter().copied())
        .collect();

    Some(RawMatch {
        raw_score: raw_score(&geometry),
        indices: indices.into_iter().collect(),
        alignments,
        kind: MatchKind::Fuzzy,
    })
}

/// Score one term on its own.
///
/// The better of the subsequence alignment and the acronym match wins; a tie
/// keeps the subsequence alignment.
pub fn align_term(term: &Term<'_>, candidate: &Candidate) -> Option<RawMatch> {
    let fuzzy_match = align(term, candidate)
        .and_then(|a| fuzzy(vec![a], term.as_str(), candidate));

    let acronym = align_acronym(term, candidate);

    match (fuzzy_match, acronym) {
        (Some(f), Some(a)) if a.score() > f.raw_score => Some(RawMatch {
            raw_score: a.score(),
            indices: a.indices().to_vec(),
            alignments: f.alignments,
            kind: MatchKind::Acronym,
        }),
        (Some(f), _) => Some(f),
        // An acronym match implies a subsequence alignment.
        (None, _) => None,
    }
}

/// Match every term of `query` against `candidate`.
///
/// Returns `None` for an empty query or when any term fails to align.
pub fn match_terms(query: &Query<'_>, candidate: &Candidate) -> Option<RawMatch> {
    match query.terms() {
        [] => None,
        [term] => align_term(term, candidate),
        terms => {
            let alignments = terms
                .iter()
                .map(|t| align(t, candidate))
                .collect::<Option<Vec<_>>>()?;
            fuzzy(alignments, query.text(), candidate)
        }
    }
}
