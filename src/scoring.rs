//! Raw-score formula.
//!
//! A match is summarized by its geometry in the candidate and scored as:
//! - proximity: the query extent against the leading gap plus window width
//! - closeness: a bonus when the candidate is barely longer than the query,
//!   largest when the two are equal
//! - contiguity: a per-char bonus when every term matched as one run
//!
//! The weights are part of the public contract (an exact six-char match
//! scores 157), so hosts can display or threshold raw scores directly.

use crate::align::{Alignment, Candidate};

// Proximity: 100 * (extent + 1) / ((1 + offset) + (span + 1)).
const PROXIMITY_SCALE: u64 = 100;

// Closeness tiers on candidate length minus query extent.
const EXACT_BONUS: u32 = 20;
const CLOSE_SLACK: i64 = 5;
const CLOSE_BONUS: u32 = 15;
const NEAR_SLACK: i64 = 10;
const NEAR_BONUS: u32 = 10;

// Contiguity: full rate for the first few chars, half rate after.
const CONTIGUOUS_HEAD_CHARS: usize = 4;
const CONTIGUOUS_HEAD_BONUS: u32 = 10;
const CONTIGUOUS_TAIL_BONUS: u32 = 5;

/// Where and how a query landed in a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// First matched position over all terms.
    pub first: usize,
    /// One past the last matched position over all terms.
    pub end: usize,
    /// Chars skipped between the start of the word and `first`.
    pub offset: usize,
    /// Trimmed query length in chars, capped at the window width.
    pub extent: usize,
    /// Candidate length in chars.
    pub candidate_len: usize,
    /// Every term matched as a contiguous run.
    pub contiguous: bool,
    /// Distinct matched positions over all terms.
    pub matched: usize,
    /// The folded query equals the folded candidate.
    pub exact: bool,
}

impl Geometry {
    /// Combine per-term alignments into one geometry.
    ///
    /// `query` is the trimmed query text. Its extent is capped at the matched
    /// window, so padding a query with whitespace or repeating overlapping
    /// terms cannot inflate proximity. Returns `None` for an empty alignment
    /// set.
    pub fn from_alignments(
        alignments: &[Alignment],
        query: &str,
        candidate: &Candidate,
    ) -> Option<Self> {
        let first = alignments.iter().map(Alignment::start).min()?;
        let end = alignments.iter().map(Alignment::end).max()?;

        let mut positions: Vec<usize> = alignments
            .iter()
            .flat_map(|a| a.indices().iter().copied())
            .collect();
        positions.sort_unstable();
        positions.dedup();

        Some(Self {
            first,
            end,
            offset: candidate.word_offset(first),
            extent: query.chars().count().min(end - first),
            candidate_len: candidate.len(),
            contiguous: alignments.iter().all(Alignment::is_contiguous),
            matched: positions.len(),
            exact: candidate.folded_eq(query),
        })
    }

    pub fn span(&self) -> usize {
        self.end - self.first
    }
}

fn proximity(g: &Geometry) -> u32 {
    let numerator = PROXIMITY_SCALE * (g.extent as u64 + 1);
    let denominator = (1 + g.offset as u64) + (g.span() as u64 + 1);
    u32::try_from(numerator / denominator).unwrap_or(u32::MAX)
}

fn closeness(g: &Geometry) -> u32 {
    let slack = g.candidate_len as i64 - g.extent as i64;
    if g.exact {
        EXACT_BONUS
    } else if slack < CLOSE_SLACK {
        CLOSE_BONUS
    } else if slack < NEAR_SLACK {
        NEAR_BONUS
    } else {
        0
    }
}

fn contiguity(g: &Geometry) -> u32 {
    if !g.contiguous {
        return 0;
    }
    let head = g.matched.min(CONTIGUOUS_HEAD_CHARS);
    let tail = g.matched - head;
    let bonus = head as u64 * CONTIGUOUS_HEAD_BONUS as u64 + tail as u64 * CONTIGUOUS_TAIL_BONUS as u64;
    u32::try_from(bonus).unwrap_or(u32::MAX)
}

/// Score a matched geometry. Never zero: zero is reserved for "no match".
pub fn raw_score(g: &Geometry) -> u32 {
    proximity(g)
        .saturating_add(closeness(g))
        .saturating_add(contiguity(g))
        .max(1)
}
