//! Fuzzy matching and relevance scoring for launcher-style result lists.
//!
//! Given a short query and a candidate label, the engine decides whether the
//! candidate is a plausible match and assigns it an integer score so results
//! can be re-ranked on every keystroke:
//!
//! - [`query`]: split the query into whitespace-delimited terms
//! - [`align`]: align one term as a subsequence of the candidate
//! - [`aggregate`]: require every term and combine their alignments
//! - [`scoring`]: turn an alignment's geometry into a raw score
//! - [`precision`]: classify a raw score against a precision level
//! - [`matcher`]: the stateless entry points hosts call
//!
//! ```
//! use fuzzrank::{PrecisionLevel, score};
//!
//! let result = score("chr", "Google Chrome", PrecisionLevel::Regular);
//! assert!(result.passes);
//! assert_eq!(result.matched_indices, vec![7, 8, 9]);
//! ```

pub mod aggregate;
pub mod align;
pub mod matcher;
pub mod precision;
pub mod query;
pub mod scoring;

pub use aggregate::{MatchKind, RawMatch, match_terms};
pub use align::{Alignment, Candidate, align};
pub use matcher::{MatchResult, Ranked, StringMatcher, rank, score};
pub use precision::{Classification, PrecisionLevel, classify};
pub use query::{Query, Term, tokenize};
