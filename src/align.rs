//! Single-term alignment.
//!
//! A term aligns with a candidate when its folded chars form an ordered
//! (not necessarily contiguous) subsequence of the candidate's folded chars.
//! Among all such alignments the aligner picks the one that:
//! - completes earliest in the candidate (smallest last index)
//! - is tightest among those (latest first index)
//!
//! Both are found with one dynamic-programming pass over
//! (term position, candidate position). Indices are char positions into the
//! original candidate text.
//!
//! Acronym alignment is a separate, coarser match against word-start
//! capitals and camelCase humps, used for single-term queries.

use crate::query::Term;

/// Fold a char for comparison. Always maps one char to one char so folded
/// positions line up with the original text.
pub fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Chars that separate words: anything that is neither a letter nor a digit.
pub fn is_separator(c: char) -> bool {
    !c.is_alphanumeric()
}

/// A candidate prepared for repeated alignment.
#[derive(Clone, Debug)]
pub struct Candidate {
    chars: Vec<char>,
    folded: Vec<char>,
}

impl Candidate {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let folded = chars.iter().copied().map(fold).collect();
        Self { chars, folded }
    }

    /// Number of chars in the candidate.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Whether `text` equals the candidate under folding.
    pub fn folded_eq(&self, text: &str) -> bool {
        text.chars().map(fold).eq(self.folded.iter().copied())
    }

    /// Chars between the nearest separator before `idx` and `idx` itself.
    ///
    /// Zero when `idx` starts a word; `idx` when no separator precedes it.
    pub fn word_offset(&self, idx: usize) -> usize {
        self.chars[..idx]
            .iter()
            .rposition(|&c| is_separator(c))
            .map_or(idx, |sep| idx - sep - 1)
    }

    /// Whether the char at `idx` counts as an acronym letter.
    ///
    /// The first char, an uppercase letter not preceded by another uppercase
    /// letter, or a digit opening a whitespace-delimited word.
    pub fn is_acronym_char(&self, idx: usize) -> bool {
        let c = self.chars[idx];
        if c.is_whitespace() {
            return false;
        }
        if idx == 0 {
            return true;
        }
        let prev = self.chars[idx - 1];
        (c.is_uppercase() && !prev.is_uppercase()) || (c.is_numeric() && prev.is_whitespace())
    }
}

/// Matched candidate positions of one term, strictly increasing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alignment {
    indices: Vec<usize>,
}

impl Alignment {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// First matched position.
    pub fn start(&self) -> usize {
        self.indices[0]
    }

    /// One past the last matched position.
    pub fn end(&self) -> usize {
        self.indices[self.indices.len() - 1] + 1
    }

    /// Width of the candidate window the alignment occupies.
    pub fn span(&self) -> usize {
        self.end() - self.start()
    }

    /// True when the term matched as one contiguous run.
    pub fn is_contiguous(&self) -> bool {
        self.span() == self.indices.len()
    }
}

/// Align `term` against `candidate`.
///
/// Returns `None` if the folded term is not a subsequence of the folded
/// candidate, or if the term is empty.
pub fn align(term: &Term<'_>, candidate: &Candidate) -> Option<Alignment> {
    let needle: Vec<char> = term.as_str().chars().map(fold).collect();
    let haystack = &candidate.folded;
    let n = haystack.len();

    if needle.is_empty() || needle.len() > n {
        return None;
    }

    // prev[j]: latest start of an alignment of needle[..=i] with needle[i] at j.
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut curr: Vec<Option<usize>> = vec![None; n];

    let first = needle[0];
    for (j, &c) in haystack.iter().enumerate() {
        if c == first {
            prev[j] = Some(j);
        }
    }

    for &want in &needle[1..] {
        curr.fill(None);

        // best = max_{k<j} prev[k]
        let mut best: Option<usize> = None;

        for j in 0..n {
            if j > 0
                && let Some(start) = prev[j - 1]
            {
                best = Some(best.map_or(start, |b| b.max(start)));
            }

            if haystack[j] == want {
                curr[j] = best;
            }
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    let (last, start) = prev
        .iter()
        .enumerate()
        .find_map(|(j, start)| start.map(|s| (j, s)))?;

    // Leftmost positions inside the window; lands on the contiguous run if any.
    let mut indices = Vec::with_capacity(needle.len());
    for (j, &c) in haystack.iter().enumerate().take(last + 1).skip(start) {
        if indices.len() < needle.len() && c == needle[indices.len()] {
            indices.push(j);
        }
    }
    debug_assert_eq!(indices.len(), needle.len());
    debug_assert_eq!(indices.last(), Some(&last));

    Some(Alignment { indices })
}

/// A term matched against the candidate's acronym letters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcronymMatch {
    indices: Vec<usize>,
    total: usize,
}

impl AcronymMatch {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of acronym letters in the whole candidate.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Share of the candidate's acronym letters the term covered, in percent.
    pub fn score(&self) -> u32 {
        (self.indices.len() * 100 / self.total) as u32
    }
}

/// Match every char of `term` against successive acronym letters.
pub fn align_acronym(term: &Term<'_>, candidate: &Candidate) -> Option<AcronymMatch> {
    let needle: Vec<char> = term.as_str().chars().map(fold).collect();
    if needle.is_empty() || candidate.is_empty() {
        return None;
    }

    let mut indices = Vec::with_capacity(needle.len());
    let mut total = 0usize;

    for idx in 0..candidate.len() {
        if !candidate.is_acronym_char(idx) {
            continue;
        }
        total += 1;
        if indices.len() < needle.len() && candidate.folded[idx] == needle[indices.len()] {
            indices.push(idx);
        }
    }

    if indices.len() == needle.len() {
        Some(AcronymMatch { indices, total })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::tokenize;

    fn align_str(term: &str, candidate: &str) -> Option<Vec<usize>> {
        let terms = tokenize(term);
        align(&terms[0], &Candidate::new(candidate)).map(|a| a.indices().to_vec())
    }

    fn acronym_str(term: &str, candidate: &str) -> Option<AcronymMatch> {
        let terms = tokenize(term);
        align_acronym(&terms[0], &Candidate::new(candidate))
    }

    #[test]
    fn test_align_none_when_not_subsequence() {
        assert_eq!(align_str("abc", "acb"), None);
        assert_eq!(align_str("chrome", "Candy Crush Saga from King"), None);
        assert_eq!(align_str("abcd", "abc"), None);
    }

    #[test]
    fn test_align_is_case_insensitive() {
        assert_eq!(align_str("FOO", "foo"), Some(vec![0, 1, 2]));
        assert_eq!(align_str("foo", "FOO"), Some(vec![0, 1, 2]));
    }

    #[test]
    fn test_align_prefers_word_after_stray_chars() {
        // "chr" must land on "chrome", not on scattered earlier chars.
        assert_eq!(align_str("chr", "Last is chrome"), Some(vec![8, 9, 10]));
    }

    #[test]
    fn test_align_tightens_window_to_contiguous_run() {
        // The stray "s" of "Microsoft" is skipped for the "SQL" run.
        assert_eq!(
            align_str("sql", "Microsoft SQL Server Management Studio"),
            Some(vec![10, 11, 12])
        );
    }

    #[test]
    fn test_align_completes_earliest() {
        // The first completed alignment wins over a later word-start run.
        let indices = align_str("chrome", "Help cure hope raise on mind entity Chrome").unwrap();
        assert_eq!(indices, vec![5, 10, 15, 21, 24, 29]);
    }

    #[test]
    fn test_align_latest_start_within_window() {
        // Window ending at "t" starts at the "i" of "in", not the "i" of "file".
        let indices = align_str("inst", "file open in browser-test").unwrap();
        assert_eq!(indices, vec![10, 11, 17, 21]);
    }

    #[test]
    fn test_alignment_geometry() {
        let terms = tokenize("abc");
        let a = align(&terms[0], &Candidate::new("xa_bc")).unwrap();
        assert_eq!(a.start(), 1);
        assert_eq!(a.end(), 5);
        assert_eq!(a.span(), 4);
        assert!(!a.is_contiguous());

        let b = align(&terms[0], &Candidate::new("xabc")).unwrap();
        assert!(b.is_contiguous());
    }

    #[test]
    fn test_align_unicode_positions_are_chars() {
        assert_eq!(align_str("é", "café"), Some(vec![3]));
        assert_eq!(align_str("ÉT", "été"), Some(vec![0, 1]));
    }

    #[test]
    fn test_word_offset() {
        let c = Candidate::new("Last is chrome");
        assert_eq!(c.word_offset(8), 0);
        assert_eq!(c.word_offset(10), 2);
        assert_eq!(c.word_offset(0), 0);
        let c = Candidate::new("Cygwin64 Terminal");
        assert_eq!(c.word_offset(3), 3);
        let c = Candidate::new("browser-test");
        assert_eq!(c.word_offset(8), 0);
    }

    #[test]
    fn test_acronym_chars() {
        let c = Candidate::new("Oracle VM VirtualBox");
        let acr: Vec<usize> = (0..c.len()).filter(|&i| c.is_acronym_char(i)).collect();
        assert_eq!(acr, vec![0, 7, 10, 17]);

        let c = Candidate::new("Visual Studio 2019");
        assert!(c.is_acronym_char(14));
        assert!(!c.is_acronym_char(15));
    }

    #[test]
    fn test_acronym_match_scores_coverage() {
        let m = acronym_str("vsc", "Visual Studio Code").unwrap();
        assert_eq!(m.indices(), &[0, 7, 14]);
        assert_eq!(m.score(), 100);

        let m = acronym_str("ovv", "Oracle VM VirtualBox").unwrap();
        assert_eq!(m.total(), 4);
        assert_eq!(m.score(), 75);
    }

    #[test]
    fn test_lowercase_word_starts_are_not_acronym_chars() {
        let c = Candidate::new("Help cure hope raise on mind entity Chrome");
        let acr: Vec<usize> = (0..c.len()).filter(|&i| c.is_acronym_char(i)).collect();
        assert_eq!(acr, vec![0, 36]);

        let c = Candidate::new("visual studio code");
        assert!((1..c.len()).all(|i| !c.is_acronym_char(i)));
    }

    #[test]
    fn test_folded_eq() {
        let c = Candidate::new("Vim");
        assert!(c.folded_eq("vim"));
        assert!(c.folded_eq("VIM"));
        assert!(!c.folded_eq("vi"));
        assert!(!c.folded_eq("vim "));
    }

    #[test]
    fn test_acronym_requires_every_char() {
        assert!(acronym_str("vsx", "Visual Studio Code").is_none());
        assert!(acronym_str("chrome", "Help cure hope raise on mind entity Chrome").is_none());
    }
}
