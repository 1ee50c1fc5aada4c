//! Query tokenization.
//!
//! A query is split on runs of whitespace into terms. Terms keep their
//! original casing; folding happens when they are compared against a
//! candidate.

/// One whitespace-free fragment of a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Term<'q> {
    text: &'q str,
}

impl<'q> Term<'q> {
    pub fn as_str(&self) -> &'q str {
        self.text
    }
}

/// Split `query` into terms, dropping empty fragments.
///
/// Leading, trailing and repeated whitespace is harmless. Duplicate terms are
/// kept in query order.
pub fn tokenize(query: &str) -> Vec<Term<'_>> {
    query
        .split_whitespace()
        .map(|text| Term { text })
        .collect()
}

/// A tokenized query plus the trimmed text the scoring formula measures.
///
/// The text's char count, inner whitespace included, is the query extent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query<'q> {
    text: &'q str,
    terms: Vec<Term<'q>>,
}

impl<'q> Query<'q> {
    pub fn parse(query: &'q str) -> Self {
        let text = query.trim();
        Self {
            text,
            terms: tokenize(text),
        }
    }

    /// The query with leading and trailing whitespace removed.
    pub fn text(&self) -> &'q str {
        self.text
    }

    pub fn terms(&self) -> &[Term<'q>] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(terms: &[Term<'a>]) -> Vec<&'a str> {
        terms.iter().map(Term::as_str).collect()
    }

    #[test]
    fn test_tokenize_splits_on_whitespace_runs() {
        assert_eq!(texts(&tokenize("sql  manag")), vec!["sql", "manag"]);
        assert_eq!(texts(&tokenize("  a\tb \n c ")), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tokenize_empty_and_blank() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t ").is_empty());
    }

    #[test]
    fn test_tokenize_keeps_case_and_duplicates() {
        assert_eq!(texts(&tokenize("Foo foo Foo")), vec!["Foo", "foo", "Foo"]);
    }

    #[test]
    fn test_query_keeps_inner_whitespace() {
        let q = Query::parse("  sql  manag ");
        assert_eq!(q.text(), "sql  manag");
        assert_eq!(q.terms().len(), 2);
    }

    #[test]
    fn test_blank_query_is_empty() {
        let q = Query::parse("   ");
        assert!(q.is_empty());
        assert_eq!(q.text(), "");
    }
}
