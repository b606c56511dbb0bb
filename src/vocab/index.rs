//! Compiled matchers ordered for longest-match-first evaluation.
//!
//! Every (label, variant) pair becomes a [`Matcher`]: an escaped literal pattern
//! plus an explicit boundary check. The `regex` crate has no lookaround, so the
//! "no ASCII letter or digit on either side" rule is enforced by inspecting the
//! characters adjacent to each candidate span.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::error::{VocabularyError, VocabularyResult};
use crate::vocab::Vocabulary;

/// How a variant is compared against the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePolicy {
    Insensitive,
    Exact,
}

impl std::fmt::Display for CasePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Insensitive => write!(f, "insensitive"),
            Self::Exact => write!(f, "exact"),
        }
    }
}

/// A boundary-protected matcher for one variant of one label.
#[derive(Debug, Clone)]
pub struct Matcher {
    label: String,
    variant: String,
    policy: CasePolicy,
    pattern: Regex,
    /// Variant length in characters, the sort key.
    len: usize,
}

impl Matcher {
    pub fn new(label: &str, variant: &str, policy: CasePolicy) -> VocabularyResult<Self> {
        let pattern = RegexBuilder::new(&regex::escape(variant))
            .case_insensitive(policy == CasePolicy::Insensitive)
            .build()
            .map_err(|e| VocabularyError::Pattern {
                label: label.to_string(),
                variant: variant.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            label: label.to_string(),
            variant: variant.to_string(),
            policy,
            pattern,
            len: variant.chars().count(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn policy(&self) -> CasePolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte span of the first boundary-valid occurrence in `text`.
    pub fn find(&self, text: &str) -> Option<Range<usize>> {
        self.occurrences(text).next()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    /// Every boundary-valid occurrence in `text`, left to right.
    ///
    /// A rejected candidate only advances the search by one character, so an
    /// overlapping occurrence that does sit on boundaries is still found.
    pub fn occurrences<'m, 't>(&'m self, text: &'t str) -> Occurrences<'m, 't> {
        Occurrences {
            pattern: &self.pattern,
            text,
            from: 0,
        }
    }
}

/// Iterator over boundary-valid spans of one matcher. See [`Matcher::occurrences`].
pub struct Occurrences<'m, 't> {
    pattern: &'m Regex,
    text: &'t str,
    from: usize,
}

impl Iterator for Occurrences<'_, '_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.from <= self.text.len() {
            let m = self.pattern.find_at(self.text, self.from)?;
            if is_boundary_before(self.text, m.start()) && is_boundary_after(self.text, m.end()) {
                self.from = m.end().max(m.start() + 1);
                return Some(m.range());
            }
            let step = self.text[m.start()..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            self.from = m.start() + step;
        }
        None
    }
}

fn is_boundary_before(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .is_none_or(|c| !c.is_ascii_alphanumeric())
}

fn is_boundary_after(text: &str, end: usize) -> bool {
    text[end..]
        .chars()
        .next()
        .is_none_or(|c| !c.is_ascii_alphanumeric())
}

/// All matchers of a vocabulary, longest variant first.
#[derive(Debug, Clone)]
pub struct VocabularyIndex {
    matchers: Vec<Matcher>,
}

impl VocabularyIndex {
    /// Compile every variant and order by character length, descending.
    ///
    /// The sort is stable: equal-length variants keep vocabulary source order.
    pub fn build(vocab: &Vocabulary) -> VocabularyResult<Self> {
        let mut matchers = Vec::new();
        for term in vocab.terms() {
            for variant in &term.variants {
                let policy = if vocab.is_case_sensitive(&term.label, variant) {
                    CasePolicy::Exact
                } else {
                    CasePolicy::Insensitive
                };
                matchers.push(Matcher::new(&term.label, variant, policy)?);
            }
        }
        matchers.sort_by(|a, b| b.len.cmp(&a.len));

        tracing::debug!(matchers = matchers.len(), "compiled vocabulary index");
        Ok(Self { matchers })
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::TermEntry;

    #[test]
    fn boundaries_reject_embedded_variant() {
        let m = Matcher::new("JavaScript", "js", CasePolicy::Insensitive).unwrap();
        assert!(m.find("nodejs developer").is_none());
        assert!(m.find("jsx").is_none());
        assert_eq!(m.find("we write js daily"), Some(9..11));
        assert!(m.is_match("js"));
    }

    #[test]
    fn punctuation_counts_as_boundary() {
        let m = Matcher::new("C++", "c++", CasePolicy::Insensitive).unwrap();
        assert!(m.is_match("(c++)"));
        assert!(m.is_match("c++."));
        assert!(!m.is_match("c++11"));
    }

    #[test]
    fn non_ascii_letters_are_boundaries() {
        let m = Matcher::new("Python", "python", CasePolicy::Insensitive).unwrap();
        assert!(m.is_match("þekking á python"));
        assert!(m.is_match("pythonþ"));
    }

    #[test]
    fn rejected_candidate_does_not_hide_later_one() {
        let m = Matcher::new("SQL", "sql", CasePolicy::Insensitive).unwrap();
        assert_eq!(m.find("mysql and sql"), Some(10..13));
    }

    #[test]
    fn occurrences_lists_every_valid_span() {
        let m = Matcher::new("SQL", "sql", CasePolicy::Insensitive).unwrap();
        let spans: Vec<_> = m.occurrences("sql, nosql, sql").collect();
        assert_eq!(spans, vec![0..3, 12..15]);
    }

    #[test]
    fn exact_policy_is_case_sensitive() {
        let m = Matcher::new("Go", "Go", CasePolicy::Exact).unwrap();
        assert!(m.is_match("written in Go."));
        assert!(!m.is_match("go to market"));
        assert!(!m.is_match("gogogo"));
        assert!(!m.is_match("GoGoGo"));
    }

    #[test]
    fn insensitive_policy_folds_case() {
        let m = Matcher::new("Docker", "docker", CasePolicy::Insensitive).unwrap();
        assert!(m.is_match("DOCKER compose"));
    }

    #[test]
    fn index_orders_longest_first_stably() {
        let vocab = Vocabulary::new(
            vec![
                TermEntry::new("SQL", &["sql"]),
                TermEntry::new("PostgreSQL", &["postgres", "postgresql"]),
                TermEntry::new("AWS", &["aws"]),
            ],
            [],
            vec![],
        )
        .unwrap();
        let index = VocabularyIndex::build(&vocab).unwrap();
        let order: Vec<_> = index.matchers().iter().map(|m| m.variant()).collect();
        assert_eq!(order, vec!["postgresql", "postgres", "sql", "aws"]);
    }

    #[test]
    fn index_applies_case_policy() {
        let vocab = Vocabulary::bundled().unwrap();
        let index = VocabularyIndex::build(&vocab).unwrap();
        let exact: Vec<_> = index
            .matchers()
            .iter()
            .filter(|m| m.policy() == CasePolicy::Exact)
            .map(|m| (m.label(), m.variant()))
            .collect();
        assert_eq!(exact, vec![("Go", "Go")]);
    }
}
