//! Term extraction: normalized text in, ordered deduplicated labels out.
//!
//! Matchers are evaluated in the index's longest-first order. A label is
//! recorded the first time any of its variants hits.
//!
//! Every successful occurrence claims its span, including occurrences of a
//! label that is already recorded. A shorter variant of a different label
//! cannot match inside a claimed span, so "node.js" yields Node.js without
//! also yielding JavaScript through its "js" tail.

pub mod implication;

use std::collections::HashSet;
use std::ops::Range;

use crate::error::VocabularyResult;
use crate::vocab::{Vocabulary, VocabularyIndex};

pub use implication::ImplicationResolver;

/// Vocabulary index plus implication rules, built once and shared read-only.
#[derive(Debug, Clone)]
pub struct TermExtractor {
    index: VocabularyIndex,
    resolver: ImplicationResolver,
}

impl TermExtractor {
    pub fn new(vocab: &Vocabulary) -> VocabularyResult<Self> {
        Ok(Self {
            index: VocabularyIndex::build(vocab)?,
            resolver: ImplicationResolver::new(vocab.implications().to_vec()),
        })
    }

    /// Extractor over the bundled vocabulary.
    pub fn bundled() -> VocabularyResult<Self> {
        Self::new(&Vocabulary::bundled()?)
    }

    pub fn index(&self) -> &VocabularyIndex {
        &self.index
    }

    pub fn resolver(&self) -> &ImplicationResolver {
        &self.resolver
    }

    /// Labels present in `text`, before implication suppression.
    ///
    /// Order is the order in which each label's first matcher succeeded.
    pub fn extract_raw(&self, text: &str) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut claimed: Vec<Range<usize>> = Vec::new();
        let mut found = Vec::new();
        for matcher in self.index.matchers() {
            let hits: Vec<Range<usize>> = matcher
                .occurrences(text)
                .filter(|span| !overlaps_any(&claimed, span))
                .collect();
            if hits.is_empty() {
                continue;
            }
            if seen.insert(matcher.label()) {
                found.push(matcher.label().to_string());
            }
            claimed.extend(hits);
        }
        found
    }

    /// Final label set for one document.
    pub fn extract(&self, text: &str) -> Vec<String> {
        self.resolver.resolve(self.extract_raw(text))
    }
}

fn overlaps_any(claimed: &[Range<usize>], span: &Range<usize>) -> bool {
    claimed
        .iter()
        .any(|c| c.start < span.end && span.start < c.end)
}
