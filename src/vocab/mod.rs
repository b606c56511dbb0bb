//! Controlled technology vocabulary.
//!
//! A vocabulary maps canonical labels (e.g. "React") onto the textual variants
//! that should resolve to them ("react", "reactjs", "react.js"), together with
//! two small closed rule sets:
//!
//! - **Case-sensitive variants**: (label, variant) pairs that must match with
//!   exact case because case-folding would collide with common words.
//! - **Implication rules**: a parent label suppresses its child labels within
//!   a single document.
//!
//! The default vocabulary is bundled from `data/vocabulary.toml`. A custom one
//! can be loaded from any TOML file with the same layout.

pub mod index;

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::{VocabularyError, VocabularyResult};

pub use index::{CasePolicy, Matcher, VocabularyIndex};

const BUNDLED_TOML: &str = include_str!("../../data/vocabulary.toml");

/// A canonical label with its ordered textual variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry {
    pub label: String,
    pub variants: Vec<String>,
    /// Reporting group, e.g. "Databases".
    pub category: Option<String>,
}

impl TermEntry {
    pub fn new(label: &str, variants: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            variants: variants.iter().map(|v| v.to_string()).collect(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }
}

/// Drop `drops` from a document's labels whenever `parent` is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplicationRule {
    pub parent: String,
    pub drops: Vec<String>,
}

impl ImplicationRule {
    pub fn new(parent: &str, drops: &[&str]) -> Self {
        Self {
            parent: parent.to_string(),
            drops: drops.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// A validated, immutable vocabulary.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    terms: Vec<TermEntry>,
    case_sensitive: HashSet<(String, String)>,
    implications: Vec<ImplicationRule>,
}

impl Vocabulary {
    /// Build a vocabulary, validating every cross-reference.
    ///
    /// `case_sensitive` pairs must name an existing (label, variant) exactly, and
    /// implication rules may only reference defined labels.
    pub fn new(
        terms: Vec<TermEntry>,
        case_sensitive: impl IntoIterator<Item = (String, String)>,
        implications: Vec<ImplicationRule>,
    ) -> VocabularyResult<Self> {
        let mut labels = HashSet::new();
        for term in &terms {
            if !labels.insert(term.label.as_str()) {
                return Err(VocabularyError::DuplicateLabel {
                    label: term.label.clone(),
                });
            }
            if term.variants.is_empty() {
                return Err(VocabularyError::NoVariants {
                    label: term.label.clone(),
                });
            }
            if term.variants.iter().any(|v| v.is_empty()) {
                return Err(VocabularyError::EmptyVariant {
                    label: term.label.clone(),
                });
            }
        }

        let case_sensitive: HashSet<(String, String)> = case_sensitive.into_iter().collect();
        for (label, variant) in &case_sensitive {
            let known = terms
                .iter()
                .any(|t| &t.label == label && t.variants.iter().any(|v| v == variant));
            if !known {
                return Err(VocabularyError::UnknownCaseVariant {
                    label: label.clone(),
                    variant: variant.clone(),
                });
            }
        }

        for rule in &implications {
            for label in std::iter::once(&rule.parent).chain(rule.drops.iter()) {
                if !labels.contains(label.as_str()) {
                    return Err(VocabularyError::UnknownLabel {
                        label: label.clone(),
                    });
                }
            }
        }

        Ok(Self {
            terms,
            case_sensitive,
            implications,
        })
    }

    /// The vocabulary shipped with the crate.
    pub fn bundled() -> VocabularyResult<Self> {
        Self::from_toml_str(BUNDLED_TOML)
    }

    /// Load a vocabulary from a TOML file.
    pub fn load(path: &Path) -> VocabularyResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| VocabularyError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse a vocabulary from TOML text.
    pub fn from_toml_str(toml_str: &str) -> VocabularyResult<Self> {
        let parsed: VocabularyToml =
            toml::from_str(toml_str).map_err(|e| VocabularyError::Parse {
                message: e.to_string(),
            })?;

        let terms = parsed
            .term
            .into_iter()
            .map(|t| TermEntry {
                label: t.label,
                variants: t.variants,
                category: t.category,
            })
            .collect();
        let case_sensitive = parsed
            .case_sensitive
            .into_iter()
            .map(|c| (c.label, c.variant));
        let implications = parsed
            .implies
            .into_iter()
            .map(|r| ImplicationRule {
                parent: r.parent,
                drops: r.drops,
            })
            .collect();

        Self::new(terms, case_sensitive, implications)
    }

    /// Terms in source order.
    pub fn terms(&self) -> &[TermEntry] {
        &self.terms
    }

    pub fn implications(&self) -> &[ImplicationRule] {
        &self.implications
    }

    /// Whether this exact (label, variant) pair must match with exact case.
    pub fn is_case_sensitive(&self, label: &str, variant: &str) -> bool {
        self.case_sensitive
            .contains(&(label.to_string(), variant.to_string()))
    }

    pub fn category_of(&self, label: &str) -> Option<&str> {
        self.terms
            .iter()
            .find(|t| t.label == label)
            .and_then(|t| t.category.as_deref())
    }

    /// Categories with their labels, in order of first appearance.
    pub fn categories(&self) -> Vec<(&str, Vec<&str>)> {
        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        for term in &self.terms {
            let Some(category) = term.category.as_deref() else {
                continue;
            };
            match groups.iter_mut().find(|(name, _)| *name == category) {
                Some((_, labels)) => labels.push(term.label.as_str()),
                None => groups.push((category, vec![term.label.as_str()])),
            }
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

// ── TOML deserialization helpers ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct VocabularyToml {
    #[serde(default)]
    term: Vec<TermToml>,
    #[serde(default)]
    case_sensitive: Vec<CaseSensitiveToml>,
    #[serde(default)]
    implies: Vec<ImpliesToml>,
}

#[derive(Debug, Deserialize)]
struct TermToml {
    label: String,
    variants: Vec<String>,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaseSensitiveToml {
    label: String,
    variant: String,
}

#[derive(Debug, Deserialize)]
struct ImpliesToml {
    parent: String,
    #[serde(default)]
    drops: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_vocabulary_parses() {
        let vocab = Vocabulary::bundled().unwrap();
        assert!(vocab.len() > 40);
        assert!(vocab.is_case_sensitive("Go", "Go"));
        assert!(!vocab.is_case_sensitive("Go", "golang"));
        assert_eq!(vocab.category_of("PostgreSQL"), Some("Databases"));
        assert_eq!(vocab.implications().len(), 2);
    }

    #[test]
    fn bundled_keeps_source_order() {
        let vocab = Vocabulary::bundled().unwrap();
        assert_eq!(vocab.terms()[0].label, "React");
        assert_eq!(vocab.terms().last().unwrap().label, "Active Directory");
    }

    #[test]
    fn duplicate_label_rejected() {
        let err = Vocabulary::new(
            vec![TermEntry::new("Rust", &["rust"]), TermEntry::new("Rust", &["rustlang"])],
            [],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, VocabularyError::DuplicateLabel { label } if label == "Rust"));
    }

    #[test]
    fn empty_variant_rejected() {
        let err = Vocabulary::new(vec![TermEntry::new("Rust", &["rust", ""])], [], vec![])
            .unwrap_err();
        assert!(matches!(err, VocabularyError::EmptyVariant { .. }));
    }

    #[test]
    fn case_rule_must_name_existing_pair() {
        let err = Vocabulary::new(
            vec![TermEntry::new("Go", &["golang"])],
            [("Go".to_string(), "Go".to_string())],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, VocabularyError::UnknownCaseVariant { .. }));
    }

    #[test]
    fn implication_must_reference_known_labels() {
        let err = Vocabulary::new(
            vec![TermEntry::new("React", &["react"])],
            [],
            vec![ImplicationRule::new("React", &["JavaScript"])],
        )
        .unwrap_err();
        assert!(matches!(err, VocabularyError::UnknownLabel { label } if label == "JavaScript"));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = Vocabulary::from_toml_str("[[term]]\nlabel = 3").unwrap_err();
        assert!(matches!(err, VocabularyError::Parse { .. }));
    }

    #[test]
    fn categories_group_in_first_seen_order() {
        let vocab = Vocabulary::new(
            vec![
                TermEntry::new("A", &["a"]).with_category("One"),
                TermEntry::new("B", &["b"]).with_category("Two"),
                TermEntry::new("C", &["c"]).with_category("One"),
                TermEntry::new("D", &["d"]),
            ],
            [],
            vec![],
        )
        .unwrap();
        let cats = vocab.categories();
        assert_eq!(cats, vec![("One", vec!["A", "C"]), ("Two", vec!["B"])]);
    }
}
