//! Markup-to-text normalization for extraction input.
//!
//! Entities are decoded and tags dropped by parsing the fragment with `scraper`
//! and joining its text nodes with spaces, so adjacent list items never fuse.
//! Commas, semicolons, slashes and dashes become spaces too: otherwise
//! "C++/PostgreSQL" would form one run-on token that no variant can match.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

static RE_JOINERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;/]").unwrap());

static RE_DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-–—]").unwrap());

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Converts raw posting text into the blob the term extractor reads.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    /// Lowercase the result. Exact-case variants (e.g. "Go") can only ever
    /// match when this is off.
    pub lowercase: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self { lowercase: true }
    }
}

impl Normalizer {
    pub fn new(lowercase: bool) -> Self {
        Self { lowercase }
    }

    pub fn normalize(&self, raw: &str) -> String {
        self.apply_case(strip_markup(raw))
    }

    /// Like [`Normalizer::normalize`] for text known not to carry markup.
    /// A literal `<` or `&` is kept as written.
    pub fn normalize_plain(&self, raw: &str) -> String {
        self.apply_case(split_separators(raw))
    }

    fn apply_case(&self, text: String) -> String {
        if self.lowercase {
            text.to_lowercase()
        } else {
            text
        }
    }
}

/// Normalize with default settings (lowercased).
pub fn normalize(raw: &str) -> String {
    Normalizer::default().normalize(raw)
}

/// Decode entities, drop tags, split joiners, collapse whitespace. Case is kept.
pub fn strip_markup(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(raw);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    split_separators(&text)
}

fn split_separators(text: &str) -> String {
    let text = RE_JOINERS.replace_all(text, " ");
    let text = RE_DASHES.replace_all(&text, " ");
    RE_WHITESPACE.replace_all(&text, " ").trim().to_string()
}
