//! Per-run tally of label occurrences.
//!
//! Each processed document contributes at most one count per label, since a
//! label set never repeats a label.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Label → number of documents that carried the label on one date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyCounts(BTreeMap<String, u64>);

impl DailyCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one document's label set.
    pub fn add_labels<S: AsRef<str>>(&mut self, labels: &[S]) {
        for label in labels {
            self.increment(label.as_ref(), 1);
        }
    }

    pub fn increment(&mut self, label: &str, by: u64) {
        *self.0.entry(label.to_string()).or_insert(0) += by;
    }

    /// Count for `label`, zero when absent.
    pub fn get(&self, label: &str) -> u64 {
        self.0.get(label).copied().unwrap_or(0)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains_key(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Non-zero entries, highest count first; ties broken by label.
    pub fn most_common(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self.iter().filter(|(_, n)| *n > 0).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    /// The `n` most common entries.
    pub fn top(&self, n: usize) -> Vec<(&str, u64)> {
        let mut ranked = self.most_common();
        ranked.truncate(n);
        ranked
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }
}

impl FromIterator<(String, u64)> for DailyCounts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (label, n) in iter {
            counts.increment(&label, n);
        }
        counts
    }
}

impl<const N: usize> From<[(&str, u64); N]> for DailyCounts {
    fn from(entries: [(&str, u64); N]) -> Self {
        entries
            .into_iter()
            .map(|(label, n)| (label.to_string(), n))
            .collect()
    }
}
