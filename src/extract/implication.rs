//! Implication-based suppression of redundant labels.
//!
//! When a specific label is present, the generic labels it subsumes add no
//! information for that document ("React" already says "JavaScript"). Parent
//! presence is judged on the input sequence, so every rule whose parent was
//! found fires regardless of the order rules are listed in.

use std::collections::HashSet;

use crate::vocab::ImplicationRule;

/// Removes children of present parents from a document's label sequence.
#[derive(Debug, Clone, Default)]
pub struct ImplicationResolver {
    rules: Vec<ImplicationRule>,
}

impl ImplicationResolver {
    pub fn new(rules: Vec<ImplicationRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ImplicationRule] {
        &self.rules
    }

    /// Drop every label implied by a present parent, preserving input order.
    pub fn resolve(&self, labels: Vec<String>) -> Vec<String> {
        let suppressed: HashSet<&str> = {
            let present: HashSet<&str> = labels.iter().map(String::as_str).collect();
            self.rules
                .iter()
                .filter(|rule| present.contains(rule.parent.as_str()))
                .flat_map(|rule| rule.drops.iter().map(String::as_str))
                .collect()
        };

        if suppressed.is_empty() {
            return labels;
        }
        labels
            .into_iter()
            .filter(|label| !suppressed.contains(label.as_str()))
            .collect()
    }
}
