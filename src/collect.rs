//! Batch collection pipeline.
//!
//! Orchestrates: list slugs → fetch each posting → IT filter → raw text →
//! normalize → extract → tally. A posting that fails to fetch is logged,
//! recorded as skipped, and the run continues. A listing failure is fatal.

use crate::config::CollectorConfig;
use crate::extract::TermExtractor;
use crate::normalize::Normalizer;
use crate::posting::{CategoryFilter, PostingSource, SectionFilter, SourceResult, list_all_slugs};
use crate::tally::DailyCounts;

/// Settings for one collection run.
#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    pub sections: SectionFilter,
    pub categories: CategoryFilter,
    pub normalizer: Normalizer,
    /// Process every posting regardless of category.
    pub all_categories: bool,
}

impl CollectOptions {
    pub fn from_config(config: &CollectorConfig) -> Self {
        Self {
            sections: config.section_filter(),
            categories: config.category_filter(),
            normalizer: config.normalizer(),
            all_categories: false,
        }
    }
}

/// A relevant posting and the labels found in it.
#[derive(Debug, Clone, PartialEq)]
pub struct PostingHit {
    pub slug: String,
    pub company: Option<String>,
    pub title: String,
    pub labels: Vec<String>,
}

/// A posting that could not be processed.
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub slug: String,
    pub reason: String,
}

/// Outcome of a collection run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Relevant postings in listing order, including those with no labels.
    pub matched: Vec<PostingHit>,
    /// Unique slugs returned by the listing.
    pub total_slugs: usize,
    pub skipped: Vec<Skipped>,
    pub counts: DailyCounts,
}

impl RunReport {
    /// Number of relevant postings processed.
    pub fn it_postings(&self) -> usize {
        self.matched.len()
    }
}

/// Run the full pipeline against `source`.
pub fn collect(
    source: &dyn PostingSource,
    extractor: &TermExtractor,
    options: &CollectOptions,
) -> SourceResult<RunReport> {
    let slugs = list_all_slugs(source)?;
    tracing::info!(slugs = slugs.len(), "listing complete");

    let mut report = RunReport {
        total_slugs: slugs.len(),
        ..Default::default()
    };

    for slug in slugs {
        let posting = match source.fetch(&slug) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(slug = %slug, error = %e, "skipping posting");
                report.skipped.push(Skipped {
                    slug,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if !options.all_categories && !options.categories.accepts(&posting) {
            continue;
        }

        let text = options
            .normalizer
            .normalize(&posting.raw_text(&options.sections));
        let labels = extractor.extract(&text);
        report.counts.add_labels(&labels);

        report.matched.push(PostingHit {
            company: posting.company().map(str::to_string),
            title: posting.title_or_empty().to_string(),
            slug,
            labels,
        });
    }

    tracing::info!(
        relevant = report.it_postings(),
        skipped = report.skipped.len(),
        labels = report.counts.len(),
        "collection complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::posting::{Posting, PostingSummary, SourceError};

    struct FixtureSource {
        slugs: Vec<&'static str>,
        postings: HashMap<&'static str, &'static str>,
    }

    impl PostingSource for FixtureSource {
        fn list_page(&self, page: u32) -> SourceResult<Vec<PostingSummary>> {
            if page > 1 {
                return Ok(Vec::new());
            }
            Ok(self
                .slugs
                .iter()
                .map(|s| PostingSummary {
                    slug: Some(s.to_string()),
                })
                .collect())
        }

        fn fetch(&self, slug: &str) -> SourceResult<Posting> {
            let json = self.postings.get(slug).ok_or_else(|| SourceError::Http {
                url: format!("http://fixture/{slug}"),
                message: "HTTP 404".into(),
            })?;
            Ok(serde_json::from_str(json).unwrap())
        }
    }

    fn fixture() -> FixtureSource {
        let mut postings = HashMap::new();
        postings.insert(
            "dev",
            r#"{"title": "Developer", "bodyhtml": "<p>React &amp; Node.js, Docker</p>",
                "brand": {"name": "Acme"},
                "categories": [{"name": "Upplýsingatækni", "slug": "upplysingataekni"}]}"#,
        );
        postings.insert(
            "ops",
            r#"{"title": "Ops", "description": "Kubernetes and Docker",
                "categories": [{"name": "Information Technology"}]}"#,
        );
        postings.insert(
            "chef",
            r#"{"title": "Chef", "description": "Python cooking",
                "categories": [{"name": "Veitingar", "slug": "veitingar"}]}"#,
        );
        postings.insert(
            "messy",
            r#"{"title": 42, "description": "Kubernetes on Azure", "brand": "Acme",
                "categories": [null, {"slug": "upplysingataekni"}]}"#,
        );
        FixtureSource {
            slugs: vec!["dev", "gone", "ops", "chef", "messy"],
            postings,
        }
    }

    #[test]
    fn collects_relevant_postings_and_skips_failures() {
        let extractor = TermExtractor::bundled().unwrap();
        let report = collect(&fixture(), &extractor, &CollectOptions::default()).unwrap();

        assert_eq!(report.total_slugs, 5);
        assert_eq!(report.it_postings(), 3);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].slug, "gone");
        assert!(report.skipped[0].reason.contains("404"));

        let dev = &report.matched[0];
        assert_eq!(dev.company.as_deref(), Some("Acme"));
        assert!(dev.labels.contains(&"React".to_string()));
        assert!(dev.labels.contains(&"Node.js".to_string()));
        assert!(!dev.labels.contains(&"JavaScript".to_string()));

        assert_eq!(report.counts.get("Docker"), 2);
        assert_eq!(report.counts.get("Kubernetes"), 2);
        assert_eq!(report.counts.get("Python"), 0);
    }

    #[test]
    fn malformed_fields_do_not_skip_posting() {
        let extractor = TermExtractor::bundled().unwrap();
        let report = collect(&fixture(), &extractor, &CollectOptions::default()).unwrap();

        assert!(report.skipped.iter().all(|s| s.slug != "messy"));
        let messy = report.matched.iter().find(|h| h.slug == "messy").unwrap();
        assert_eq!(messy.company, None);
        assert_eq!(messy.title, "");
        assert_eq!(messy.labels, vec!["Kubernetes", "Azure"]);
        assert_eq!(report.counts.get("Azure"), 1);
    }

    #[test]
    fn all_categories_bypasses_filter() {
        let extractor = TermExtractor::bundled().unwrap();
        let options = CollectOptions {
            all_categories: true,
            ..Default::default()
        };
        let report = collect(&fixture(), &extractor, &options).unwrap();
        assert_eq!(report.it_postings(), 4);
        assert_eq!(report.counts.get("Python"), 1);
    }
}
