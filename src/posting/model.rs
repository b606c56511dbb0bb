//! Serde model of listing-service payloads.
//!
//! Decoding is lenient: a field of the wrong type reads as absent and a list
//! element that fails to decode is dropped, so one malformed field never
//! costs the rest of the posting.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Decode a value, or `None` when it is null or of the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decode a list, keeping only the elements that decode. A non-list is empty.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let serde_json::Value::Array(items) = serde_json::Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// One entry of a listing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostingSummary {
    #[serde(deserialize_with = "lenient")]
    pub slug: Option<String>,
}

/// A listing page: `{"jobs": [...]}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ListPage {
    #[serde(deserialize_with = "lenient_vec")]
    pub jobs: Vec<PostingSummary>,
}

/// A detail response: `{"job": {...}}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DetailPage {
    pub job: Option<Posting>,
}

/// A full posting record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Posting {
    #[serde(deserialize_with = "lenient")]
    pub slug: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    /// Structured markup body; preferred over `description` when present.
    #[serde(deserialize_with = "lenient")]
    pub bodyhtml: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub custom_sections: Vec<CustomSection>,
    #[serde(deserialize_with = "lenient_vec")]
    pub job_qualifications: Vec<Qualification>,
    #[serde(deserialize_with = "lenient")]
    pub brand: Option<Brand>,
    #[serde(deserialize_with = "lenient_vec")]
    pub categories: Vec<PostingCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSection {
    #[serde(deserialize_with = "lenient")]
    pub label: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub content: Option<String>,
}

/// A qualification entry: either bare text or an object with a description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Qualification {
    Text(String),
    Detailed {
        #[serde(default)]
        description: Option<String>,
    },
    Other(serde_json::Value),
}

impl Qualification {
    pub fn text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Detailed { description } => description.clone().unwrap_or_default(),
            Self::Other(serde_json::Value::Null) => String::new(),
            Self::Other(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Brand {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostingCategory {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub slug: Option<String>,
}

/// Which custom sections carry technical content.
///
/// A section is kept when its label contains one of `label_keywords` or its
/// title contains one of `title_keywords`, compared case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionFilter {
    pub label_keywords: Vec<String>,
    pub title_keywords: Vec<String>,
}

impl Default for SectionFilter {
    fn default() -> Self {
        Self {
            label_keywords: vec!["qualifications".into(), "responsibilities".into()],
            title_keywords: vec!["menntunar".into(), "hæfni".into(), "verkefni".into()],
        }
    }
}

impl SectionFilter {
    pub fn accepts(&self, section: &CustomSection) -> bool {
        let label = section.label.as_deref().unwrap_or("").to_lowercase();
        let title = section.title.as_deref().unwrap_or("").to_lowercase();
        self.label_keywords
            .iter()
            .any(|k| label.contains(&k.to_lowercase()))
            || self
                .title_keywords
                .iter()
                .any(|k| title.contains(&k.to_lowercase()))
    }
}

/// Decides whether a posting belongs to the information-technology domain.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFilter {
    pub indicators: Vec<String>,
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self {
            indicators: vec![
                "upplysingataekni".into(),
                "upplýsingatækni".into(),
                "information technology".into(),
            ],
        }
    }
}

impl CategoryFilter {
    /// True when any category name or slug contains an indicator.
    ///
    /// A posting without categories is never relevant.
    pub fn accepts(&self, posting: &Posting) -> bool {
        posting.categories.iter().any(|c| {
            let name = c.name.as_deref().unwrap_or("").to_lowercase();
            let slug = c.slug.as_deref().unwrap_or("").to_lowercase();
            self.indicators.iter().any(|ind| {
                let ind = ind.to_lowercase();
                name.contains(&ind) || slug.contains(&ind)
            })
        })
    }
}

impl Posting {
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn company(&self) -> Option<&str> {
        self.brand
            .as_ref()
            .and_then(|b| b.name.as_deref())
            .filter(|n| !n.is_empty())
    }

    /// Body markup, falling back to the plain description.
    pub fn body(&self) -> &str {
        self.bodyhtml
            .as_deref()
            .filter(|b| !b.is_empty())
            .or(self.description.as_deref())
            .unwrap_or("")
    }

    /// High-signal raw text: title, body, selected sections, qualifications.
    ///
    /// Address and benefits sections are left out by the filter. The result
    /// still carries markup; run it through [`crate::normalize`] before
    /// extraction.
    pub fn raw_text(&self, sections: &SectionFilter) -> String {
        let mut parts: Vec<String> = vec![self.title_or_empty().to_string(), self.body().to_string()];

        parts.extend(
            self.custom_sections
                .iter()
                .filter(|s| sections.accepts(s))
                .map(|s| s.content.clone().unwrap_or_default()),
        );
        parts.extend(self.job_qualifications.iter().map(Qualification::text));

        parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" \n ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting_json() -> &'static str {
        r#"{
            "slug": "backend-dev-42",
            "title": "Backend Developer",
            "bodyhtml": "<p>We build APIs in <b>Python</b>.</p>",
            "description": "ignored",
            "customSections": [
                {"label": "qualifications", "title": "", "content": "<li>Docker</li>"},
                {"label": "benefits", "title": "Fríðindi", "content": "Free gym"},
                {"label": "other", "title": "Hæfniskröfur", "content": "Kubernetes"}
            ],
            "jobQualifications": ["Git", {"description": "Linux"}, 5, null],
            "brand": {"name": "Acme ehf."},
            "categories": [{"name": "Upplýsingatækni", "slug": "upplysingataekni"}]
        }"#
    }

    #[test]
    fn parses_full_record() {
        let posting: Posting = serde_json::from_str(posting_json()).unwrap();
        assert_eq!(posting.title.as_deref(), Some("Backend Developer"));
        assert_eq!(posting.custom_sections.len(), 3);
        assert_eq!(posting.job_qualifications.len(), 4);
        assert_eq!(posting.company(), Some("Acme ehf."));
    }

    #[test]
    fn missing_and_null_fields_read_as_empty() {
        let posting: Posting =
            serde_json::from_str(r#"{"customSections": null, "categories": null}"#).unwrap();
        assert!(posting.custom_sections.is_empty());
        assert!(posting.categories.is_empty());
        assert_eq!(posting.title_or_empty(), "");
        assert_eq!(posting.body(), "");
        assert_eq!(posting.company(), None);
        assert_eq!(posting.raw_text(&SectionFilter::default()), "");
    }

    #[test]
    fn malformed_fields_read_as_absent() {
        let posting: Posting = serde_json::from_str(
            r#"{
                "title": 5,
                "brand": "Acme",
                "bodyhtml": ["not", "text"],
                "description": "Rust services",
                "customSections": [null, 7, {"label": "qualifications", "title": 3, "content": "Docker"}],
                "jobQualifications": "Git",
                "categories": [null, {"name": 12, "slug": "upplysingataekni"}]
            }"#,
        )
        .unwrap();
        assert_eq!(posting.title, None);
        assert_eq!(posting.brand, None);
        assert_eq!(posting.body(), "Rust services");
        assert!(posting.job_qualifications.is_empty());
        assert_eq!(posting.custom_sections.len(), 1);
        assert_eq!(posting.custom_sections[0].title, None);
        assert_eq!(posting.categories.len(), 1);
        assert!(CategoryFilter::default().accepts(&posting));
        assert_eq!(
            posting.raw_text(&SectionFilter::default()),
            "Rust services \n Docker"
        );
    }

    #[test]
    fn listing_page_drops_bad_entries() {
        let page: ListPage =
            serde_json::from_str(r#"{"jobs": [null, {"slug": 4}, {"slug": "dev"}]}"#).unwrap();
        assert_eq!(page.jobs.len(), 2);
        assert_eq!(page.jobs[1].slug.as_deref(), Some("dev"));
    }

    #[test]
    fn raw_text_selects_sections_and_qualifications() {
        let posting: Posting = serde_json::from_str(posting_json()).unwrap();
        let text = posting.raw_text(&SectionFilter::default());
        assert!(text.starts_with("Backend Developer \n <p>We build APIs"));
        assert!(text.contains("<li>Docker</li>"));
        assert!(text.contains("Kubernetes"));
        assert!(!text.contains("Free gym"));
        assert!(!text.contains("ignored"));
        assert!(text.ends_with("Git \n Linux \n 5"));
    }

    #[test]
    fn body_falls_back_to_description() {
        let posting: Posting =
            serde_json::from_str(r#"{"description": "Plain text body"}"#).unwrap();
        assert_eq!(posting.body(), "Plain text body");
    }

    #[test]
    fn category_filter_matches_name_or_slug() {
        let filter = CategoryFilter::default();
        let posting: Posting = serde_json::from_str(posting_json()).unwrap();
        assert!(filter.accepts(&posting));

        let by_name: Posting =
            serde_json::from_str(r#"{"categories": [{"name": "Information Technology"}]}"#)
                .unwrap();
        assert!(filter.accepts(&by_name));

        let other: Posting =
            serde_json::from_str(r#"{"categories": [{"name": "Sales", "slug": "sala"}]}"#)
                .unwrap();
        assert!(!filter.accepts(&other));

        assert!(!filter.accepts(&Posting::default()));
    }

    #[test]
    fn list_page_tolerates_missing_jobs() {
        let page: ListPage = serde_json::from_str("{}").unwrap();
        assert!(page.jobs.is_empty());
        let page: ListPage = serde_json::from_str(r#"{"jobs": [{"slug": "a"}, {}]}"#).unwrap();
        assert_eq!(page.jobs.len(), 2);
        assert_eq!(page.jobs[1].slug, None);
    }
}
