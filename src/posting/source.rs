//! Posting retrieval over HTTP.
//!
//! Uses `ureq` for synchronous requests with a timeout and a fixed polite
//! delay after every request. The [`PostingSource`] trait is the seam the
//! collector depends on, so runs can be driven from fixtures in tests.

use std::collections::HashSet;
use std::time::Duration;

use crate::config::CollectorConfig;
use crate::posting::error::{SourceError, SourceResult};
use crate::posting::model::{DetailPage, ListPage, Posting, PostingSummary};

/// A paginated source of job postings.
pub trait PostingSource {
    /// Summaries on the 1-based `page`. An empty page ends pagination.
    fn list_page(&self, page: u32) -> SourceResult<Vec<PostingSummary>>;

    /// The full record for `slug`.
    fn fetch(&self, slug: &str) -> SourceResult<Posting>;
}

/// Walk every listing page and collect unique slugs in first-seen order.
///
/// Summaries without a slug are skipped. Stops at the first empty page.
pub fn list_all_slugs(source: &dyn PostingSource) -> SourceResult<Vec<String>> {
    let mut slugs = Vec::new();
    let mut seen = HashSet::new();
    let mut page = 1;

    loop {
        let jobs = source.list_page(page)?;
        if jobs.is_empty() {
            break;
        }
        tracing::debug!(page, jobs = jobs.len(), "listing page");
        for job in jobs {
            let Some(slug) = job.slug.filter(|s| !s.is_empty()) else {
                continue;
            };
            if seen.insert(slug.clone()) {
                slugs.push(slug);
            }
        }
        page += 1;
    }

    Ok(slugs)
}

/// The public listing API.
pub struct HttpPostingSource {
    agent: ureq::Agent,
    list_url: String,
    detail_url: String,
    page_delay: Duration,
    detail_delay: Duration,
}

impl HttpPostingSource {
    pub fn new(config: &CollectorConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build();

        Self {
            agent,
            list_url: config.list_url.clone(),
            detail_url: config.detail_url.clone(),
            page_delay: Duration::from_millis(config.page_delay_ms),
            detail_delay: Duration::from_millis(config.detail_delay_ms),
        }
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> SourceResult<T> {
        let mut request = self.agent.get(url);
        for (key, value) in query {
            request = request.query(key, value);
        }

        let response = request.call().map_err(|e| match e {
            ureq::Error::Status(code, _) => SourceError::Http {
                url: url.into(),
                message: format!("HTTP {code}"),
            },
            ureq::Error::Transport(transport) => SourceError::Http {
                url: url.into(),
                message: transport.to_string(),
            },
        })?;

        response.into_json::<T>().map_err(|e| SourceError::Decode {
            url: url.into(),
            message: e.to_string(),
        })
    }
}

impl PostingSource for HttpPostingSource {
    fn list_page(&self, page: u32) -> SourceResult<Vec<PostingSummary>> {
        let page = page.to_string();
        let result: SourceResult<ListPage> =
            self.get_json(&self.list_url, &[("page", page.as_str())]);
        std::thread::sleep(self.page_delay);
        Ok(result?.jobs)
    }

    fn fetch(&self, slug: &str) -> SourceResult<Posting> {
        let result: SourceResult<DetailPage> = self.get_json(
            &self.detail_url,
            &[
                ("slug", slug),
                ("mergetobody", "false"),
                ("translate", "false"),
            ],
        );
        std::thread::sleep(self.detail_delay);
        Ok(result?.job.unwrap_or_default())
    }
}
