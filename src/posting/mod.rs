//! Job postings: wire model, text assembly, relevance filtering, retrieval.
//!
//! Postings come from a paginated listing service. Each listing page carries
//! summaries with a `slug`; the full record is fetched per slug. Every field of
//! the record is optional and a missing field reads as empty.

pub mod error;
pub mod model;
pub mod source;

pub use error::{SourceError, SourceResult};
pub use model::{
    Brand, CategoryFilter, CustomSection, Posting, PostingCategory, PostingSummary,
    Qualification, SectionFilter,
};
pub use source::{HttpPostingSource, PostingSource, list_all_slugs};
