// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # techtrend
//!
//! Technology-term extraction from job postings, tallied into a daily
//! time series.
//!
//! ## Architecture
//!
//! - **Vocabulary** (`vocab`): label → variants table, case exceptions, implication rules, categories
//! - **Extraction** (`extract`): boundary-safe, longest-first matching plus implication suppression
//! - **Tally** (`tally`): per-run label counts
//! - **History** (`history`): aligned `{dates, series}` time series with an atomic JSON store
//! - **Postings** (`posting`): listing-service model, HTTP source, IT and section filters
//! - **Collector** (`collect`): the batch pipeline tying the above together
//!
//! ## Library usage
//!
//! ```no_run
//! use techtrend::extract::TermExtractor;
//! use techtrend::normalize::normalize;
//!
//! let extractor = TermExtractor::bundled().unwrap();
//! let labels = extractor.extract(&normalize("<p>ReactJS &amp; PostgreSQL</p>"));
//! assert!(labels.contains(&"React".to_string()));
//! ```

pub mod collect;
pub mod config;
pub mod error;
pub mod extract;
pub mod history;
pub mod normalize;
pub mod posting;
pub mod report;
pub mod tally;
pub mod vocab;
