//! Rich diagnostic error types for techtrend.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::posting::SourceError;

/// Top-level error type for techtrend.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum TechtrendError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Vocabulary(#[from] VocabularyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience alias for results that may fail in any subsystem.
pub type TechtrendResult<T> = std::result::Result<T, TechtrendError>;

// ---------------------------------------------------------------------------
// Vocabulary errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum VocabularyError {
    #[error("failed to parse vocabulary: {message}")]
    #[diagnostic(
        code(techtrend::vocab::parse),
        help(
            "The vocabulary must be TOML with [[term]] tables carrying `label` and \
             `variants`. Compare against data/vocabulary.toml."
        )
    )]
    Parse { message: String },

    #[error("failed to read vocabulary file: {path}")]
    #[diagnostic(
        code(techtrend::vocab::read),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("duplicate label \"{label}\" in vocabulary")]
    #[diagnostic(
        code(techtrend::vocab::duplicate_label),
        help("Labels must be unique. Merge the variants into a single [[term]] entry.")
    )]
    DuplicateLabel { label: String },

    #[error("label \"{label}\" has an empty variant")]
    #[diagnostic(
        code(techtrend::vocab::empty_variant),
        help("Remove the empty string from the label's `variants` list.")
    )]
    EmptyVariant { label: String },

    #[error("label \"{label}\" has no variants")]
    #[diagnostic(
        code(techtrend::vocab::no_variants),
        help("Every label needs at least one textual variant to be matchable.")
    )]
    NoVariants { label: String },

    #[error("case-sensitive rule names unknown variant \"{variant}\" of \"{label}\"")]
    #[diagnostic(
        code(techtrend::vocab::unknown_case_variant),
        help(
            "A [[case_sensitive]] entry must repeat an existing (label, variant) pair \
             exactly, including case."
        )
    )]
    UnknownCaseVariant { label: String, variant: String },

    #[error("implication rule references unknown label \"{label}\"")]
    #[diagnostic(
        code(techtrend::vocab::unknown_label),
        help("Both the parent and every dropped child must be defined as [[term]] labels.")
    )]
    UnknownLabel { label: String },

    #[error("invalid pattern for variant \"{variant}\" of \"{label}\": {message}")]
    #[diagnostic(
        code(techtrend::vocab::pattern),
        help(
            "The variant could not be compiled into a matcher. \
             This usually means the variant is excessively long."
        )
    )]
    Pattern {
        label: String,
        variant: String,
        message: String,
    },
}

/// Result type for vocabulary construction.
pub type VocabularyResult<T> = std::result::Result<T, VocabularyError>;

// ---------------------------------------------------------------------------
// History errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum HistoryError {
    #[error("history is corrupt: {message}")]
    #[diagnostic(
        code(techtrend::history::corrupt),
        help(
            "Every series must have exactly one value per recorded date, and dates must \
             be strictly increasing. Restore the history file from a backup; it will \
             not be patched automatically."
        )
    )]
    Corrupt { message: String },

    #[error("date {date} is earlier than the latest recorded date {latest}")]
    #[diagnostic(
        code(techtrend::history::out_of_order),
        help(
            "History is append-only: a run may re-record the latest date or add a newer \
             one, but never insert into the past."
        )
    )]
    OutOfOrder { date: String, latest: String },

    #[error("invalid month: {year}-{month:02}")]
    #[diagnostic(
        code(techtrend::history::invalid_month),
        help("Months are numbered 1 through 12, e.g. `--month 2025-08`.")
    )]
    InvalidMonth { year: i32, month: u32 },

    #[error("history I/O error at {path}")]
    #[diagnostic(
        code(techtrend::history::io),
        help(
            "A filesystem operation failed. Check that the directory exists, \
             has correct permissions, and that the disk is not full."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    #[diagnostic(
        code(techtrend::history::parse),
        help(
            "The file must be JSON. History files hold `dates` and `series`; \
             counts files are a flat object of label to count."
        )
    )]
    Parse { path: String, message: String },
}

/// Result type for history operations.
pub type HistoryResult<T> = std::result::Result<T, HistoryError>;
