//! Rich diagnostic error types for posting retrieval.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from the posting source.
#[derive(Debug, Error, Diagnostic)]
pub enum SourceError {
    #[error("request to \"{url}\" failed: {message}")]
    #[diagnostic(
        code(techtrend::source::http),
        help(
            "The listing service could not be reached or returned an error status. \
             Check network access and the `list_url` / `detail_url` settings."
        )
    )]
    Http { url: String, message: String },

    #[error("unexpected response from \"{url}\": {message}")]
    #[diagnostic(
        code(techtrend::source::decode),
        help(
            "The response body was not the expected JSON. The listing API may have \
             changed shape; inspect the raw response with curl."
        )
    )]
    Decode { url: String, message: String },
}

/// Convenience alias for posting source results.
pub type SourceResult<T> = std::result::Result<T, SourceError>;
