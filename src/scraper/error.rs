//! Shared error type for the scraping layer.
//!
//! Missing DOM nodes are not errors: extraction degrades to empty values.
//! Errors here are transport failures, bad selector/pattern literals, and
//! the caller passing an unknown section or locale id.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Network error: could not reach {url}: {source}")]
    Network {
        url: String,
        source: reqwest::Error,
    },

    #[error("HTTP {status} when fetching: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to read response body: {source}")]
    BodyRead { source: reqwest::Error },

    /// A selector literal failed to parse. These are compile-time constants,
    /// so hitting this indicates a bug, not site drift.
    #[error("Invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Unknown discover-section id. A programming error on the caller's
    /// side, signaled distinctly rather than returning an empty listing.
    #[error("Unsupported discover section: {id:?}")]
    UnsupportedSection { id: String },

    #[error("Unsupported locale: {locale:?}")]
    UnsupportedLocale { locale: String },
}
