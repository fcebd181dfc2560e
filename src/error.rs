//! Error types for extraction, fetching and crawling
//!
//! Skippable conditions (unrecognized selector strings, fields without a
//! selector, zero matches) never surface here. Everything in `ExtractError`
//! aborts the whole extraction call.

use crate::selector::SelectorKind;

/// Error type returned by stencil callbacks
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that abort an extraction call
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// A `[regexp]` pattern failed to compile
    #[error("Invalid regular expression '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A `[css]` pattern failed to parse
    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidCss { selector: String, message: String },

    /// An `[xpath]` expression failed to parse or was empty
    #[error("Invalid XPath '{expression}': {message}")]
    InvalidXPath { expression: String, message: String },

    #[error("XPath evaluation failed for '{expression}': {message}")]
    XPathEvaluation { expression: String, message: String },

    /// The selector kind cannot be applied to this kind of node
    ///
    /// Raised when a CSS or XPath query reaches a text match, e.g. a
    /// `[regexp]` field with children that query the tree.
    #[error("{kind} selector is not supported for {node} nodes")]
    UnsupportedSelector {
        kind: SelectorKind,
        node: &'static str,
    },

    /// A field callback returned an error
    #[error("Callback for field '{field}' failed: {source}")]
    Callback {
        field: String,
        #[source]
        source: CallbackError,
    },

    #[error("Stencil nesting exceeds the maximum depth of {max_depth}")]
    DepthExceeded { max_depth: usize },
}

/// Errors from the HTTP fetch layer
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors from the crawl orchestration
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("Invalid product URL: {0}")]
    InvalidUrl(String),

    #[error("No product id found in URL: {0}")]
    MissingId(String),

    #[error("Invalid crawl configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}
