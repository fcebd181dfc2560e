//! Stencil-driven HTML extraction
//!
//! Extracts nested records from parsed HTML using a declarative map of field
//! names to selectors:
//! - CSS selectors (`[css] h1 div`)
//! - XPath expressions (`[xpath] //li/a/@href`)
//! - Regex scans over text (`[regexp] (\d+)`)
//!
//! Fields can recurse into `children` and post-process results with
//! callbacks; a final hook sees the finished record. The fetch, pagination
//! and crawl modules drive the engine over live pages.
//!
//! ```ignore
//! use html_stencil::{FieldSpec, Scraper, Stencil};
//!
//! let stencil = Stencil::new()
//!     .field("title", FieldSpec::new("[css] h1"))
//!     .field(
//!         "tags",
//!         FieldSpec::new("[css] .tag").children(Stencil::new().field("name", FieldSpec::new("[css] span"))),
//!     );
//! let record = Scraper::default().parse_html(html, &stencil)?;
//! ```

pub mod config;
pub mod crawl;
pub mod engine;
mod error;
pub mod extractors;
pub mod fetch;
pub mod node;
pub mod paginate;
pub mod sanitize;
pub mod selector;
pub mod stars;
pub mod stencil;

pub use config::{CrawlConfig, FetchOptions, ScrapeOptions, TextForm, UnsupportedPolicy};
pub use engine::{apply_callback, finalize, normalize, Normalized, Record, Scraper};
pub use error::{CallbackError, CrawlError, ExtractError, FetchError};
pub use extractors::query;
pub use node::NodeRef;
pub use selector::{resolve, SelectorKind, SelectorSpec};
pub use stencil::{Callback, FieldSpec, Stencil};
