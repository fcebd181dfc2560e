//! Options for the extraction engine, fetch layer and crawler
//!
//! All option structs deserialize from JSON with every field optional.

use serde::{Deserialize, Serialize};

/// How an element match becomes a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextForm {
    /// Concatenated text content
    #[default]
    Text,
    /// Outer HTML markup
    Html,
}

/// What to do when a selector cannot query a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedPolicy {
    /// Abort the whole extraction call
    #[default]
    Fail,
    /// Leave the field out of the record
    Skip,
}

/// Extraction engine options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeOptions {
    /// Deepest allowed nesting of `children` stencils
    pub max_depth: usize,
    pub text_form: TextForm,
    pub on_unsupported: UnsupportedPolicy,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            max_depth: 16,
            text_form: TextForm::Text,
            on_unsupported: UnsupportedPolicy::Fail,
        }
    }
}

impl ScrapeOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// HTTP client options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub accept: String,
    pub max_redirects: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_3) AppleWebKit/602.1.28+ (KHTML, like Gecko) Version/9.0.3 Safari/601.4.4".to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            max_redirects: 100,
        }
    }
}

/// Product crawl configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Regex whose first capture group is the product id
    pub id_pattern: String,
    /// Review page URL template with `{id}` and `{page}` placeholders
    pub reviews_url: Option<String>,
    /// JSON pointer to the review items of one page
    pub items_pointer: String,
    /// JSON pointer to the array of pages announced by the first page
    pub pages_pointer: String,
    pub id_field: String,
    pub reviews_field: String,
    /// Review field holding a rating; when set, each review gains a `stars` string
    pub rating_key: Option<String>,
    pub scrape: ScrapeOptions,
    pub fetch: FetchOptions,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            id_pattern: r"/(\d+)$".to_string(),
            reviews_url: None,
            items_pointer: "/payload/customerReviews".to_string(),
            pages_pointer: "/payload/pagination/pages".to_string(),
            id_field: "id".to_string(),
            reviews_field: "reviews".to_string(),
            rating_key: None,
            scrape: ScrapeOptions::default(),
            fetch: FetchOptions::default(),
        }
    }
}

impl CrawlConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_options_defaults() {
        let options = ScrapeOptions::from_json("{}").unwrap();
        assert_eq!(options, ScrapeOptions::default());
        assert_eq!(options.max_depth, 16);
        assert_eq!(options.text_form, TextForm::Text);
        assert_eq!(options.on_unsupported, UnsupportedPolicy::Fail);
    }

    #[test]
    fn test_scrape_options_overrides() {
        let options =
            ScrapeOptions::from_json(r#"{"max_depth": 3, "text_form": "html", "on_unsupported": "skip"}"#)
                .unwrap();
        assert_eq!(options.max_depth, 3);
        assert_eq!(options.text_form, TextForm::Html);
        assert_eq!(options.on_unsupported, UnsupportedPolicy::Skip);
    }

    #[test]
    fn test_crawl_config_nested() {
        let config = CrawlConfig::from_json(
            r#"{
                "reviews_url": "https://example.com/items/{id}/reviews?page={page}",
                "fetch": {"timeout_secs": 5},
                "scrape": {"max_depth": 4}
            }"#,
        )
        .unwrap();

        assert_eq!(config.id_pattern, r"/(\d+)$");
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(config.fetch.max_redirects, 100);
        assert_eq!(config.scrape.max_depth, 4);
        assert!(config.reviews_url.unwrap().contains("{page}"));
        assert_eq!(config.rating_key, None);

        let config = CrawlConfig::from_json(r#"{"rating_key": "rating"}"#).unwrap();
        assert_eq!(config.rating_key.as_deref(), Some("rating"));
    }
}
