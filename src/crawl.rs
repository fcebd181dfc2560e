//! Product crawl orchestration
//!
//! Validates a product URL, pulls the product id out of its path, fetches the
//! page and extracts it with a stencil. Reviews come from a paginated JSON
//! endpoint and are injected, together with the id, by the final hook.

use regex::Regex;
use scraper::Html;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::CrawlConfig;
use crate::engine::{Record, Scraper};
use crate::error::CrawlError;
use crate::fetch::{HttpClient, Request, Response};
use crate::node::NodeRef;
use crate::paginate::{collect_pages, Page};
use crate::stars;
use crate::stencil::Stencil;

const PAGE_REQUEST: &str = "page";

/// Accept only absolute http(s) URLs with a host
pub fn validate_url(raw: &str) -> Result<Url, CrawlError> {
    let url = Url::parse(raw.trim()).map_err(|_| CrawlError::InvalidUrl(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(CrawlError::InvalidUrl(raw.to_string())),
    }
}

/// Read one review page out of a decoded JSON body
pub fn page_from_json(json: &Value, items_pointer: &str, pages_pointer: &str) -> Page<Value> {
    let items = json
        .pointer(items_pointer)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let page_count = match json.pointer(pages_pointer) {
        Some(Value::Array(pages)) => pages.len(),
        Some(Value::Number(n)) => n.as_u64().unwrap_or(1) as usize,
        _ => 1,
    };

    Page { items, page_count }
}

/// Crawls product pages with one stencil
pub struct ProductCrawler {
    client: HttpClient,
    scraper: Scraper,
    stencil: Stencil,
    id_pattern: Regex,
    config: CrawlConfig,
}

impl ProductCrawler {
    pub fn new(stencil: Stencil, config: CrawlConfig) -> Result<Self, CrawlError> {
        let id_pattern =
            Regex::new(&config.id_pattern).map_err(|e| CrawlError::Config(e.to_string()))?;
        let client = HttpClient::new(&config.fetch)?;
        let scraper = Scraper::new(config.scrape.clone());

        Ok(Self {
            client,
            scraper,
            stencil,
            id_pattern,
            config,
        })
    }

    /// Product id from the URL path: first capture group of the id pattern
    pub fn parse_id(&self, url: &Url) -> Option<String> {
        let caps = self.id_pattern.captures(url.path())?;
        caps.get(1)
            .or_else(|| caps.get(0))
            .map(|m| m.as_str().to_string())
    }

    /// Crawl one product page
    ///
    /// Returns `Ok(None)` when the page does not answer with 200.
    pub async fn crawl(&self, product_url: &str) -> Result<Option<Record>, CrawlError> {
        let url = validate_url(product_url)?;
        let id = self
            .parse_id(&url)
            .ok_or_else(|| CrawlError::MissingId(url.to_string()))?;

        let response = self.fetch_one(url.as_str()).await?;
        let Some(body) = response.ok_body() else {
            warn!(url = %url, status = response.status, "product page unavailable");
            return Ok(None);
        };

        let reviews = match &self.config.reviews_url {
            Some(template) => Some(self.crawl_reviews(template, &id).await?),
            None => None,
        };

        let document = Html::parse_document(body);
        let id_field = self.config.id_field.clone();
        let reviews_field = self.config.reviews_field.clone();

        let record = self
            .scraper
            .parse_with(&NodeRef::document(&document), &self.stencil, move |mut product| {
                product.insert(id_field, Value::String(id));
                if let Some(reviews) = reviews {
                    product.insert(reviews_field, Value::Array(reviews));
                }
                product
            })?;

        Ok(Some(record))
    }

    /// Collect every review of a product across all review pages
    pub async fn crawl_reviews(&self, template: &str, id: &str) -> Result<Vec<Value>, CrawlError> {
        let this = self;
        let mut reviews =
            collect_pages(move |page| this.fetch_reviews_page(template, id, page)).await?;
        if let Some(rating_key) = &self.config.rating_key {
            stars::annotate(&mut reviews, rating_key);
        }
        debug!(id, reviews = reviews.len(), "collected reviews");
        Ok(reviews)
    }

    /// Send a single GET through the batch client
    async fn fetch_one(&self, url: &str) -> Result<Response, CrawlError> {
        let mut results = self
            .client
            .request(vec![(PAGE_REQUEST.to_string(), Request::get(url))])
            .await;
        let response = results.remove(PAGE_REQUEST).ok_or_else(|| {
            CrawlError::Config(format!("no response for request '{}'", PAGE_REQUEST))
        })?;
        Ok(response?)
    }

    async fn fetch_reviews_page(
        &self,
        template: &str,
        id: &str,
        page: usize,
    ) -> Result<Option<Page<Value>>, CrawlError> {
        let url = reviews_page_url(template, id, page);
        let response = self.fetch_one(&url).await?;

        let Some(body) = response.ok_body() else {
            warn!(url = %url, status = response.status, "review page unavailable");
            return Ok(None);
        };
        let json: Value = match serde_json::from_str(body) {
            Ok(json) => json,
            Err(e) => {
                warn!(url = %url, error = %e, "review page is not valid JSON");
                return Ok(None);
            }
        };

        Ok(Some(page_from_json(
            &json,
            &self.config.items_pointer,
            &self.config.pages_pointer,
        )))
    }
}

fn reviews_page_url(template: &str, id: &str, page: usize) -> String {
    template
        .replace("{id}", id)
        .replace("{page}", &page.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stencil::FieldSpec;
    use serde_json::json;

    fn crawler() -> ProductCrawler {
        let stencil = Stencil::new().field("name", FieldSpec::new("[css] h1"));
        ProductCrawler::new(stencil, CrawlConfig::default()).unwrap()
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://www.example.com/ip/Widget/12345").is_ok());
        assert!(validate_url("http://example.com/ip/1").is_ok());
        assert!(matches!(validate_url("ftp://example.com/1"), Err(CrawlError::InvalidUrl(_))));
        assert!(matches!(validate_url("not a url"), Err(CrawlError::InvalidUrl(_))));
        assert!(matches!(validate_url(""), Err(CrawlError::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_id() {
        let crawler = crawler();
        let url = validate_url("https://www.example.com/ip/Widget-Pro/55001234?athcpid=1").unwrap();
        assert_eq!(crawler.parse_id(&url), Some("55001234".to_string()));

        let url = validate_url("https://www.example.com/ip/Widget-Pro").unwrap();
        assert_eq!(crawler.parse_id(&url), None);
    }

    #[test]
    fn test_invalid_id_pattern() {
        let config = CrawlConfig {
            id_pattern: "(".to_string(),
            ..CrawlConfig::default()
        };
        assert!(matches!(
            ProductCrawler::new(Stencil::new(), config),
            Err(CrawlError::Config(_))
        ));
    }

    #[test]
    fn test_page_from_json() {
        let json = json!({
            "payload": {
                "customerReviews": [{"rating": 5}, {"rating": 3}],
                "pagination": {"pages": [{"num": 1}, {"num": 2}, {"num": 3}]}
            }
        });
        let page = page_from_json(&json, "/payload/customerReviews", "/payload/pagination/pages");
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.page_count, 3);

        let empty = page_from_json(&json!({}), "/payload/customerReviews", "/payload/pagination/pages");
        assert!(empty.items.is_empty());
        assert_eq!(empty.page_count, 1);
    }

    #[test]
    fn test_reviews_page_url() {
        let url = reviews_page_url("https://example.com/item/{id}/reviews?page={page}&limit=100", "42", 2);
        assert_eq!(url, "https://example.com/item/42/reviews?page=2&limit=100");
    }

    #[tokio::test]
    async fn test_crawl_rejects_before_fetching() {
        let crawler = crawler();
        assert!(matches!(
            crawler.crawl("javascript:alert(1)").await,
            Err(CrawlError::InvalidUrl(_))
        ));
        assert!(matches!(
            crawler.crawl("https://www.example.com/ip/no-id").await,
            Err(CrawlError::MissingId(_))
        ));
    }

    #[tokio::test]
    async fn test_crawl_reports_transport_failure() {
        let config = CrawlConfig {
            fetch: crate::config::FetchOptions {
                timeout_secs: 2,
                ..Default::default()
            },
            ..CrawlConfig::default()
        };
        let crawler = ProductCrawler::new(Stencil::new(), config).unwrap();
        assert!(matches!(
            crawler.crawl("http://127.0.0.1:9/ip/123").await,
            Err(CrawlError::Fetch(_))
        ));

        let reviews = crawler
            .crawl_reviews("http://127.0.0.1:9/items/{id}?page={page}", "123")
            .await;
        assert!(matches!(reviews, Err(CrawlError::Fetch(_))));
    }
}
