//! CSS selector-based extraction
//!
//! Uses the scraper crate to select descendants of an element.

use scraper::{ElementRef, Selector};

use crate::error::ExtractError;

/// Parse a CSS selector, keeping the pattern in the error
pub fn parse_selector(selector_str: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector_str).map_err(|e| ExtractError::InvalidCss {
        selector: selector_str.to_string(),
        message: e.to_string(),
    })
}

/// Select all descendants of `element` matching a CSS selector, in document order
pub fn select_css<'a>(
    element: ElementRef<'a>,
    selector_str: &str,
) -> Result<Vec<ElementRef<'a>>, ExtractError> {
    let selector = parse_selector(selector_str)?;
    Ok(element.select(&selector).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_css_select() {
        let html = r#"
        <html>
        <body>
            <div class="price">$19.99</div>
            <div class="price">$29.99</div>
            <a href="/product/123" class="link">Product</a>
        </body>
        </html>
        "#;

        let document = Html::parse_document(html);
        let prices = select_css(document.root_element(), ".price").unwrap();
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].text().collect::<String>(), "$19.99");
        assert_eq!(prices[1].text().collect::<String>(), "$29.99");
    }

    #[test]
    fn test_descendants_only() {
        let html = r#"
        <div class="product">
            <span class="name">Product A</span>
            <span class="unit-price">€1.50/kg</span>
        </div>
        <span class="name">Outside</span>
        "#;

        let document = Html::parse_fragment(html);
        let product = select_css(document.root_element(), "div.product").unwrap()[0];
        let names = select_css(product, "span.name").unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].text().collect::<String>(), "Product A");

        // the element itself is not a candidate
        assert!(select_css(product, "div.product").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_selector() {
        let document = Html::parse_fragment("<p>x</p>");
        let err = select_css(document.root_element(), "p[").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidCss { .. }));
    }
}
