//! Markup cleanup for use inside callbacks

use scraper::{ElementRef, Html, Node};
use serde_json::Value;
use std::sync::Arc;

use crate::error::CallbackError;
use crate::stencil::Callback;

/// Elements removed together with their contents
const REMOVE_CONTENTS: &[&str] = &[
    "iframe", "math", "noembed", "noframes", "noscript", "plaintext", "script", "style", "svg",
    "xmp",
];

/// Elements whose boundaries read as whitespace once tags are gone
const BLOCK: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "caption", "dd", "div", "dl", "dt",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot", "th",
    "thead", "tr", "ul",
];

/// Strip every tag from `markup`, returning its decoded text
///
/// Text on either side of a block element is separated by a single space.
pub fn clean(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    let mut out = Cleaned::default();
    out.walk(fragment.root_element());
    out.text
}

#[derive(Default)]
struct Cleaned {
    text: String,
    pending_space: bool,
}

impl Cleaned {
    fn walk(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            match child.value() {
                Node::Text(chunk) => self.push(chunk),
                Node::Element(el) if REMOVE_CONTENTS.contains(&el.name()) => {}
                Node::Element(el) => {
                    let Some(child) = ElementRef::wrap(child) else {
                        continue;
                    };
                    let block = BLOCK.contains(&el.name());
                    self.pending_space |= block;
                    self.walk(child);
                    self.pending_space |= block;
                }
                _ => {}
            }
        }
    }

    fn push(&mut self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        if self.pending_space
            && !self.text.is_empty()
            && !self.text.ends_with(char::is_whitespace)
            && !chunk.starts_with(char::is_whitespace)
        {
            self.text.push(' ');
        }
        self.pending_space = false;
        self.text.push_str(chunk);
    }
}

/// Callback that cleans and trims string values, dropping empty ones
///
/// Non-string values pass through unchanged.
pub fn clean_callback() -> Callback {
    Arc::new(|value: Value| -> Result<Option<Value>, CallbackError> {
        Ok(match value {
            Value::String(markup) => {
                let text = clean(&markup).trim().to_string();
                (!text.is_empty()).then_some(Value::String(text))
            }
            other => Some(other),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ScrapeOptions, TextForm};
    use crate::engine::Scraper;
    use crate::stencil::{FieldSpec, Stencil};

    #[test]
    fn test_clean_strips_tags_and_entities() {
        assert_eq!(clean("<div><b>Fish</b> &amp; Chips</div>"), "Fish & Chips");
        assert_eq!(clean("plain"), "plain");
        assert_eq!(clean("<p>kept<script>dropped()</script></p>"), "kept");
    }

    #[test]
    fn test_clean_separates_blocks() {
        assert_eq!(clean("<p>a</p><p>b</p>"), "a b");
        assert_eq!(clean("<ul><li>one</li><li>two</li></ul>"), "one two");
        assert_eq!(clean("line<br>break"), "line break");
        assert_eq!(clean("<p>a</p>\n<p>b</p>"), "a\nb");
        assert_eq!(clean("<b>in</b><i>line</i>"), "inline");
    }

    #[test]
    fn test_clean_callback() {
        let callback = clean_callback();
        assert_eq!(
            callback(Value::from("  <i>Name</i> ")).unwrap(),
            Some(Value::from("Name"))
        );
        assert_eq!(callback(Value::from("<br>")).unwrap(), None);
        assert_eq!(callback(Value::from(3)).unwrap(), Some(Value::from(3)));
    }

    #[test]
    fn test_clean_callback_in_stencil() {
        let html = r#"<html><body><h1><div> Super <em>Widget</em> </div></h1></body></html>"#;
        let mut name = FieldSpec::new("[css] h1 div");
        name.callback = Some(clean_callback());
        let stencil = Stencil::new().field("name", name);

        let scraper = Scraper::new(ScrapeOptions {
            text_form: TextForm::Html,
            ..ScrapeOptions::default()
        });
        let record = scraper.parse_html(html, &stencil).unwrap();
        assert_eq!(record["name"], Value::from("Super Widget"));
    }
}
