//! Query executors
//!
//! Each module runs one selector kind. `query` dispatches on the resolved
//! selector and the node it is applied to.

mod css_extractor;
mod regex_extractor;
mod xpath_extractor;

pub use css_extractor::*;
pub use regex_extractor::*;
pub use xpath_extractor::*;

use crate::config::TextForm;
use crate::error::ExtractError;
use crate::node::NodeRef;
use crate::selector::SelectorSpec;

/// Apply a resolved selector to a node, returning matches in document order
///
/// CSS and XPath need a tree handle and fail with `UnsupportedSelector` on
/// text matches. Regex scans run on the node's string form in `form`.
pub fn query<'a>(
    node: &NodeRef<'a>,
    spec: &SelectorSpec,
    form: TextForm,
) -> Result<Vec<NodeRef<'a>>, ExtractError> {
    match spec {
        SelectorSpec::Css(pattern) => {
            let element = require_element(node, spec)?;
            Ok(select_css(element, pattern)?
                .into_iter()
                .map(NodeRef::Element)
                .collect())
        }
        SelectorSpec::XPath(expression) => select_xpath(require_element(node, spec)?, expression),
        SelectorSpec::RegexScan(regex) => {
            let text = node.to_text(form);
            Ok(scan(&text, regex))
        }
    }
}

fn require_element<'a>(
    node: &NodeRef<'a>,
    spec: &SelectorSpec,
) -> Result<scraper::ElementRef<'a>, ExtractError> {
    node.as_element().ok_or(ExtractError::UnsupportedSelector {
        kind: spec.kind(),
        node: node.kind_name(),
    })
}
