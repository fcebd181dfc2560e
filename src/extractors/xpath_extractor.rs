//! XPath-based extraction
//!
//! scraper has no XPath support, so the element's subtree is mirrored into an
//! sxd_document package and evaluated with sxd_xpath. Element results are
//! mapped back to the scraper elements they were copied from.

use scraper::{ElementRef, Node};
use std::collections::HashMap;
use sxd_document::dom::{Document, Element};
use sxd_document::Package;
use sxd_xpath::nodeset::Node as XNode;
use sxd_xpath::{Context, Factory, Value as XValue};

use crate::error::ExtractError;
use crate::node::NodeRef;

/// Evaluate an XPath expression with `element` as the context node
///
/// Element results keep their tree handle. Text, attribute and other nodes
/// become text matches by their string value, as do string, number and
/// boolean results.
pub fn select_xpath<'a>(
    element: ElementRef<'a>,
    expression: &str,
) -> Result<Vec<NodeRef<'a>>, ExtractError> {
    let xpath = Factory::new()
        .build(expression)
        .map_err(|e| ExtractError::InvalidXPath {
            expression: expression.to_string(),
            message: format!("{:?}", e),
        })?
        .ok_or_else(|| ExtractError::InvalidXPath {
            expression: expression.to_string(),
            message: "empty expression".to_string(),
        })?;

    let package = Package::new();
    let document = package.as_document();
    let mut origins = HashMap::new();
    let context_node = mirror_element(&document, element, &mut origins);
    document.root().append_child(context_node);

    let context = Context::new();
    let value = xpath
        .evaluate(&context, context_node)
        .map_err(|e| ExtractError::XPathEvaluation {
            expression: expression.to_string(),
            message: format!("{:?}", e),
        })?;

    let matches = match value {
        XValue::Nodeset(nodes) => nodes
            .document_order()
            .into_iter()
            .map(|node| match node {
                XNode::Element(_) => match origins.get(&node) {
                    Some(original) => NodeRef::Element(*original),
                    None => NodeRef::Text(node.string_value()),
                },
                other => NodeRef::Text(other.string_value()),
            })
            .collect(),
        XValue::String(s) => vec![NodeRef::Text(s)],
        XValue::Number(n) => vec![NodeRef::Text(n.to_string())],
        XValue::Boolean(b) => vec![NodeRef::Text(b.to_string())],
    };

    Ok(matches)
}

/// Copy `element` and its element/text descendants into `document`
///
/// Every copied element is keyed to the scraper element it came from.
fn mirror_element<'d, 'a>(
    document: &Document<'d>,
    element: ElementRef<'a>,
    origins: &mut HashMap<XNode<'d>, ElementRef<'a>>,
) -> Element<'d> {
    let copy = document.create_element(element.value().name());
    for (name, value) in element.value().attrs() {
        copy.set_attribute_value(name, value);
    }
    origins.insert(XNode::Element(copy), element);

    for child in element.children() {
        match child.value() {
            Node::Text(text) => copy.append_child(document.create_text(&**text)),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    copy.append_child(mirror_element(document, child_element, origins));
                }
            }
            _ => {}
        }
    }

    copy
}
