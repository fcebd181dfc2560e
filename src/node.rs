//! Nodes the engine can query
//!
//! A node is either a handle into a parsed document or a piece of text
//! produced by a regex scan or an XPath text result.

use scraper::{ElementRef, Html};
use serde_json::Value;

use crate::config::TextForm;

/// A tree handle or a text match
#[derive(Debug, Clone)]
pub enum NodeRef<'a> {
    Element(ElementRef<'a>),
    Text(String),
    /// One regex match with several capture groups
    Tuple {
        /// Whole matched text
        matched: String,
        /// `None` for groups that did not participate
        groups: Vec<Option<String>>,
    },
}

impl<'a> NodeRef<'a> {
    /// Root element of a parsed document or fragment
    pub fn document(html: &'a Html) -> Self {
        NodeRef::Element(html.root_element())
    }

    pub fn text(text: impl Into<String>) -> Self {
        NodeRef::Text(text.into())
    }

    /// Short name used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeRef::Element(_) => "element",
            NodeRef::Text(_) => "text",
            NodeRef::Tuple { .. } => "capture tuple",
        }
    }

    pub fn as_element(&self) -> Option<ElementRef<'a>> {
        match self {
            NodeRef::Element(el) => Some(*el),
            _ => None,
        }
    }

    /// String form of this node
    ///
    /// A capture tuple reads as the whole text its regex matched.
    pub fn to_text(&self, form: TextForm) -> String {
        match self {
            NodeRef::Element(el) => match form {
                TextForm::Text => el.text().collect(),
                TextForm::Html => el.html(),
            },
            NodeRef::Text(text) => text.clone(),
            NodeRef::Tuple { matched, .. } => matched.clone(),
        }
    }

    /// Value stored in a list for this node
    ///
    /// Tuples keep their groups as an array, with `null` for missing groups.
    pub fn to_value(&self, form: TextForm) -> Value {
        match self {
            NodeRef::Tuple { groups, .. } => Value::Array(
                groups
                    .iter()
                    .map(|group| match group {
                        Some(text) => Value::String(text.clone()),
                        None => Value::Null,
                    })
                    .collect(),
            ),
            other => Value::String(other.to_text(form)),
        }
    }
}

impl<'a> From<ElementRef<'a>> for NodeRef<'a> {
    fn from(el: ElementRef<'a>) -> Self {
        NodeRef::Element(el)
    }
}
