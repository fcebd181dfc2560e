//! Stencil extraction engine
//!
//! For every field of a stencil: resolve its selector, query the node,
//! collapse a lone match to a scalar, recurse into `children`, then run the
//! field callback. An optional final hook sees the finished record.
//!
//! Extraction is a pure synchronous transform. A `Scraper` holds only its
//! options, so one instance can serve many threads.

use scraper::Html;
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::config::{ScrapeOptions, TextForm, UnsupportedPolicy};
use crate::error::ExtractError;
use crate::extractors::query;
use crate::node::NodeRef;
use crate::selector::resolve;
use crate::stencil::{FieldSpec, Stencil};

/// Extracted record, in stencil declaration order
pub type Record = Map<String, Value>;

/// Output of normalization
#[derive(Debug)]
pub enum Normalized<'a> {
    /// A lone match without children, as its text form
    Scalar(Value),
    /// Every match, for recursion or list conversion
    Matches(Vec<NodeRef<'a>>),
}

/// Collapse a single match to a scalar unless the field has children
///
/// The scalar is always a string, so a lone capture tuple reaches the callback
/// once as its matched text. Zero matches stay an empty list so the field is
/// still present.
pub fn normalize<'a>(
    mut matches: Vec<NodeRef<'a>>,
    spec: &FieldSpec,
    form: TextForm,
) -> Normalized<'a> {
    if matches.len() == 1 && spec.children.is_none() {
        if let Some(only) = matches.pop() {
            return Normalized::Scalar(Value::String(only.to_text(form)));
        }
    }
    Normalized::Matches(matches)
}

/// Run the field callback over a value
///
/// Lists are mapped element by element and elements mapped to "no value" are
/// dropped, keeping the order of the rest. Any other value is passed whole and
/// "no value" is stored as `null`. Callback errors abort the extraction.
pub fn apply_callback(field: &str, value: Value, spec: &FieldSpec) -> Result<Value, ExtractError> {
    let Some(callback) = &spec.callback else {
        return Ok(value);
    };

    let call = |item: Value| {
        callback(item).map_err(|source| ExtractError::Callback {
            field: field.to_string(),
            source,
        })
    };

    match value {
        Value::Array(items) => {
            let mut kept = Vec::with_capacity(items.len());
            for item in items {
                match call(item)? {
                    Some(Value::Null) | None => {}
                    Some(mapped) => kept.push(mapped),
                }
            }
            Ok(Value::Array(kept))
        }
        other => Ok(call(other)?.unwrap_or(Value::Null)),
    }
}

/// Apply an optional final hook to a finished record
pub fn finalize<F>(record: Record, hook: Option<F>) -> Record
where
    F: FnOnce(Record) -> Record,
{
    match hook {
        Some(hook) => hook(record),
        None => record,
    }
}

/// Stencil-driven extractor
#[derive(Debug, Clone, Default)]
pub struct Scraper {
    options: ScrapeOptions,
}

impl Scraper {
    pub fn new(options: ScrapeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScrapeOptions {
        &self.options
    }

    /// Extract a record from `node`
    pub fn parse(&self, node: &NodeRef<'_>, stencil: &Stencil) -> Result<Record, ExtractError> {
        self.parse_at(node, stencil, 0)
    }

    /// Extract a record from `node` and pass it through `final_touch`
    pub fn parse_with<F>(
        &self,
        node: &NodeRef<'_>,
        stencil: &Stencil,
        final_touch: F,
    ) -> Result<Record, ExtractError>
    where
        F: FnOnce(Record) -> Record,
    {
        let record = self.parse(node, stencil)?;
        Ok(finalize(record, Some(final_touch)))
    }

    /// Parse an HTML document and extract a record from its root
    pub fn parse_html(&self, html: &str, stencil: &Stencil) -> Result<Record, ExtractError> {
        let document = Html::parse_document(html);
        self.parse(&NodeRef::document(&document), stencil)
    }

    /// Run `children` on every match, one record per match
    pub fn descend(
        &self,
        matches: &[NodeRef<'_>],
        children: &Stencil,
    ) -> Result<Vec<Record>, ExtractError> {
        self.descend_at(matches, children, 1)
    }

    fn parse_at(
        &self,
        node: &NodeRef<'_>,
        stencil: &Stencil,
        depth: usize,
    ) -> Result<Record, ExtractError> {
        if depth > self.options.max_depth {
            return Err(ExtractError::DepthExceeded {
                max_depth: self.options.max_depth,
            });
        }

        let mut record = Record::new();
        for (name, spec) in stencil.iter() {
            if let Some(value) = self.extract_field(name, node, spec, depth)? {
                record.insert(name.to_string(), value);
            }
        }
        Ok(record)
    }

    fn descend_at(
        &self,
        matches: &[NodeRef<'_>],
        children: &Stencil,
        depth: usize,
    ) -> Result<Vec<Record>, ExtractError> {
        matches
            .iter()
            .map(|node| self.parse_at(node, children, depth))
            .collect()
    }

    /// Extract one field; `None` leaves it out of the record
    fn extract_field(
        &self,
        name: &str,
        node: &NodeRef<'_>,
        spec: &FieldSpec,
        depth: usize,
    ) -> Result<Option<Value>, ExtractError> {
        let Some(raw) = spec.selector.as_deref() else {
            debug!(field = name, "no selector, skipping field");
            return Ok(None);
        };
        let Some(selector) = resolve(raw)? else {
            debug!(field = name, selector = raw, "unrecognized selector, skipping field");
            return Ok(None);
        };

        let form = self.options.text_form;
        let matches = match query(node, &selector, form) {
            Ok(matches) => matches,
            Err(err @ ExtractError::UnsupportedSelector { .. })
                if self.options.on_unsupported == UnsupportedPolicy::Skip =>
            {
                warn!(field = name, error = %err, "skipping field");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        trace!(field = name, selector = raw, matches = matches.len(), "queried");

        let value = match normalize(matches, spec, form) {
            Normalized::Scalar(value) => value,
            Normalized::Matches(matches) => match &spec.children {
                Some(children) => Value::Array(
                    self.descend_at(&matches, children, depth + 1)?
                        .into_iter()
                        .map(Value::Object)
                        .collect(),
                ),
                None => Value::Array(matches.iter().map(|m| m.to_value(form)).collect()),
            },
        };

        apply_callback(name, value, spec).map(Some)
    }
}
