//! Stencils: declarative field maps
//!
//! A stencil maps output field names to `FieldSpec`s. Fields are extracted in
//! declaration order and records keep that order.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::CallbackError;

/// Transform applied to an extracted value
///
/// `Ok(None)` means "no value": the element is dropped from a list, or the
/// field is stored as `null` when the value is not a list.
pub type Callback = Arc<dyn Fn(Value) -> Result<Option<Value>, CallbackError> + Send + Sync>;

/// How to extract one field
#[derive(Clone, Default)]
pub struct FieldSpec {
    /// Raw selector string such as `[css] h1`; fields without one are skipped
    pub selector: Option<String>,
    pub callback: Option<Callback>,
    /// Nested stencil run once per match
    pub children: Option<Stencil>,
}

impl FieldSpec {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: Some(selector.into()),
            ..Self::default()
        }
    }

    /// Attach a fallible callback
    pub fn callback<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Option<Value>, CallbackError> + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(f));
        self
    }

    /// Attach an infallible callback
    pub fn map<F>(self, f: F) -> Self
    where
        F: Fn(Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.callback(move |value| Ok(f(value)))
    }

    pub fn children(mut self, children: Stencil) -> Self {
        self.children = Some(children);
        self
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("selector", &self.selector)
            .field("callback", &self.callback.as_ref().map(|_| "<fn>"))
            .field("children", &self.children)
            .finish()
    }
}

/// Ordered mapping of field name to `FieldSpec`
#[derive(Debug, Clone, Default)]
pub struct Stencil {
    fields: Vec<(String, FieldSpec)>,
}

impl Stencil {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing an existing field of the same name in place
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.insert(name, spec);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: FieldSpec) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = spec,
            None => self.fields.push((name, spec)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, spec)| spec)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
