//! Selector resolution
//!
//! Raw selector strings look like `[css] h1 div`, `[xpath] //li` or
//! `[regexp] price:\s(\d+)`. Anything else resolves to `None` and the field
//! carrying it is skipped.

use regex::{Regex, RegexBuilder};
use std::fmt;

use crate::error::ExtractError;

/// Query capability a selector needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    Css,
    XPath,
    RegexScan,
}

impl SelectorKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "css" => Some(SelectorKind::Css),
            "xpath" => Some(SelectorKind::XPath),
            "regexp" => Some(SelectorKind::RegexScan),
            _ => None,
        }
    }
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorKind::Css => f.write_str("CSS"),
            SelectorKind::XPath => f.write_str("XPath"),
            SelectorKind::RegexScan => f.write_str("regexp"),
        }
    }
}

/// A resolved selector: kind plus pattern
///
/// CSS and XPath patterns stay literal strings and are parsed when queried.
/// Regex patterns are compiled here.
#[derive(Debug, Clone)]
pub enum SelectorSpec {
    Css(String),
    XPath(String),
    RegexScan(Regex),
}

impl SelectorSpec {
    pub fn kind(&self) -> SelectorKind {
        match self {
            SelectorSpec::Css(_) => SelectorKind::Css,
            SelectorSpec::XPath(_) => SelectorKind::XPath,
            SelectorSpec::RegexScan(_) => SelectorKind::RegexScan,
        }
    }

    pub fn pattern(&self) -> &str {
        match self {
            SelectorSpec::Css(pattern) | SelectorSpec::XPath(pattern) => pattern,
            SelectorSpec::RegexScan(regex) => regex.as_str(),
        }
    }
}

/// Resolve a raw `[kind] pattern` string
///
/// Returns `Ok(None)` when the string has no leading bracket tag, the tag is
/// unknown, or the pattern is empty. Only a `[regexp]` pattern that fails to
/// compile is an error.
pub fn resolve(raw: &str) -> Result<Option<SelectorSpec>, ExtractError> {
    let Some((tag, pattern)) = split_tag(raw) else {
        return Ok(None);
    };
    let Some(kind) = SelectorKind::from_tag(tag) else {
        return Ok(None);
    };

    let spec = match kind {
        SelectorKind::Css => SelectorSpec::Css(pattern.to_string()),
        SelectorKind::XPath => SelectorSpec::XPath(pattern.to_string()),
        SelectorKind::RegexScan => SelectorSpec::RegexScan(compile_scan_pattern(pattern)?),
    };

    Ok(Some(spec))
}

/// Split `[tag] pattern` into its parts
///
/// Exactly one whitespace character separates the tag from the pattern, and
/// the pattern runs to the end of the first line.
fn split_tag(raw: &str) -> Option<(&str, &str)> {
    let rest = raw.trim_start().strip_prefix('[')?;
    let close = rest.find(']')?;
    let tag = &rest[..close];

    let mut after = rest[close + 1..].chars();
    if !after.next()?.is_whitespace() {
        return None;
    }
    let pattern = after.as_str();
    let pattern = pattern.split('\n').next().unwrap_or(pattern).trim_end_matches('\r');

    if pattern.is_empty() {
        return None;
    }

    Some((tag, pattern))
}

fn compile_scan_pattern(pattern: &str) -> Result<Regex, ExtractError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .ignore_whitespace(true)
        .multi_line(true)
        .build()
        .map_err(|source| ExtractError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })
}
