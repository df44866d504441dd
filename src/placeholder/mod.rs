//! Placeholder token primitives.
//!
//! A placeholder is a `{{path}}` marker standing in for a value that is only
//! known at deployment time. Everything that templatizes text in this crate
//! goes through the helpers here so that already-templatized content is never
//! wrapped a second time.
//!
//! # Examples
//!
//! ```
//! use solution_templates::placeholder::{placeholder, templatize_term, is_wrapped};
//!
//! assert_eq!(placeholder("abc.url"), "{{abc.url}}");
//! assert_eq!(templatize_term("abc123", "abc123", ".itemId"), "{{abc123.itemId}}");
//! assert!(is_wrapped("{{abc123.itemId}}"));
//! ```

pub mod ids;

use regex::{Captures, Regex};
use serde_json::Value;
use std::ops::Range;
use std::sync::LazyLock;

use crate::constants::{PLACEHOLDER_END, PLACEHOLDER_START};

pub use ids::{
    IdScanner, IdScannerKind, SerializedIdScanner, TreeIdScanner, get_ids, templatize_ids,
    templatize_terms,
};

/// Matches one placeholder token, capturing its body.
pub(crate) static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+?)\}\}").expect("token pattern compiles"));

/// Wrap a term in placeholder markers.
#[must_use]
pub fn placeholder(term: &str) -> String {
    format!("{PLACEHOLDER_START}{term}{PLACEHOLDER_END}")
}

/// Returns true when `value` already starts with a placeholder marker.
#[must_use]
pub fn is_wrapped(value: &str) -> bool {
    value.starts_with(PLACEHOLDER_START)
}

/// Strip the markers from a value consisting of exactly one placeholder.
///
/// Returns `None` if the value is not a single complete token.
#[must_use]
pub fn unwrap_placeholder(value: &str) -> Option<&str> {
    let inner = value.strip_prefix(PLACEHOLDER_START)?.strip_suffix(PLACEHOLDER_END)?;
    if inner.is_empty() || inner.contains(PLACEHOLDER_START) || inner.contains(PLACEHOLDER_END) {
        return None;
    }
    Some(inner)
}

/// Replace every literal occurrence of `term` in `context` with
/// `{{term + suffix}}`.
///
/// The substitution is single-pass and has no token-boundary awareness; it is
/// meant for ids that are already known to be unique. A context that already
/// starts with `{{` is returned unchanged.
#[must_use]
pub fn templatize_term(context: &str, term: &str, suffix: &str) -> String {
    if term.is_empty() || is_wrapped(context) {
        return context.to_string();
    }
    context.replace(term, &placeholder(&format!("{term}{suffix}")))
}

/// Byte ranges of every placeholder token present in `text`.
#[must_use]
pub fn token_spans(text: &str) -> Vec<Range<usize>> {
    TOKEN_REGEX.find_iter(text).map(|m| m.range()).collect()
}

/// Returns true if `range` overlaps any of the token `spans`.
#[must_use]
pub fn overlaps_token(spans: &[Range<usize>], range: &Range<usize>) -> bool {
    spans.iter().any(|span| range.start < span.end && span.start < range.end)
}

/// Rewrite every match of `pattern` that lies outside existing tokens.
///
/// Matches overlapping a `{{...}}` token (including a name immediately
/// followed by `}}`) are left alone, which makes every caller idempotent.
pub fn replace_outside_tokens<F>(text: &str, pattern: &Regex, mut replacement: F) -> String
where
    F: FnMut(&Captures<'_>) -> String,
{
    let spans = token_spans(text);
    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    for caps in pattern.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let range = whole.range();
        if overlaps_token(&spans, &range) || text[range.end..].starts_with(PLACEHOLDER_END) {
            continue;
        }
        result.push_str(&text[last..range.start]);
        result.push_str(&replacement(&caps));
        last = range.end;
    }

    result.push_str(&text[last..]);
    result
}

/// Returns true if any string (or object key) in `value` still contains a
/// placeholder token.
#[must_use]
pub fn has_unresolved_placeholders(value: &Value) -> bool {
    match value {
        Value::String(s) => TOKEN_REGEX.is_match(s),
        Value::Array(items) => items.iter().any(has_unresolved_placeholders),
        Value::Object(map) => map
            .iter()
            .any(|(key, item)| TOKEN_REGEX.is_match(key) || has_unresolved_placeholders(item)),
        _ => false,
    }
}
