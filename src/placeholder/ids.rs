//! Item id and term scanning over whole JSON documents.
//!
//! Item ids are 32-character hex strings. They show up in id fields, but also
//! inside URLs, descriptions and other prose, so the default scanner works on
//! the serialized document rather than walking known properties.
//!
//! The scanning strategy is isolated behind [`IdScanner`]:
//! - [`SerializedIdScanner`] serializes the value, rewrites the text and parses
//!   it back (the default)
//! - [`TreeIdScanner`] walks the tree and rewrites every string leaf and key
//!
//! Both only accept exact 32-character hex spans bounded by non-alphanumeric
//! context, and both skip ids that are preceded by `{`, so running either one
//! over already-templatized content changes nothing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::{placeholder, replace_outside_tokens};
use crate::constants::{GUID_LENGTH, ITEM_ID_SUFFIX};

/// Maximal runs of ASCII alphanumerics; candidate ids are runs of exactly 32.
static ALNUM_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9A-Za-z]+").expect("alphanumeric run pattern compiles"));

/// Byte ranges of bare item ids in `text`.
fn bare_id_ranges(text: &str) -> Vec<Range<usize>> {
    id_ranges(text, false)
}

/// Byte ranges of bare item ids in serialized JSON.
///
/// A run that starts right after an escaping backslash begins with the
/// escape itself (`n` of `\n`, `u001f` of `\u001f`), which is not part of
/// the decoded text, so it is skipped before the length check.
fn serialized_id_ranges(json: &str) -> Vec<Range<usize>> {
    id_ranges(json, true)
}

fn id_ranges(text: &str, escaped: bool) -> Vec<Range<usize>> {
    ALNUM_RUN
        .find_iter(text)
        .map(|m| {
            let skip = if escaped { escape_len(text, m.start(), m.as_str()) } else { 0 };
            m.start() + skip..m.end()
        })
        .filter(|range| range.len() == GUID_LENGTH)
        .filter(|range| text[range.clone()].bytes().all(|b| b.is_ascii_hexdigit()))
        .filter(|range| !text[..range.start].ends_with('{'))
        .collect()
}

/// Length of the escape sequence body at the start of `run`, if the run
/// follows an unescaped backslash.
fn escape_len(text: &str, start: usize, run: &str) -> usize {
    let backslashes = text[..start].bytes().rev().take_while(|&b| b == b'\\').count();
    if backslashes % 2 == 0 {
        0
    } else if run.starts_with('u') {
        run.len().min(5)
    } else {
        1
    }
}

/// Extract the unique bare item ids from free text, in first-seen order.
///
/// Ids already wrapped in `{{`/`}}` or preceded by a single `{` are skipped,
/// as are hex runs longer than 32 characters (for example two concatenated
/// ids).
///
/// # Examples
///
/// ```
/// use solution_templates::placeholder::get_ids;
///
/// let text = "see 0123456789abcdef0123456789abcdef and {{fedcba9876543210fedcba9876543210.itemId}}";
/// assert_eq!(get_ids(text), vec!["0123456789abcdef0123456789abcdef".to_string()]);
/// ```
#[must_use]
pub fn get_ids(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    bare_id_ranges(text)
        .into_iter()
        .map(|range| text[range].to_string())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Wrap every bare id occurrence in `text` as `{{id.itemId}}`.
fn wrap_bare_ids(text: &str) -> String {
    wrap_ranges(text, bare_id_ranges(text))
}

fn wrap_ranges(text: &str, ranges: Vec<Range<usize>>) -> String {
    if ranges.is_empty() {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len() + ranges.len() * 12);
    let mut last = 0;
    for range in ranges {
        result.push_str(&text[last..range.start]);
        result.push_str(&placeholder(&format!("{}{ITEM_ID_SUFFIX}", &text[range.clone()])));
        last = range.end;
    }
    result.push_str(&text[last..]);
    result
}

/// Strategy for templatizing the item ids embedded in a JSON value.
pub trait IdScanner {
    /// Return a copy of `value` with every bare id replaced by `{{id.itemId}}`.
    fn templatize_ids(&self, value: &Value) -> Value;
}

/// Scans the serialized document: stringify, rewrite, parse back.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializedIdScanner;

impl IdScanner for SerializedIdScanner {
    fn templatize_ids(&self, value: &Value) -> Value {
        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(e) => {
                warn!("Could not serialize value for id scanning ({e}); walking the tree instead");
                return TreeIdScanner.templatize_ids(value);
            }
        };

        let ranges = serialized_id_ranges(&text);
        if ranges.is_empty() {
            return value.clone();
        }
        debug!("Templatizing {} item id occurrence(s)", ranges.len());

        match serde_json::from_str(&wrap_ranges(&text, ranges)) {
            Ok(templatized) => templatized,
            Err(e) => {
                warn!("Templatized document no longer parses ({e}); walking the tree instead");
                TreeIdScanner.templatize_ids(value)
            }
        }
    }
}

/// Walks the JSON tree and rewrites string leaves and object keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeIdScanner;

impl IdScanner for TreeIdScanner {
    fn templatize_ids(&self, value: &Value) -> Value {
        map_strings(value, &|s| wrap_bare_ids(s))
    }
}

/// Selects an [`IdScanner`] implementation, typically from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdScannerKind {
    /// [`SerializedIdScanner`]
    #[default]
    Serialized,
    /// [`TreeIdScanner`]
    Tree,
}

impl IdScannerKind {
    /// Instantiate the selected scanner.
    #[must_use]
    pub fn scanner(self) -> Box<dyn IdScanner> {
        match self {
            Self::Serialized => Box::new(SerializedIdScanner),
            Self::Tree => Box::new(TreeIdScanner),
        }
    }
}

/// Templatize every bare item id in `value` with the default scanner.
///
/// Applying this twice yields the same result as applying it once.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use solution_templates::placeholder::templatize_ids;
///
/// let item = json!({ "url": "https://host/items/0123456789abcdef0123456789abcdef/data" });
/// let templatized = templatize_ids(&item);
/// assert_eq!(
///     templatized["url"],
///     "https://host/items/{{0123456789abcdef0123456789abcdef.itemId}}/data"
/// );
/// assert_eq!(templatize_ids(&templatized), templatized);
/// ```
#[must_use]
pub fn templatize_ids(value: &Value) -> Value {
    SerializedIdScanner.templatize_ids(value)
}

/// Replace each occurrence of every term in `terms` with `{{term + suffix}}`
/// across the whole document.
///
/// Occurrences already inside a token are left alone. Unlike
/// [`templatize_term`](super::templatize_term) this works over a full JSON value,
/// for example to templatize the ids of every sibling template at once.
#[must_use]
pub fn templatize_terms<S: AsRef<str>>(value: &Value, terms: &[S], suffix: &str) -> Value {
    let mut seen = HashSet::new();
    let unique: Vec<&str> = terms
        .iter()
        .map(AsRef::as_ref)
        .filter(|term| !term.is_empty() && seen.insert(*term))
        .collect();
    if unique.is_empty() {
        return value.clone();
    }

    let rewrite = |text: &str| {
        unique.iter().fold(text.to_string(), |acc, term| {
            match Regex::new(&regex::escape(term)) {
                Ok(re) => {
                    replace_outside_tokens(&acc, &re, |_| placeholder(&format!("{term}{suffix}")))
                }
                Err(_) => acc,
            }
        })
    };

    if let Ok(text) = serde_json::to_string(value)
        && let Ok(templatized) = serde_json::from_str(&rewrite(&text))
    {
        return templatized;
    }
    map_strings(value, &rewrite)
}

/// Rebuild `value`, applying `f` to every string leaf and object key.
fn map_strings(value: &Value, f: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(s)),
        Value::Array(items) => Value::Array(items.iter().map(|item| map_strings(item, f)).collect()),
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, item) in map {
                out.insert(f(key), map_strings(item, f));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ID_A: &str = "0123456789abcdef0123456789abcdef";
    const ID_B: &str = "FEDCBA9876543210FEDCBA9876543210";

    #[test]
    fn test_get_ids_finds_exact_spans() {
        let text = format!("a {ID_A} b /{ID_B}/ c {ID_A}");
        assert_eq!(get_ids(&text), vec![ID_A.to_string(), ID_B.to_string()]);
    }

    #[test]
    fn test_get_ids_skips_wrapped_and_bracketed() {
        let text = format!("{{{{{ID_A}.itemId}}}} and {{{ID_B}}}");
        assert!(get_ids(&text).is_empty());
    }

    #[test]
    fn test_get_ids_rejects_concatenated_ids() {
        let text = format!("{ID_A}{ID_B}");
        assert!(get_ids(&text).is_empty());
        let text = format!("x{ID_A}");
        assert!(get_ids(&text).is_empty());
    }

    #[test]
    fn test_get_ids_rejects_non_hex() {
        let text = "0123456789abcdef0123456789abcdeg";
        assert!(get_ids(text).is_empty());
    }

    #[test]
    fn test_templatize_ids_every_occurrence() {
        let value = json!({
            "id": ID_A,
            "text": format!("Map {ID_A} uses layer {ID_B}"),
            "list": [ID_B]
        });
        let out = templatize_ids(&value);
        let a = format!("{{{{{ID_A}.itemId}}}}");
        let b = format!("{{{{{ID_B}.itemId}}}}");
        assert_eq!(out["id"], Value::String(a.clone()));
        assert_eq!(out["text"], Value::String(format!("Map {a} uses layer {b}")));
        assert_eq!(out["list"][0], Value::String(b));
    }

    #[test]
    fn test_templatize_ids_is_idempotent() {
        let value = json!({ "url": format!("https://x/{ID_A}?b={ID_B}"), "k": { ID_A: 1 } });
        let once = templatize_ids(&value);
        assert_eq!(templatize_ids(&once), once);
    }

    #[test]
    fn test_tree_scanner_matches_serialized_scanner() {
        let value = json!({ "a": [ID_A, { "b": format!("{ID_B} text") }], "n": 3 });
        assert_eq!(
            TreeIdScanner.templatize_ids(&value),
            SerializedIdScanner.templatize_ids(&value)
        );
    }

    #[test]
    fn test_scanners_agree_next_to_escapes() {
        let cases = [
            json!({ "description": format!("Related items:\n{ID_A}\n") }),
            json!({ "tabbed": format!("\t{ID_A}\t{ID_B}\r\n") }),
            json!({ "html": format!("<a href=\"https://host/home/item.html?id={ID_A}\">{ID_B}</a>") }),
            json!({ "quoted": format!("\"{ID_A}\" and '{ID_B}'") }),
            json!({ "control": format!("\u{1f}{ID_A}") }),
            json!({ "backslash": format!("C:\\{ID_A}\\n{ID_B}") }),
            json!({ ID_A: { "title": format!("layer\n{ID_B}") } }),
        ];
        for value in cases {
            let tree = TreeIdScanner.templatize_ids(&value);
            assert_eq!(SerializedIdScanner.templatize_ids(&value), tree, "{value}");
            assert!(get_ids(&tree.to_string()).is_empty(), "{tree}");
        }
    }

    #[test]
    fn test_id_after_newline_is_templatized() {
        let value = json!({ "description": format!("Related items:\n{ID_A}\n") });
        let out = templatize_ids(&value);
        assert_eq!(out["description"], format!("Related items:\n{{{{{ID_A}.itemId}}}}\n"));
    }

    #[test]
    fn test_escaped_hex_run_is_not_an_id() {
        // the `0001` of the escape must not count towards the id
        let tail = &ID_A[4..];
        let value = json!({ "text": format!("\u{1}{tail}") });
        assert_eq!(templatize_ids(&value), value);
    }

    #[test]
    fn test_scanner_kind_selects_implementation() {
        let value = json!([ID_A]);
        let expected = json!([format!("{{{{{ID_A}.itemId}}}}")]);
        assert_eq!(IdScannerKind::Tree.scanner().templatize_ids(&value), expected);
        assert_eq!(IdScannerKind::Serialized.scanner().templatize_ids(&value), expected);
    }

    #[test]
    fn test_templatize_terms_skips_existing_tokens() {
        let value = json!({ "a": "svc and {{svc.url}}", "b": "svc" });
        let out = templatize_terms(&value, &["svc", "svc"], ".url");
        assert_eq!(out, json!({ "a": "{{svc.url}} and {{svc.url}}", "b": "{{svc.url}}" }));
        assert_eq!(templatize_terms(&out, &["svc"], ".url"), out);
    }
}
