//! Reporting of placeholders left unresolved after substitution.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use strsim::levenshtein;
use tracing::warn;

use super::dictionary::TemplateDictionary;
use super::token::Token;
use super::utils::escape_pointer_token;
use crate::placeholder::TOKEN_REGEX;

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// How deep below each dictionary key suggestion candidates are collected.
const SUGGESTION_DEPTH: usize = 4;

/// A placeholder token still present in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedToken {
    /// JSON pointer of the string (or object key) holding the token.
    pub pointer: String,
    /// The full token including braces.
    pub token: String,
    /// Similar dictionary paths, closest first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl fmt::Display for UnresolvedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pointer = if self.pointer.is_empty() { "/" } else { &self.pointer };
        write!(f, "{pointer}: {}", self.token)?;
        if !self.suggestions.is_empty() {
            write!(f, " (did you mean: {}?)", self.suggestions.join(", "))?;
        }
        Ok(())
    }
}

/// Find every token remaining in `value`, in document order.
#[must_use]
pub fn find_unresolved(value: &Value) -> Vec<UnresolvedToken> {
    let mut found = Vec::new();
    collect(value, &mut String::new(), &mut found);
    found
}

/// Find every remaining token, attach suggestions drawn from `dictionary`,
/// and log each one at `warn`.
pub fn report_unresolved(value: &Value, dictionary: &TemplateDictionary) -> Vec<UnresolvedToken> {
    let mut found = find_unresolved(value);
    if found.is_empty() {
        return found;
    }

    let available = dictionary.paths(SUGGESTION_DEPTH);
    for unresolved in &mut found {
        let body = unresolved.token.trim_start_matches('{').trim_end_matches('}');
        let path = Token::parse(body).path;
        unresolved.suggestions = find_similar_paths(path, &available);
        warn!("Unresolved placeholder {unresolved}");
    }
    found
}

/// Find similar dictionary paths using Levenshtein distance.
fn find_similar_paths(target: &str, available: &[String]) -> Vec<String> {
    let mut scored: Vec<_> = available
        .iter()
        .filter(|path| path.as_str() != target)
        .map(|path| (path.clone(), levenshtein(target, path)))
        .collect();

    scored.sort_by_key(|(_, dist)| *dist);

    scored
        .into_iter()
        .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .take(3)
        .map(|(path, _)| path)
        .collect()
}

fn collect(value: &Value, pointer: &mut String, found: &mut Vec<UnresolvedToken>) {
    match value {
        Value::String(text) => push_tokens(text, pointer, found),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let len = pointer.len();
                pointer.push_str(&format!("/{index}"));
                collect(item, pointer, found);
                pointer.truncate(len);
            }
        }
        Value::Object(map) => {
            for (key, child) in map {
                let len = pointer.len();
                pointer.push('/');
                pointer.push_str(&escape_pointer_token(key));
                push_tokens(key, pointer, found);
                collect(child, pointer, found);
                pointer.truncate(len);
            }
        }
        _ => {}
    }
}

fn push_tokens(text: &str, pointer: &str, found: &mut Vec<UnresolvedToken>) {
    for token in TOKEN_REGEX.find_iter(text) {
        found.push(UnresolvedToken {
            pointer: pointer.to_string(),
            token: token.as_str().to_string(),
            suggestions: Vec::new(),
        });
    }
}
