//! The set of field names a layer's references are matched against.

use regex::Regex;
use serde_json::Value;

use super::arcade::ArcadePatterns;
use super::path::FieldPath;
use crate::placeholder::{is_wrapped, replace_outside_tokens};

#[derive(Debug, Clone)]
struct FieldPattern {
    name: String,
    token: String,
    word: Option<Regex>,
    arcade: Option<ArcadePatterns>,
}

/// Field names of one layer together with the path their tokens point to.
///
/// Name lookups are case-insensitive. Free-text matching uses word
/// boundaries and is case-sensitive; Arcade matching is case-insensitive.
/// Nothing already inside a `{{...}}` token is ever rewritten.
#[derive(Debug, Clone)]
pub struct FieldScope {
    path: FieldPath,
    fields: Vec<FieldPattern>,
}

impl FieldScope {
    /// Scope over `names`, producing tokens under `path`.
    pub fn new<I, S>(path: FieldPath, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields: Vec<FieldPattern> = Vec::new();
        for name in names {
            let name = name.as_ref();
            if name.is_empty() || fields.iter().any(|f| f.name.eq_ignore_ascii_case(name)) {
                continue;
            }
            fields.push(FieldPattern {
                name: name.to_string(),
                token: path.token(name),
                word: Regex::new(&format!(r"\b{}\b", regex::escape(name))).ok(),
                arcade: ArcadePatterns::new(name),
            });
        }
        // longest first, so that no name is rewritten inside a longer one
        fields.sort_by(|a, b| b.name.len().cmp(&a.name.len()));
        Self {
            path,
            fields,
        }
    }

    /// Scope over the `fields[].name` entries of a layer definition.
    ///
    /// Returns `None` when the layer has no `id`.
    pub fn from_layer(item_id: &str, layer: &Value) -> Option<Self> {
        let layer_id = layer_id(layer)?;
        let names = layer
            .get("fields")
            .and_then(Value::as_array)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|f| f.get("name").and_then(Value::as_str))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Some(Self::new(FieldPath::new(item_id, layer_id), names))
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Field names, longest first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns true if `name` is one of the fields, ignoring case.
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    fn find(&self, name: &str) -> Option<&FieldPattern> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Token for a value that is exactly one field name.
    ///
    /// Wrapped values and unknown names are returned unchanged.
    pub fn name(&self, value: &str) -> String {
        if is_wrapped(value) {
            return value.to_string();
        }
        match self.find(value.trim()) {
            Some(field) => field.token.clone(),
            None => value.to_string(),
        }
    }

    /// Templatize a comma-separated list of field names.
    pub fn name_list(&self, value: &str) -> String {
        value.split(',').map(|name| self.name(name.trim())).collect::<Vec<_>>().join(",")
    }

    /// Templatize every whole-word occurrence of a field name in free text
    /// (SQL, labels, popup text).
    pub fn text(&self, value: &str) -> String {
        self.fields.iter().fold(value.to_string(), |text, field| match &field.word {
            Some(word) => replace_outside_tokens(&text, word, |_| field.token.clone()),
            None => text,
        })
    }

    /// Templatize field references in an Arcade expression.
    pub fn arcade(&self, value: &str) -> String {
        self.fields.iter().fold(value.to_string(), |text, field| match &field.arcade {
            Some(patterns) => patterns.apply(&text, &field.token),
            None => text,
        })
    }
}

/// The `id` of a layer definition as a string.
pub(crate) fn layer_id(layer: &Value) -> Option<String> {
    match layer.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
