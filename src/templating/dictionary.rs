//! The template dictionary: facts discovered while a Solution is deployed.
//!
//! Keys are source item ids and derived keys such as `itemId.layer0`. Values
//! are arbitrary JSON, typically `{ itemId, url, name, layer0: { fields } }`
//! for a created item, or organization-level facts under well-known keys.
//!
//! Lookups use dotted paths. The longest flat key matching a prefix of the
//! path wins, and the remaining segments descend into the stored JSON
//! (numeric segments index arrays). A path is therefore resolved the same way
//! whether facts were stored flat (`"svc.layer0"`) or nested (`"svc"` →
//! `layer0`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::utils::merge_json;
use crate::constants::{FIELDS_SEGMENT, LAYER_SEGMENT};
use crate::core::SolutionError;

/// Facts recorded for an item after it has been created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFacts {
    /// Id of the newly created item.
    pub item_id: String,
    /// Service or item URL of the new item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Name of the new item (service name for feature services).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Any other facts (layer urls, organization info, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemFacts {
    /// Facts for a newly created item.
    pub fn new(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            ..Self::default()
        }
    }

    /// Set the item URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the item name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add an extra fact.
    #[must_use]
    pub fn with_fact(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// The result of a successful dictionary lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lookup<'a> {
    /// The flat key that matched a prefix of the path.
    pub key: &'a str,
    /// The raw dictionary entry stored under `key`.
    pub entry: &'a Value,
    /// The value found at the full path.
    pub value: &'a Value,
}

/// Flat-keyed map of deployment facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateDictionary {
    entries: Map<String, Value>,
}

impl TemplateDictionary {
    /// Create an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the dictionary has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `key` is a top-level key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The entry stored under the flat `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Top-level keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// Deep-merge `value` into the entry under `key`.
    pub fn merge(&mut self, key: &str, value: &Value) {
        match self.entries.get_mut(key) {
            Some(existing) => merge_json(existing, value),
            None => {
                self.entries.insert(key.to_string(), value.clone());
            }
        }
    }

    /// Record the facts of an item created from the template `source_id`.
    pub fn record_item(&mut self, source_id: &str, facts: &ItemFacts) {
        match serde_json::to_value(facts) {
            Ok(value) => self.merge(source_id, &value),
            Err(e) => tracing::warn!("Could not record facts for {source_id}: {e}"),
        }
    }

    /// Store the field name mapping of one layer under
    /// `source_id.layer<layer_id>.fields`.
    pub fn set_layer_fields(&mut self, source_id: &str, layer_id: &str, fields: Map<String, Value>) {
        let mut layer = Map::new();
        layer.insert(FIELDS_SEGMENT.to_string(), Value::Object(fields));
        let mut entry = Map::new();
        entry.insert(format!("{LAYER_SEGMENT}{layer_id}"), Value::Object(layer));
        self.merge(source_id, &Value::Object(entry));
    }

    /// Merge per-layer settings (`{ "layer0": { "fields": ... }, ... }`) into
    /// the entry of `source_id`.
    pub fn apply_layer_settings(&mut self, source_id: &str, settings: &Map<String, Value>) {
        self.merge(source_id, &Value::Object(settings.clone()));
    }

    /// The longest flat key that is a prefix of `path`, with its entry.
    #[must_use]
    pub fn entry_for(&self, path: &str) -> Option<(&str, &Value)> {
        let segments: Vec<&str> = path.split('.').collect();
        (1..=segments.len()).rev().find_map(|count| {
            let key = segments[..count].join(".");
            self.entries.get_key_value(key.as_str()).map(|(k, v)| (k.as_str(), v))
        })
    }

    /// Resolve a dotted `path`.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<Lookup<'_>> {
        let segments: Vec<&str> = path.split('.').collect();
        (1..=segments.len()).rev().find_map(|count| {
            let key = segments[..count].join(".");
            let (key, entry) = self.entries.get_key_value(key.as_str())?;
            let value = descend(entry, &segments[count..])?;
            Some(Lookup {
                key: key.as_str(),
                entry,
                value,
            })
        })
    }

    /// The value at a dotted `path`.
    #[must_use]
    pub fn lookup_value(&self, path: &str) -> Option<&Value> {
        self.lookup(path).map(|found| found.value)
    }

    /// Every dotted path into the dictionary, down to `max_depth` segments
    /// below each top-level key.
    #[must_use]
    pub fn paths(&self, max_depth: usize) -> Vec<String> {
        let mut paths = Vec::new();
        for (key, value) in &self.entries {
            collect_paths(key, value, max_depth, &mut paths);
        }
        paths
    }

    /// The dictionary as a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.entries.clone())
    }
}

impl TryFrom<Value> for TemplateDictionary {
    type Error = SolutionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(entries) => Ok(Self {
                entries,
            }),
            other => Err(SolutionError::DictionaryParse {
                path: "<value>".to_string(),
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn descend<'a>(value: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    segments.iter().try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(*segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn collect_paths(prefix: &str, value: &Value, depth: usize, paths: &mut Vec<String>) {
    paths.push(prefix.to_string());
    if depth == 0 {
        return;
    }
    if let Value::Object(map) = value {
        for (key, child) in map {
            collect_paths(&format!("{prefix}.{key}"), child, depth - 1, paths);
        }
    }
}
