//! Named transforms applied while resolving placeholders.
//!
//! A transform is selected either explicitly (`{{path:name}}`) or by the
//! final segment of the token path (`{{path.name}}`). It receives the value
//! at the remaining path, the raw dictionary entry that path lives in, and
//! the whole dictionary, and returns the replacement. Returning `None`
//! declines, which leaves the token as it was (or applies its `||default`).

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::dictionary::TemplateDictionary;

/// Name of the built-in transform returning the first geocoder URL.
pub const DEFAULT_LOCATOR_URL: &str = "defaultLocatorUrl";
/// Name of the built-in transform lowercasing a string value.
pub const TO_LOWER_CASE: &str = "toLowerCase";

/// Arguments passed to a transform.
#[derive(Debug, Clone, Copy)]
pub struct TransformInput<'a> {
    /// The token path with the transform suffix removed.
    pub path: &'a str,
    /// Value found at `path`, if any.
    pub value: Option<&'a Value>,
    /// Raw dictionary entry for the longest key prefix of `path`.
    pub entry: Option<&'a Value>,
    /// The full dictionary.
    pub dictionary: &'a TemplateDictionary,
}

/// Signature of a transform function.
pub type TransformFn = dyn Fn(&TransformInput<'_>) -> Option<Value> + Send + Sync;

/// Registry of named transforms.
#[derive(Clone, Default)]
pub struct Transforms {
    registry: BTreeMap<String, Arc<TransformFn>>,
}

impl Transforms {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in transforms.
    #[must_use]
    pub fn with_builtins() -> Self {
        Self::with_locator_fallback(None)
    }

    /// The built-in transforms, with `fallback` returned by
    /// `defaultLocatorUrl` when the dictionary has no geocoder.
    #[must_use]
    pub fn with_locator_fallback(fallback: Option<String>) -> Self {
        let mut transforms = Self::new();
        transforms.register(DEFAULT_LOCATOR_URL, move |input: &TransformInput<'_>| {
            default_locator_url(input).or_else(|| fallback.clone().map(Value::String))
        });
        transforms.register(TO_LOWER_CASE, to_lower_case);
        transforms
    }

    /// Register (or replace) the transform called `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, transform: F)
    where
        F: Fn(&TransformInput<'_>) -> Option<Value> + Send + Sync + 'static,
    {
        self.registry.insert(name.into(), Arc::new(transform));
    }

    /// Look up a transform by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TransformFn> {
        self.registry.get(name).map(|t| t.as_ref())
    }

    /// Returns true if a transform called `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.registry.keys().map(String::as_str)
    }
}

impl fmt::Debug for Transforms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// `val[0].url` of a list of helper services.
fn default_locator_url(input: &TransformInput<'_>) -> Option<Value> {
    input
        .value?
        .as_array()?
        .first()?
        .get("url")
        .filter(|url| url.is_string())
        .cloned()
}

fn to_lower_case(input: &TransformInput<'_>) -> Option<Value> {
    input.value?.as_str().map(|s| Value::String(s.to_lowercase()))
}
