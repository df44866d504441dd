//! Utility functions for the templating system.

use serde_json::Value;

/// Perform a deep merge of `overrides` into `base`, in place.
///
/// For objects, fields from `overrides` are added or replace fields in
/// `base`, recursing into fields that are objects on both sides. For arrays
/// and primitives, `overrides` completely replaces `base`.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use solution_templates::templating::merge_json;
///
/// let mut base = json!({ "svc": { "itemId": "new1", "layer0": { "fields": {} } } });
/// merge_json(&mut base, &json!({ "svc": { "url": "https://host/svc" } }));
/// assert_eq!(base["svc"]["itemId"], "new1");
/// assert_eq!(base["svc"]["url"], "https://host/svc");
/// ```
pub fn merge_json(base: &mut Value, overrides: &Value) {
    match (base.as_object_mut(), overrides.as_object()) {
        (Some(base_obj), Some(override_obj)) => {
            for (key, override_value) in override_obj {
                match base_obj.get_mut(key) {
                    Some(base_value) if base_value.is_object() && override_value.is_object() => {
                        merge_json(base_value, override_value);
                    }
                    _ => {
                        base_obj.insert(key.clone(), override_value.clone());
                    }
                }
            }
        }
        _ => *base = overrides.clone(),
    }
}

/// Escape one reference token of a JSON pointer (RFC 6901).
pub(crate) fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Render a JSON value for embedding inside a larger string.
pub(crate) fn embed_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
