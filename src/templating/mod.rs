//! Placeholder substitution for item templates.
//!
//! This module resolves the `{{...}}` tokens left in a template by the
//! templatization passes, using the facts gathered while a Solution is
//! deployed.
//!
//! # Overview
//!
//! - [`TemplateDictionary`]: flat-keyed deployment facts with dotted lookup
//! - [`Transforms`]: named functions applied through `{{path:name}}` or a
//!   final `.name` segment
//! - [`resolve`] / [`resolve_in_place`]: walk a JSON document and substitute
//!   every token that can be resolved
//! - [`find_unresolved`] / [`report_unresolved`]: list what is left
//!
//! # Token Resolution
//!
//! For each token, in order:
//!
//! 1. An explicit `:transform` is applied to the value at the token path.
//! 2. Otherwise, if the final path segment names a registered transform, that
//!    transform is applied to the value at the rest of the path.
//! 3. Otherwise the whole path is looked up in the dictionary.
//! 4. If nothing resolved, the `||default` literal is used when present.
//!
//! A token that still has no value is left in place, unchanged. Resolution
//! never fails.
//!
//! # Value Types
//!
//! A string made of exactly one token takes the resolved value with its JSON
//! type, so `"{{svc.layer0.id}}"` can become the number `0`. Tokens embedded
//! in longer text are stringified. Object keys are resolved as well, since
//! templatized attribute maps carry field tokens in their keys.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use solution_templates::templating::{TemplateDictionary, Transforms, resolve};
//!
//! let dictionary = TemplateDictionary::try_from(json!({
//!     "svc": { "itemId": "new-id", "url": "https://host/svc/FeatureServer" }
//! })).unwrap();
//!
//! let template = json!({
//!     "id": "{{svc.itemId}}",
//!     "url": "{{svc.url}}/0",
//!     "other": "{{unknown.itemId}}"
//! });
//! let resolved = resolve(&template, &dictionary, &Transforms::with_builtins());
//! assert_eq!(resolved["id"], "new-id");
//! assert_eq!(resolved["url"], "https://host/svc/FeatureServer/0");
//! assert_eq!(resolved["other"], "{{unknown.itemId}}");
//! ```

pub mod diagnostics;
pub mod dictionary;
pub mod token;
pub mod transforms;
pub mod utils;

use regex::Captures;
use serde_json::Value;
use tracing::{debug, trace};

use crate::constants::PLACEHOLDER_START;
use crate::placeholder::TOKEN_REGEX;

pub use diagnostics::{UnresolvedToken, find_unresolved, report_unresolved};
pub use dictionary::{ItemFacts, Lookup, TemplateDictionary};
pub use token::Token;
pub use transforms::{
    DEFAULT_LOCATOR_URL, TO_LOWER_CASE, TransformFn, TransformInput, Transforms,
};
pub use utils::merge_json;

/// Resolve every placeholder in `template`, returning a new document.
#[must_use]
pub fn resolve(template: &Value, dictionary: &TemplateDictionary, transforms: &Transforms) -> Value {
    let mut resolved = template.clone();
    resolve_in_place(&mut resolved, dictionary, transforms);
    resolved
}

/// Resolve every placeholder in `value` in place.
pub fn resolve_in_place(value: &mut Value, dictionary: &TemplateDictionary, transforms: &Transforms) {
    match value {
        Value::String(text) => {
            if let Some(resolved) = resolve_string(text, dictionary, transforms) {
                *value = resolved;
            }
        }
        Value::Array(items) => {
            for item in items {
                resolve_in_place(item, dictionary, transforms);
            }
        }
        Value::Object(map) => {
            if map.keys().any(|key| key.contains(PLACEHOLDER_START)) {
                let entries = std::mem::take(map);
                for (key, mut child) in entries {
                    let key = match resolve_string(&key, dictionary, transforms) {
                        Some(resolved) => utils::embed_value(&resolved),
                        None => key,
                    };
                    resolve_in_place(&mut child, dictionary, transforms);
                    map.insert(key, child);
                }
            } else {
                for child in map.values_mut() {
                    resolve_in_place(child, dictionary, transforms);
                }
            }
        }
        _ => {}
    }
}

/// Resolve the tokens of one string.
///
/// Returns `None` when nothing in `text` could be resolved.
#[must_use]
pub fn resolve_string(
    text: &str,
    dictionary: &TemplateDictionary,
    transforms: &Transforms,
) -> Option<Value> {
    if !text.contains(PLACEHOLDER_START) {
        return None;
    }

    if let Some(captures) = TOKEN_REGEX.captures(text)
        && let Some(whole) = captures.get(0)
        && whole.start() == 0
        && whole.end() == text.len()
    {
        return resolve_token(&captures[1], dictionary, transforms);
    }

    let mut changed = false;
    let replaced = TOKEN_REGEX.replace_all(text, |captures: &Captures| {
        match resolve_token(&captures[1], dictionary, transforms) {
            Some(value) => {
                changed = true;
                utils::embed_value(&value)
            }
            None => captures[0].to_string(),
        }
    });
    changed.then(|| Value::String(replaced.into_owned()))
}

fn resolve_token(
    body: &str,
    dictionary: &TemplateDictionary,
    transforms: &Transforms,
) -> Option<Value> {
    let token = Token::parse(body);

    let resolved = match token.transform {
        Some(name) => apply_transform(name, token.path, dictionary, transforms),
        None => match token.suffix() {
            Some((path, name)) if transforms.contains(name) => {
                apply_transform(name, path, dictionary, transforms)
            }
            _ => dictionary.lookup_value(token.path).cloned(),
        },
    };

    match resolved {
        Some(value) => {
            trace!("Resolved {{{{{body}}}}}");
            Some(value)
        }
        None => token.default.map(|default| Value::String(default.to_string())),
    }
}

fn apply_transform(
    name: &str,
    path: &str,
    dictionary: &TemplateDictionary,
    transforms: &Transforms,
) -> Option<Value> {
    let Some(transform) = transforms.get(name) else {
        debug!("Unknown transform '{name}' for path '{path}'");
        return None;
    };
    let lookup = dictionary.lookup(path);
    let input = TransformInput {
        path,
        value: lookup.map(|found| found.value),
        entry: lookup
            .map(|found| found.entry)
            .or_else(|| dictionary.entry_for(path).map(|(_, entry)| entry)),
        dictionary,
    };
    transform(&input)
}
