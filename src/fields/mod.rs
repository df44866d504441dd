//! Field reference templatization for feature layers and tables.
//!
//! A layer definition refers to its own fields from many places: the display
//! field, indexes, renderers, labels, popups, SQL filters, Arcade
//! expressions, view definitions. When the service is recreated in another
//! organization those fields may come back renamed or with different case,
//! so every reference is replaced by a token that resolves to the deployed
//! name:
//!
//! ```text
//! {{<itemId>.layer<layerId>.fields.<lowercased name>.name}}
//! ```
//!
//! # Architecture
//!
//! - [`FieldPath`] accumulates the dictionary path of a layer's fields
//! - [`FieldScope`] holds the field names of one layer and the name, list,
//!   free-text and Arcade matchers built from them
//! - dispatch tables map layer properties (and renderer types) to the
//!   matcher for that structure; properties a layer does not have are
//!   skipped, and no matcher fails
//! - [`cache`] and [`mapping`] cover the deploy side: setting structures
//!   aside until the service exists, then mapping source field names to the
//!   deployed ones
//!
//! Every matcher leaves text already inside a `{{...}}` token alone, so
//! templatizing twice gives the same result as templatizing once.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use solution_templates::fields::templatize_layer;
//!
//! let mut layer = json!({
//!     "id": 0,
//!     "fields": [{ "name": "NAME" }, { "name": "POP" }],
//!     "displayField": "NAME",
//!     "definitionExpression": "POP > 1000"
//! });
//! templatize_layer(&mut layer, None, "svc", &[]);
//!
//! assert_eq!(layer["displayField"], "{{svc.layer0.fields.name.name}}");
//! assert_eq!(layer["definitionExpression"], "{{svc.layer0.fields.pop.name}} > 1000");
//! ```

mod admin;
mod arcade;
pub mod cache;
mod layer;
pub mod mapping;
mod path;
mod popup;
mod renderer;
mod scope;

use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::core::Dependency;

pub use cache::{
    FieldInfo, FieldInfos, cache_field_infos, detemplatize_field_infos, restore_cached_properties,
};
pub use mapping::{FieldMapping, MappingOptions, layer_settings, name_mapping};
pub use path::FieldPath;
pub use scope::FieldScope;

/// Everything a matcher needs besides the node it rewrites.
#[derive(Debug)]
pub struct MatchContext<'a> {
    /// Field names and token path of the layer being templatized.
    pub scope: &'a FieldScope,
    /// Declared item dependencies, for view source services.
    pub dependencies: &'a [Dependency],
    related_tables: HashMap<String, String>,
}

impl<'a> MatchContext<'a> {
    pub fn new(scope: &'a FieldScope, dependencies: &'a [Dependency]) -> Self {
        Self {
            scope,
            dependencies,
            related_tables: HashMap::new(),
        }
    }

    /// Record the relationship id to related table id pairs of a layer.
    #[must_use]
    pub fn with_relationships(mut self, relationships: Option<&Value>) -> Self {
        for relationship in relationships.and_then(Value::as_array).into_iter().flatten() {
            if let (Some(id), Some(table)) =
                (json_id(relationship.get("id")), json_id(relationship.get("relatedTableId")))
            {
                self.related_tables.insert(id, table);
            }
        }
        self
    }

    /// Fields path of the table on the other side of relationship `id`.
    pub fn related_path(&self, relationship_id: &str) -> Option<FieldPath> {
        self.related_tables.get(relationship_id).map(|table| self.scope.path().sibling(table))
    }
}

/// A matcher rewrites the field references in one structure.
pub type Matcher = fn(&mut Value, &MatchContext<'_>);

/// Matchers for the properties of a layer or table definition.
const LAYER_MATCHERS: &[(&str, Matcher)] = &[
    ("displayField", layer::display_field),
    ("indexes", layer::indexes),
    ("editFieldsInfo", layer::edit_fields_info),
    ("templates", layer::templates),
    ("types", layer::types),
    ("relationships", layer::relationships),
    ("definitionEditor", layer::definition_editor),
    ("definitionExpression", layer::expression),
    ("viewDefinitionQuery", layer::expression),
    ("definitionQuery", layer::expression),
    ("timeInfo", layer::time_info),
    ("drawingInfo", renderer::drawing_info),
    ("popupInfo", popup::popup_info),
    ("adminLayerInfo", admin::admin_layer_info),
];

/// Matchers for a layer entry of an item's data.
const DATA_MATCHERS: &[(&str, Matcher)] = &[
    ("popupInfo", popup::popup_info),
    ("layerDefinition", layer_definition),
];

fn apply_matchers(node: &mut Value, matchers: &[(&str, Matcher)], ctx: &MatchContext<'_>) {
    let Some(map) = node.as_object_mut() else {
        return;
    };
    for (property, matcher) in matchers {
        if let Some(child) = map.get_mut(*property) {
            trace!("Templatizing field references in {property} of {}", ctx.scope.path());
            matcher(child, ctx);
        }
    }
}

fn layer_definition(node: &mut Value, ctx: &MatchContext<'_>) {
    apply_matchers(node, LAYER_MATCHERS, ctx);
}

/// Templatize every field reference of one layer or table definition, and
/// of the matching layer entry (by id) in the item's `data`.
///
/// A layer without an `id` is left unchanged.
pub fn templatize_layer(
    layer: &mut Value,
    data: Option<&mut Value>,
    item_id: &str,
    dependencies: &[Dependency],
) {
    let Some(scope) = FieldScope::from_layer(item_id, layer) else {
        debug!("Skipping field templatization of a layer without id in {item_id}");
        return;
    };
    let ctx = MatchContext::new(&scope, dependencies).with_relationships(layer.get("relationships"));

    apply_matchers(layer, LAYER_MATCHERS, &ctx);

    if let Some(data) = data
        && let Some(entry) = data_entry(data, scope::layer_id(layer).as_deref())
    {
        apply_matchers(entry, DATA_MATCHERS, &ctx);
    }
    debug!("Templatized field references of {}", scope.path());
}

/// Templatize every layer and table of a service definition
/// (`{ "layers": [...], "tables": [...] }`).
pub fn templatize_service(
    service: &mut Value,
    mut data: Option<&mut Value>,
    item_id: &str,
    dependencies: &[Dependency],
) {
    for collection in ["layers", "tables"] {
        let Some(layers) = service.get_mut(collection).and_then(Value::as_array_mut) else {
            continue;
        };
        for layer in layers {
            templatize_layer(layer, data.as_deref_mut(), item_id, dependencies);
        }
    }
}

/// Returns true if `value` looks like a service definition rather than a
/// single layer.
pub fn is_service_definition(value: &Value) -> bool {
    value.get("layers").is_some_and(Value::is_array) || value.get("tables").is_some_and(Value::is_array)
}

fn data_entry<'a>(data: &'a mut Value, layer_id: Option<&str>) -> Option<&'a mut Value> {
    let layer_id = layer_id?;
    let (collection, position) = ["layers", "tables"].into_iter().find_map(|collection| {
        let position = data
            .get(collection)?
            .as_array()?
            .iter()
            .position(|entry| scope::layer_id(entry).as_deref() == Some(layer_id))?;
        Some((collection, position))
    })?;
    data.get_mut(collection)?.get_mut(position)
}

fn json_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Replace a string node with `f(node)`; other nodes are left alone.
pub(crate) fn update_str(node: &mut Value, f: impl FnOnce(&str) -> String) {
    if let Value::String(text) = node {
        let updated = f(text);
        *text = updated;
    }
}

/// Apply `f` to the string under `key` of an object node.
pub(crate) fn update_key(node: &mut Value, key: &str, f: impl FnOnce(&str) -> String) {
    if let Some(child) = node.get_mut(key) {
        update_str(child, f);
    }
}

/// Apply `f` to every string element of the array under `key`.
pub(crate) fn update_each(node: &mut Value, key: &str, f: impl Fn(&str) -> String) {
    if let Some(items) = node.get_mut(key).and_then(Value::as_array_mut) {
        for item in items {
            update_str(item, &f);
        }
    }
}

/// Iterate the elements of the array under `key`, if any.
pub(crate) fn each_mut<'a>(node: &'a mut Value, key: &str) -> impl Iterator<Item = &'a mut Value> {
    node.get_mut(key).and_then(Value::as_array_mut).into_iter().flatten()
}
