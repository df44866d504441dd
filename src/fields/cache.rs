//! The FieldInfo cache.
//!
//! A feature service is created with bare layer definitions first. The
//! structures that reference fields are set aside in a [`FieldInfo`] per
//! layer, the service is created, and once the deployed field names are known
//! the cached structures are resolved and put back.
//!
//! ```text
//! cache_field_infos ─► create service ─► FieldInfo::record_deployed
//!        ─► layer_settings ─► detemplatize_field_infos ─► restore_cached_properties
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::scope::layer_id;
use crate::templating::{TemplateDictionary, Transforms, resolve_in_place};

/// Layer properties removed from the layer and kept in the cache.
pub const CACHED_PROPERTIES: [&str; 9] = [
    "displayField",
    "editFieldsInfo",
    "templates",
    "types",
    "relationships",
    "drawingInfo",
    "timeInfo",
    "viewDefinitionQuery",
    "adminLayerInfo",
];

const RELATED_TABLES_POINTER: &str = "/viewLayerDefinition/table";

/// Cached field information of one layer or table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
    /// Layer id.
    pub id: String,
    /// Layer type, e.g. "Feature Layer" or "Table".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub layer_type: Option<String>,
    /// Fields of the source layer.
    #[serde(default)]
    pub source_fields: Vec<Value>,
    /// Fields of the deployed layer, once it exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_fields: Option<Vec<Value>>,
    /// `editFieldsInfo` of the deployed layer, once it exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_edit_fields_info: Option<Value>,
    /// True for view layers.
    #[serde(default)]
    pub is_view: bool,
    /// Related tables of a view, split out of the cached `adminLayerInfo`
    /// until they are resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_tables: Option<Value>,
    /// The cached layer properties, keyed by property name.
    #[serde(flatten)]
    pub cached: Map<String, Value>,
}

impl FieldInfo {
    /// Record the fields and edit tracking fields of the deployed layer.
    pub fn record_deployed(&mut self, deployed_layer: &Value) {
        self.new_fields = deployed_layer.get("fields").and_then(Value::as_array).cloned();
        self.new_edit_fields_info = deployed_layer.get("editFieldsInfo").cloned();
    }

    /// The cached value of a layer property.
    pub fn cached(&self, property: &str) -> Option<&Value> {
        self.cached.get(property)
    }
}

/// Cached field information keyed by layer id.
pub type FieldInfos = IndexMap<String, FieldInfo>;

/// Remove the field-referencing structures from `layer` and cache them.
///
/// Layers without an `id` or without a `fields` array are left unchanged.
pub fn cache_field_infos(layer: &mut Value, field_infos: &mut FieldInfos) {
    let Some(id) = layer_id(layer) else {
        return;
    };
    let Some(fields) = layer.get("fields").and_then(Value::as_array) else {
        return;
    };

    let mut info = FieldInfo {
        id: id.clone(),
        layer_type: layer.get("type").and_then(Value::as_str).map(str::to_string),
        source_fields: fields.clone(),
        is_view: layer.get("isView").and_then(Value::as_bool).unwrap_or(false),
        ..FieldInfo::default()
    };

    if let Some(map) = layer.as_object_mut() {
        for property in CACHED_PROPERTIES {
            if let Some(value) = map.remove(property) {
                info.cached.insert(property.to_string(), value);
            }
        }
    }

    info.related_tables = info
        .cached
        .get_mut("adminLayerInfo")
        .and_then(|admin| admin.pointer_mut(RELATED_TABLES_POINTER))
        .and_then(Value::as_object_mut)
        .and_then(|table| table.remove("relatedTables"));

    debug!("Cached {} properties of layer {id}", info.cached.len());
    field_infos.insert(id, info);
}

/// Put the cached properties of `info` back on `layer`.
pub fn restore_cached_properties(layer: &mut Value, info: &FieldInfo) {
    if let Some(map) = layer.as_object_mut() {
        for (property, value) in &info.cached {
            map.insert(property.clone(), value.clone());
        }
    }
}

/// Field infos and popups with every token resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetemplatizedInfos {
    pub field_infos: FieldInfos,
    pub popup_infos: Value,
}

/// Resolve the cached structures against `dictionary`.
///
/// Related tables split out of a view's `adminLayerInfo` are resolved and
/// moved back into its `viewLayerDefinition.table`. They stay in
/// [`FieldInfo::related_tables`] when the cached definition has no table.
pub fn detemplatize_field_infos(
    field_infos: &FieldInfos,
    popup_infos: &Value,
    dictionary: &TemplateDictionary,
    transforms: &Transforms,
) -> DetemplatizedInfos {
    let mut field_infos = field_infos.clone();

    for (id, info) in &mut field_infos {
        for value in info.cached.values_mut() {
            resolve_in_place(value, dictionary, transforms);
        }

        let Some(mut related) = info.related_tables.take() else {
            continue;
        };
        resolve_in_place(&mut related, dictionary, transforms);
        match info
            .cached
            .get_mut("adminLayerInfo")
            .and_then(|admin| admin.pointer_mut(RELATED_TABLES_POINTER))
            .and_then(Value::as_object_mut)
        {
            Some(table) => {
                table.insert("relatedTables".to_string(), related);
            }
            None => {
                debug!("No view definition for layer {id}; keeping its related tables cached");
                info.related_tables = Some(related);
            }
        }
    }

    let mut popup_infos = popup_infos.clone();
    resolve_in_place(&mut popup_infos, dictionary, transforms);

    DetemplatizedInfos {
        field_infos,
        popup_infos,
    }
}
