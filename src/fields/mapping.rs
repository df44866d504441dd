//! Mapping of source field names to the names of the deployed layer.
//!
//! The destination may rename fields (most often by changing their case),
//! so each source field is paired with a deployed field: the same name
//! first, then the same name ignoring case, then the same alias. The
//! resulting map is keyed by the lowercased source name, which is exactly
//! the segment field tokens use:
//!
//! ```text
//! {{svc.layer0.fields.voted_dem_2012.name}}  ─►  settings.layer0.fields.voted_dem_2012.name
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;

use super::cache::{FieldInfo, FieldInfos};
use crate::constants::{FIELDS_SEGMENT, LAYER_SEGMENT};
use crate::placeholder::unwrap_placeholder;

/// Deployed name, alias and type of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub name: String,
    #[serde(default)]
    pub alias: String,
    #[serde(rename = "type", default)]
    pub field_type: String,
}

impl FieldMapping {
    fn from_field(field: &Value) -> Option<Self> {
        let name = field.get("name")?.as_str()?.to_string();
        let text = |key: &str| field.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
        Some(Self {
            alias: text("alias"),
            field_type: text("type"),
            name,
        })
    }
}

/// Options controlling the name mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingOptions {
    /// Whether the destination allows deleting fields from a service.
    pub schema_changes_allowed: bool,
}

/// The name mapping of one layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMapping {
    /// Lowercased source name to deployed field.
    pub fields: IndexMap<String, FieldMapping>,
    /// Stale deployed fields to delete.
    pub delete_fields: Vec<String>,
}

/// Build the name mapping of one layer.
///
/// A source field with no deployed counterpart maps to itself. Edit tracking
/// fields are reconciled against the deployed layer's `editFieldsInfo`: when
/// the destination created its own field for a role, references follow it,
/// and (with schema changes allowed, for non-view layers) the stale copy of
/// the source field is queued for deletion.
pub fn name_mapping(info: &FieldInfo, options: MappingOptions) -> NameMapping {
    let deployed: Vec<FieldMapping> = info
        .new_fields
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(FieldMapping::from_field)
        .collect();

    let mut mapping = NameMapping::default();
    for source in info.source_fields.iter().filter_map(FieldMapping::from_field) {
        let key = source.name.to_lowercase();
        let matched = deployed
            .iter()
            .find(|f| f.name == source.name)
            .or_else(|| deployed.iter().find(|f| f.name.to_lowercase() == key))
            .or_else(|| {
                deployed.iter().find(|f| !source.alias.is_empty() && f.alias == source.alias)
            });
        match matched {
            Some(field) => {
                mapping.fields.insert(key, field.clone());
            }
            None => {
                debug!("No deployed field for {} in layer {}", source.name, info.id);
                mapping.fields.insert(key, source);
            }
        }
    }

    reconcile_edit_fields(info, &deployed, options, &mut mapping);
    mapping
}

fn reconcile_edit_fields(
    info: &FieldInfo,
    deployed: &[FieldMapping],
    options: MappingOptions,
    mapping: &mut NameMapping,
) {
    let source_info = info.cached("editFieldsInfo").and_then(Value::as_object);
    let deployed_info = info.new_edit_fields_info.as_ref().and_then(Value::as_object);
    let (Some(source_info), Some(deployed_info)) = (source_info, deployed_info) else {
        return;
    };

    for (role, source_name) in source_info {
        let (Some(source_name), Some(new_name)) =
            (source_name.as_str(), deployed_info.get(role).and_then(Value::as_str))
        else {
            continue;
        };
        let key = source_field_name(source_name).to_lowercase();
        if key == new_name.to_lowercase() {
            continue;
        }

        let field_type = mapping.fields.get(&key).map(|f| f.field_type.clone()).unwrap_or_default();
        let target = deployed.iter().find(|f| f.name == new_name).cloned().unwrap_or(FieldMapping {
            name: new_name.to_string(),
            alias: new_name.to_string(),
            field_type,
        });
        debug!("Edit field {role} of layer {} is now {}", info.id, target.name);
        mapping.fields.insert(key.clone(), target);

        if options.schema_changes_allowed
            && !info.is_view
            && let Some(stale) = deployed.iter().find(|f| f.name.to_lowercase() == key)
            && !mapping.delete_fields.contains(&stale.name)
        {
            mapping.delete_fields.push(stale.name.clone());
        }
    }
}

/// The field name inside a field token, or `value` itself.
fn source_field_name(value: &str) -> &str {
    unwrap_placeholder(value)
        .and_then(|path| path.rsplit('.').nth(1))
        .unwrap_or(value)
}

/// Per-layer settings for the dictionary entry of a deployed service.
///
/// ```json
/// { "layer0": { "fields": { ... }, "url": "<url>/0", "layerId": "0", "itemId": "...", "deleteFields": [] } }
/// ```
pub fn layer_settings(
    field_infos: &FieldInfos,
    url: &str,
    item_id: &str,
    options: MappingOptions,
) -> Map<String, Value> {
    let url = url.trim_end_matches('/');
    let mut settings = Map::new();
    for (id, info) in field_infos {
        let mapping = name_mapping(info, options);
        let fields: Map<String, Value> = mapping
            .fields
            .into_iter()
            .filter_map(|(key, field)| serde_json::to_value(field).ok().map(|v| (key, v)))
            .collect();

        let mut layer = json!({
            FIELDS_SEGMENT: fields,
            "url": format!("{url}/{id}"),
            "layerId": id,
            "itemId": item_id,
        });
        if !mapping.delete_fields.is_empty() {
            layer["deleteFields"] = json!(mapping.delete_fields);
        }
        settings.insert(format!("{LAYER_SEGMENT}{id}"), layer);
    }
    settings
}
