//! Matchers for the structural properties of a layer definition.

use serde_json::Value;
use tracing::debug;

use super::scope::FieldScope;
use super::{MatchContext, each_mut, update_each, update_key, update_str};
use crate::placeholder::is_wrapped;

const EDIT_FIELDS: [&str; 4] = ["creationDateField", "creatorField", "editDateField", "editorField"];
const TIME_FIELDS: [&str; 3] = ["startTimeField", "endTimeField", "trackIdField"];

pub(super) fn display_field(node: &mut Value, ctx: &MatchContext<'_>) {
    update_str(node, |name| ctx.scope.name(name));
}

/// Drop indexes on fields the layer does not have, keep the first of any
/// indexes over the same field list, and templatize the rest.
pub(super) fn indexes(node: &mut Value, ctx: &MatchContext<'_>) {
    let Some(indexes) = node.as_array_mut() else {
        return;
    };

    let mut seen: Vec<String> = Vec::new();
    indexes.retain(|index| {
        let Some(fields) = index.get("fields").and_then(Value::as_str) else {
            return true;
        };
        let names: Vec<&str> = fields.split(',').map(str::trim).filter(|n| !n.is_empty()).collect();
        if let Some(missing) = names.iter().find(|n| !is_wrapped(n) && !ctx.scope.contains(n)) {
            debug!("Dropping index on missing field {missing}");
            return false;
        }
        let key = names.iter().map(|n| n.to_lowercase()).collect::<Vec<_>>().join(",");
        if seen.contains(&key) {
            debug!("Dropping duplicate index on {fields}");
            return false;
        }
        seen.push(key);
        true
    });

    for index in indexes {
        update_key(index, "fields", |fields| ctx.scope.name_list(fields));
    }
}

pub(super) fn edit_fields_info(node: &mut Value, ctx: &MatchContext<'_>) {
    for key in EDIT_FIELDS {
        update_key(node, key, |name| ctx.scope.name(name));
    }
}

/// Feature templates: `prototype.attributes` is keyed by field name.
pub(super) fn templates(node: &mut Value, ctx: &MatchContext<'_>) {
    for template in node.as_array_mut().into_iter().flatten() {
        if let Some(attributes) = template.pointer_mut("/prototype/attributes") {
            rename_keys(attributes, ctx.scope);
        }
    }
}

/// Subtypes carry their own feature templates and per-field domains.
pub(super) fn types(node: &mut Value, ctx: &MatchContext<'_>) {
    for subtype in node.as_array_mut().into_iter().flatten() {
        if let Some(templates_node) = subtype.get_mut("templates") {
            templates(templates_node, ctx);
        }
        if let Some(domains) = subtype.get_mut("domains") {
            rename_keys(domains, ctx.scope);
        }
    }
}

pub(super) fn relationships(node: &mut Value, ctx: &MatchContext<'_>) {
    for relationship in node.as_array_mut().into_iter().flatten() {
        update_key(relationship, "keyField", |name| ctx.scope.name(name));
    }
}

pub(super) fn definition_editor(node: &mut Value, ctx: &MatchContext<'_>) {
    for input in each_mut(node, "inputs") {
        for parameter in each_mut(input, "parameters") {
            update_key(parameter, "fieldName", |name| ctx.scope.name(name));
        }
    }
    update_key(node, "parameterizedExpression", |text| ctx.scope.text(text));
}

/// SQL filters: `definitionExpression`, `viewDefinitionQuery`, `definitionQuery`.
pub(super) fn expression(node: &mut Value, ctx: &MatchContext<'_>) {
    update_str(node, |text| ctx.scope.text(text));
}

pub(super) fn time_info(node: &mut Value, ctx: &MatchContext<'_>) {
    for key in TIME_FIELDS {
        update_key(node, key, |name| ctx.scope.name(name));
    }
    update_each(node, "trackIdFields", |name| ctx.scope.name(name));
}

fn rename_keys(node: &mut Value, scope: &FieldScope) {
    if let Value::Object(map) = node {
        let entries = std::mem::take(map);
        for (key, value) in entries {
            map.insert(scope.name(&key), value);
        }
    }
}
