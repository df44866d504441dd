//! Field references in `adminLayerInfo`, the definition of a view layer
//! relative to its source service.

use serde_json::Value;
use tracing::debug;

use super::scope::FieldScope;
use super::{MatchContext, each_mut, update_each, update_key};
use crate::constants::NAME_SUFFIX;
use crate::core::dependency_id_for_name;
use crate::placeholder::{is_wrapped, placeholder};

/// Properties that are specific to one deployment of the view.
const VOLATILE_PROPERTIES: [&str; 3] = ["xssTrustedFields", "tableName", "sourceId"];

pub(super) fn admin_layer_info(node: &mut Value, ctx: &MatchContext<'_>) {
    let Some(info) = node.as_object_mut() else {
        return;
    };
    for property in VOLATILE_PROPERTIES {
        info.remove(property);
    }

    let Some(table) = node.pointer_mut("/viewLayerDefinition/table") else {
        return;
    };
    view_table(table, ctx);
    for related in each_mut(table, "relatedTables") {
        view_table(related, ctx);
        if let Some(filter) = related.get_mut("topFilter") {
            top_filter(filter, ctx.scope);
        }
        update_each(related, "parentKeyFields", |name| ctx.scope.name(name));
        update_each(related, "keyFields", |name| ctx.scope.name(name));
    }
}

fn view_table(table: &mut Value, ctx: &MatchContext<'_>) {
    if let Some(map) = table.as_object_mut() {
        map.remove("sourceId");
    }
    update_key(table, "sourceServiceName", |name| source_service_name(name, ctx));
    for field in each_mut(table, "sourceLayerFields") {
        update_key(field, "source", |name| ctx.scope.name(name));
    }
}

/// `{{<dependency id>.name}}` for the dependency providing the service.
fn source_service_name(name: &str, ctx: &MatchContext<'_>) -> String {
    if is_wrapped(name) {
        return name.to_string();
    }
    match dependency_id_for_name(ctx.dependencies, name) {
        Some(id) => placeholder(&format!("{id}.{NAME_SUFFIX}")),
        None => {
            debug!("No declared dependency provides source service {name}");
            name.to_string()
        }
    }
}

fn top_filter(filter: &mut Value, scope: &FieldScope) {
    // "FIELD [ASC|DESC], ..."
    update_key(filter, "orderByFields", |value| {
        value
            .split(',')
            .map(|part| {
                let part = part.trim();
                match part.split_once(char::is_whitespace) {
                    Some((field, order)) => format!("{} {}", scope.name(field), order.trim()),
                    None => scope.name(part),
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    });
    update_key(filter, "groupByFields", |value| scope.name_list(value));
}
