//! Field references in popup definitions.

use serde_json::Value;

use super::{MatchContext, each_mut, update_each, update_key};
use crate::placeholder::is_wrapped;

const RELATIONSHIP_PREFIX: &str = "relationships/";

pub(super) fn popup_info(node: &mut Value, ctx: &MatchContext<'_>) {
    update_key(node, "title", |text| ctx.scope.text(text));
    update_key(node, "description", |text| ctx.scope.text(text));
    field_infos(node, ctx);
    expression_infos(node, ctx);
    media_infos(node, ctx);

    for element in each_mut(node, "popupElements") {
        update_key(element, "text", |text| ctx.scope.text(text));
        field_infos(element, ctx);
        media_infos(element, ctx);
        if let Some(info) = element.get_mut("expressionInfo") {
            update_key(info, "expression", |text| ctx.scope.arcade(text));
        }
    }
}

fn field_infos(node: &mut Value, ctx: &MatchContext<'_>) {
    for info in each_mut(node, "fieldInfos") {
        update_key(info, "fieldName", |name| field_name(name, ctx));
    }
}

fn expression_infos(node: &mut Value, ctx: &MatchContext<'_>) {
    for info in each_mut(node, "expressionInfos") {
        update_key(info, "expression", |text| ctx.scope.arcade(text));
    }
}

fn media_infos(node: &mut Value, ctx: &MatchContext<'_>) {
    for media in each_mut(node, "mediaInfos") {
        update_key(media, "title", |text| ctx.scope.text(text));
        update_key(media, "caption", |text| ctx.scope.text(text));
        if let Some(value) = media.get_mut("value") {
            update_each(value, "fields", |name| ctx.scope.name(name));
            update_key(value, "normalizeField", |name| ctx.scope.name(name));
            update_key(value, "tooltipField", |name| ctx.scope.name(name));
        }
    }
}

/// A popup field name, possibly of the form `relationships/<id>/<field>`
/// where `<field>` belongs to the related table.
fn field_name(name: &str, ctx: &MatchContext<'_>) -> String {
    let Some(rest) = name.strip_prefix(RELATIONSHIP_PREFIX) else {
        return ctx.scope.name(name);
    };
    match rest.split_once('/') {
        Some((relationship, field)) if !field.is_empty() && !is_wrapped(field) => {
            match ctx.related_path(relationship) {
                Some(path) => format!("{RELATIONSHIP_PREFIX}{relationship}/{}", path.token(field)),
                None => name.to_string(),
            }
        }
        _ => name.to_string(),
    }
}
