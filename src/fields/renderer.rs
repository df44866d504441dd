//! Field references in `drawingInfo`: renderers and label classes.

use serde_json::Value;
use tracing::trace;

use super::scope::FieldScope;
use super::{MatchContext, each_mut, update_each, update_key};

type RendererMatcher = fn(&mut Value, &FieldScope);

/// Renderer matchers keyed by renderer `type`.
const RENDERERS: &[(&str, RendererMatcher)] = &[
    ("classBreaks", common_renderer),
    ("uniqueValue", common_renderer),
    ("predominance", common_renderer),
    ("simple", common_renderer),
    ("heatmap", common_renderer),
    ("temporal", temporal_renderer),
];

const RENDERER_FIELDS: [&str; 5] = ["field", "normalizationField", "field1", "field2", "field3"];
const TEMPORAL_RENDERERS: [&str; 3] = ["latestObservationRenderer", "observationRenderer", "trackRenderer"];

pub(super) fn drawing_info(node: &mut Value, ctx: &MatchContext<'_>) {
    if let Some(renderer_node) = node.get_mut("renderer") {
        renderer(renderer_node, ctx.scope);
    }
    for label_class in each_mut(node, "labelingInfo") {
        labeling_info(label_class, ctx.scope);
    }
}

/// Dispatch on the renderer `type`; unknown types are left unchanged.
pub(super) fn renderer(node: &mut Value, scope: &FieldScope) {
    let matcher = node
        .get("type")
        .and_then(Value::as_str)
        .and_then(|kind| RENDERERS.iter().find(|(name, _)| *name == kind))
        .map(|(_, matcher)| *matcher);
    match matcher {
        Some(matcher) => matcher(node, scope),
        None => trace!("No field references handled for renderer {:?}", node.get("type")),
    }
}

fn common_renderer(node: &mut Value, scope: &FieldScope) {
    for key in RENDERER_FIELDS {
        update_key(node, key, |name| scope.name(name));
    }
    // e.g. "[HEADING] * -1"
    update_key(node, "rotationExpression", |text| scope.text(text));
    update_key(node, "valueExpression", |text| scope.arcade(text));
    visual_variables(node, scope);
    if let Some(authoring_info) = node.get_mut("authoringInfo") {
        authoring(authoring_info, scope);
    }
}

fn temporal_renderer(node: &mut Value, scope: &FieldScope) {
    for key in TEMPORAL_RENDERERS {
        if let Some(inner) = node.get_mut(key) {
            renderer(inner, scope);
        }
    }
}

fn visual_variables(node: &mut Value, scope: &FieldScope) {
    for variable in each_mut(node, "visualVariables") {
        update_key(variable, "field", |name| scope.name(name));
        update_key(variable, "normalizationField", |name| scope.name(name));
        update_key(variable, "valueExpression", |text| scope.arcade(text));
    }
}

fn authoring(node: &mut Value, scope: &FieldScope) {
    update_each(node, "fields", |name| scope.name(name));
    for key in ["field1", "field2"] {
        if let Some(field) = node.get_mut(key) {
            update_key(field, "field", |name| scope.name(name));
        }
    }
    visual_variables(node, scope);
}

fn labeling_info(node: &mut Value, scope: &FieldScope) {
    for field_info in each_mut(node, "fieldInfos") {
        update_key(field_info, "fieldName", |name| scope.name(name));
    }
    // "[NAME]" and "\"NAME\"" forms
    update_key(node, "labelExpression", |text| scope.text(text));
    update_key(node, "where", |text| scope.text(text));
    if let Some(info) = node.get_mut("labelExpressionInfo") {
        update_key(info, "value", |text| scope.text(text));
        update_key(info, "expression", |text| scope.arcade(text));
    }
}

#[cfg(test)]
mod tests {
    use super::super::FieldPath;
    use super::*;
    use serde_json::json;

    fn scope() -> FieldScope {
        FieldScope::new(FieldPath::from_base("P"), ["POP", "AREA", "HEADING", "NAME", "TIME"])
    }

    #[test]
    fn test_class_breaks_renderer() {
        let mut node = json!({
            "type": "classBreaks",
            "field": "POP",
            "normalizationField": "AREA",
            "rotationExpression": "[HEADING]",
            "valueExpression": "$feature.POP / $feature['AREA']",
            "visualVariables": [{ "type": "sizeInfo", "field": "POP", "valueExpression": null }],
            "authoringInfo": {
                "fields": ["POP", "AREA"],
                "field1": { "field": "POP" },
                "visualVariables": [{ "field": "AREA" }]
            }
        });
        renderer(&mut node, &scope());
        assert_eq!(
            node,
            json!({
                "type": "classBreaks",
                "field": "{{P.pop.name}}",
                "normalizationField": "{{P.area.name}}",
                "rotationExpression": "[{{P.heading.name}}]",
                "valueExpression": "$feature.{{P.pop.name}} / $feature['{{P.area.name}}']",
                "visualVariables": [{ "type": "sizeInfo", "field": "{{P.pop.name}}", "valueExpression": null }],
                "authoringInfo": {
                    "fields": ["{{P.pop.name}}", "{{P.area.name}}"],
                    "field1": { "field": "{{P.pop.name}}" },
                    "visualVariables": [{ "field": "{{P.area.name}}" }]
                }
            })
        );
    }

    #[test]
    fn test_temporal_renderer_recurses() {
        let mut node = json!({
            "type": "temporal",
            "observationRenderer": { "type": "uniqueValue", "field1": "NAME" },
            "trackRenderer": { "type": "simple", "visualVariables": [{ "field": "TIME" }] }
        });
        renderer(&mut node, &scope());
        assert_eq!(node["observationRenderer"]["field1"], "{{P.name.name}}");
        assert_eq!(node["trackRenderer"]["visualVariables"][0]["field"], "{{P.time.name}}");
    }

    #[test]
    fn test_unknown_renderer_untouched() {
        let mut node = json!({ "type": "dotDensity", "field": "POP" });
        renderer(&mut node, &scope());
        assert_eq!(node["field"], "POP");
    }

    #[test]
    fn test_labeling_info() {
        let scope = scope();
        let ctx = MatchContext::new(&scope, &[]);
        let mut node = json!({
            "labelingInfo": [{
                "labelExpression": "[NAME]",
                "labelExpressionInfo": { "value": "{NAME} ({POP})", "expression": "$feature[\"NAME\"]" },
                "fieldInfos": [{ "fieldName": "POP" }]
            }]
        });
        drawing_info(&mut node, &ctx);
        let label = &node["labelingInfo"][0];
        assert_eq!(label["labelExpression"], "[{{P.name.name}}]");
        assert_eq!(label["labelExpressionInfo"]["value"], "{{{P.name.name}}} ({{{P.pop.name}}})");
        assert_eq!(label["labelExpressionInfo"]["expression"], "$feature[\"{{P.name.name}}\"]");
        assert_eq!(label["fieldInfos"][0]["fieldName"], "{{P.pop.name}}");
    }
}
