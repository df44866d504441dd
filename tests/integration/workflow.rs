//! The library pipeline from a captured service to its deployed copy.

use serde_json::{Value, json};
use solution_templates::core::ItemTemplate;
use solution_templates::deployment::DeploymentSession;
use solution_templates::fields::{
    FieldInfos, MappingOptions, cache_field_infos, detemplatize_field_infos, layer_settings,
    restore_cached_properties, templatize_service,
};
use solution_templates::placeholder::{has_unresolved_placeholders, templatize_ids};
use solution_templates::templating::{ItemFacts, TemplateDictionary, Transforms, resolve};
use solution_templates::test_utils::{JsonFixture, MAP_ID, SERVICE_ID, init_test_logging};

fn captured_service() -> ItemTemplate {
    let mut service = JsonFixture::feature_service().content;
    let mut data = JsonFixture::feature_service_data().content;
    templatize_service(&mut service, Some(&mut data), SERVICE_ID, &[]);

    let mut template = ItemTemplate::new(SERVICE_ID, "Feature Service");
    template.item = json!({ "title": "Results", "url": format!("https://services.example.com/{SERVICE_ID}/FeatureServer") });
    template.item = templatize_ids(&template.item);
    template.properties = json!({ "service": {}, "layers": service["layers"].clone(), "tables": [] });
    template.data = data;
    template
}

fn captured_map() -> ItemTemplate {
    let mut map = ItemTemplate::new(MAP_ID, "Web Map").with_dependencies([SERVICE_ID]);
    map.data = templatize_ids(&JsonFixture::web_map_data().content);
    map
}

fn deployed_layer() -> Value {
    json!({
        "id": 0,
        "fields": [
            { "name": "objectid", "alias": "OBJECTID", "type": "esriFieldTypeOID" },
            { "name": "county", "alias": "County", "type": "esriFieldTypeString" },
            { "name": "voted_dem_2012", "alias": "Voted Dem 2012", "type": "esriFieldTypeDouble" }
        ]
    })
}

#[test]
fn test_field_names_round_trip_through_dictionary() {
    init_test_logging(None);
    let template = captured_service();
    let layer = &template.properties["layers"][0];
    assert_eq!(layer["displayField"], format!("{{{{{SERVICE_ID}.layer0.fields.county.name}}}}"));

    let dictionary = JsonFixture::dictionary().content;
    let dictionary = TemplateDictionary::try_from(dictionary).unwrap();
    let resolved = resolve(layer, &dictionary, &Transforms::with_builtins());

    assert_eq!(resolved["displayField"], "county");
    assert_eq!(resolved["definitionExpression"], "county <> ''");
    assert_eq!(resolved["drawingInfo"]["renderer"]["valueExpression"], "$feature.voted_dem_2012 * 100");
    assert!(!has_unresolved_placeholders(&resolved));
}

#[test]
fn test_deploy_service_then_map() {
    init_test_logging(None);
    let templates = vec![captured_map(), captured_service()];
    let mut session = DeploymentSession::new(templates, TemplateDictionary::new());
    assert_eq!(session.ordering().build_order, vec![SERVICE_ID, MAP_ID]);

    // feature service: create bare, then restore the field-dependent properties
    let pending = session.next_item().unwrap();
    assert_eq!(pending.source_id(), SERVICE_ID);
    let mut layers = pending.template().properties["layers"].clone();
    let data = pending.template().data.clone();

    let mut infos = FieldInfos::new();
    for layer in layers.as_array_mut().unwrap() {
        cache_field_infos(layer, &mut infos);
        assert!(layer.get("displayField").is_none());
    }
    for info in infos.values_mut() {
        info.record_deployed(&deployed_layer());
    }

    let new_url = "https://services.dest.com/Results/FeatureServer";
    let new_id = "a1b2c3d4e5f60718293a4b5c6d7e8f90";
    let settings = layer_settings(&infos, new_url, new_id, MappingOptions::default());
    pending.complete(&ItemFacts::new(new_id).with_url(new_url).with_name("Results_dest"));

    let mut dictionary = TemplateDictionary::new();
    dictionary.apply_layer_settings(SERVICE_ID, &settings);
    let popups = data["layers"][0]["popupInfo"].clone();
    let restored = detemplatize_field_infos(
        &infos,
        &json!({ "0": popups }),
        &dictionary,
        &Transforms::with_builtins(),
    );
    let layer = &mut layers[0];
    restore_cached_properties(layer, &restored.field_infos["0"]);
    assert_eq!(layer["displayField"], "county");
    assert_eq!(layer["drawingInfo"]["renderer"]["field"], "voted_dem_2012");
    assert_eq!(restored.popup_infos["0"]["title"], "{county}");

    // web map: its service reference now points at the new item
    let pending = session.next_item().unwrap();
    assert_eq!(pending.source_id(), MAP_ID);
    let operational = &pending.template().data["operationalLayers"][0];
    assert_eq!(operational["itemId"], new_id);
    assert_eq!(operational["url"], format!("https://services.example.com/{new_id}/FeatureServer/0"));
    pending.complete(&ItemFacts::new("0f0e0d0c0b0a09080706050403020100"));

    assert!(session.is_complete());
    assert_eq!(session.patch_pass(), Some(Vec::new()));
}

#[test]
fn test_cyclic_solution_is_patched() {
    init_test_logging(None);
    let templates: Vec<ItemTemplate> =
        serde_json::from_value(JsonFixture::cyclic_solution().content["templates"].clone()).unwrap();
    let mut session = DeploymentSession::new(templates, TemplateDictionary::new());

    while let Some(pending) = session.next_item() {
        let new_id = format!("new-{}", pending.source_id());
        pending.complete(&ItemFacts::new(new_id));
    }

    let patches = session.patch_pass().unwrap();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].item_id, "dsh");
    assert_eq!(patches[0].template.data["app"], "new-wma");
}
