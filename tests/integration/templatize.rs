use serde_json::json;
use solution_templates::test_utils::{JsonFixture, SERVICE_ID};

use crate::common::TestProject;

#[test]
fn test_templatize_ids_wraps_every_occurrence() {
    let project = TestProject::new().unwrap();
    let file = project.write_fixture(&JsonFixture::web_map_data()).unwrap();

    let output = project.run(&["templatize-ids", &file]).unwrap();
    output.assert_success();
    let data = output.json().unwrap();

    let token = format!("{{{{{SERVICE_ID}.itemId}}}}");
    let layer = &data["operationalLayers"][0];
    assert_eq!(layer["itemId"], json!(token));
    assert_eq!(
        layer["url"],
        json!(format!("https://services.example.com/{token}/FeatureServer/0"))
    );
    assert_eq!(layer["title"], "Election results");
}

#[test]
fn test_templatize_ids_is_idempotent() {
    let project = TestProject::new().unwrap();
    let file = project.write_fixture(&JsonFixture::web_map_data()).unwrap();

    let once = project.run(&["templatize-ids", &file]).unwrap().json().unwrap();
    let again_file = project.write_json("once.json", &once).unwrap();
    let twice = project.run(&["templatize-ids", &again_file]).unwrap().json().unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_templatize_ids_with_extra_terms() {
    let project = TestProject::new().unwrap();
    let file = project
        .write_json("view.json", &json!({ "source": "Source_Service", "note": "from Source_Service" }))
        .unwrap();

    let output = project
        .run(&["templatize-ids", &file, "--term", "Source_Service", "--suffix", ".name"])
        .unwrap();
    output.assert_success();
    let view = output.json().unwrap();
    assert_eq!(view["source"], "{{Source_Service.name}}");
    assert_eq!(view["note"], "from {{Source_Service.name}}");
}

#[test]
fn test_templatize_fields_of_service_and_data() {
    let project = TestProject::new().unwrap();
    let service = project.write_fixture(&JsonFixture::feature_service()).unwrap();
    let data = project.write_fixture(&JsonFixture::feature_service_data()).unwrap();

    let output = project
        .run(&["templatize-fields", &service, "--item-id", "svc", "--data", &data])
        .unwrap();
    output.assert_success();
    let result = output.json().unwrap();

    let layer = &result["definition"]["layers"][0];
    assert_eq!(layer["displayField"], "{{svc.layer0.fields.county.name}}");
    assert_eq!(layer["definitionExpression"], "{{svc.layer0.fields.county.name}} <> ''");
    assert!(
        layer["templates"][0]["prototype"]["attributes"]
            .get("{{svc.layer0.fields.voted_dem_2012.name}}")
            .is_some()
    );

    let renderer = &layer["drawingInfo"]["renderer"];
    assert_eq!(renderer["field"], "{{svc.layer0.fields.voted_dem_2012.name}}");
    assert_eq!(renderer["valueExpression"], "$feature.{{svc.layer0.fields.voted_dem_2012.name}} * 100");

    let label = &layer["drawingInfo"]["labelingInfo"][0];
    assert_eq!(label["labelExpression"], "[{{svc.layer0.fields.county.name}}]");
    assert_eq!(label["where"], "{{svc.layer0.fields.voted_dem_2012.name}} > 0.5");

    // the field list itself is kept so the service can be created
    assert_eq!(layer["fields"][1]["name"], "COUNTY");

    let popup = &result["data"]["layers"][0]["popupInfo"];
    assert_eq!(popup["title"], "{{{svc.layer0.fields.county.name}}}");
    assert_eq!(popup["fieldInfos"][0]["fieldName"], "{{svc.layer0.fields.voted_dem_2012.name}}");
}

#[test]
fn test_templatize_fields_of_single_layer_with_dependencies() {
    let project = TestProject::new().unwrap();
    let layer = project
        .write_json(
            "view_layer.json",
            &json!({
                "id": 2,
                "fields": [{ "name": "NAME", "alias": "Name", "type": "esriFieldTypeString" }],
                "displayField": "NAME",
                "adminLayerInfo": {
                    "tableName": "db.view",
                    "viewLayerDefinition": {
                        "table": {
                            "sourceServiceName": "Source_Service",
                            "sourceId": 7,
                            "sourceLayerFields": [{ "name": "NAME", "source": "NAME" }]
                        }
                    }
                }
            }),
        )
        .unwrap();
    let dependencies = project
        .write_json("deps.json", &json!([{ "id": "src1", "name": "Source_Service" }]))
        .unwrap();

    let output = project
        .run(&["templatize-fields", &layer, "--item-id", "view", "--dependencies", &dependencies])
        .unwrap();
    output.assert_success();
    let result = output.json().unwrap();

    assert_eq!(result["displayField"], "{{view.layer2.fields.name.name}}");
    let admin = &result["adminLayerInfo"];
    assert!(admin.get("tableName").is_none());
    let table = &admin["viewLayerDefinition"]["table"];
    assert_eq!(table["sourceServiceName"], "{{src1.name}}");
    assert!(table.get("sourceId").is_none());
    assert_eq!(table["sourceLayerFields"][0]["source"], "{{view.layer2.fields.name.name}}");
}

#[test]
fn test_templatize_fields_leaves_layer_without_id() {
    let project = TestProject::new().unwrap();
    let original = json!({ "fields": [{ "name": "A" }], "displayField": "A" });
    let layer = project.write_json("no_id.json", &original).unwrap();

    let result = project.run(&["templatize-fields", &layer, "--item-id", "x"]).unwrap().json().unwrap();
    assert_eq!(result, original);
}
