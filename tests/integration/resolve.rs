use predicates::prelude::*;
use serde_json::json;
use solution_templates::test_utils::{JsonFixture, MAP_ID, SERVICE_ID};

use crate::common::TestProject;

fn template() -> serde_json::Value {
    json!({
        "url": format!("{{{{{SERVICE_ID}.url}}}}/0"),
        "webmap": format!("{{{{{MAP_ID}.itemId}}}}"),
        "field": format!("{{{{{SERVICE_ID}.layer0.fields.voted_dem_2012.name}}}}"),
        "layer": format!("{{{{{SERVICE_ID}.layer0}}}}"),
        "title": "{{missing.title||Untitled}}"
    })
}

#[test]
fn test_resolve_substitutes_dictionary_values() {
    let project = TestProject::new().unwrap();
    let template = project.write_json("template.json", &template()).unwrap();
    let dictionary = project.write_fixture(&JsonFixture::dictionary()).unwrap();

    let output = project.run(&["resolve", &template, &dictionary]).unwrap();
    output.assert_success();
    let resolved = output.json().unwrap();

    assert_eq!(resolved["url"], "https://services.dest.com/Results/FeatureServer/0");
    assert_eq!(resolved["webmap"], "0f0e0d0c0b0a09080706050403020100");
    assert_eq!(resolved["field"], "voted_dem_2012");
    assert_eq!(resolved["layer"]["layerId"], "0");
    assert_eq!(resolved["title"], "Untitled");
}

#[test]
fn test_resolve_keeps_unknown_tokens() {
    let project = TestProject::new().unwrap();
    let template = project.write_json("template.json", &json!({ "a": "{{nowhere.url}}" })).unwrap();
    let dictionary = project.write_fixture(&JsonFixture::dictionary()).unwrap();

    let output = project.run(&["resolve", &template, &dictionary]).unwrap();
    output.assert_success();
    assert_eq!(output.json().unwrap()["a"], "{{nowhere.url}}");
    assert!(output.stderr.contains("Unresolved placeholder"));
}

#[test]
fn test_resolve_strict_fails_on_remaining_tokens() {
    let project = TestProject::new().unwrap();
    let template = project.write_json("template.json", &json!({ "a": "{{nowhere.url}}" })).unwrap();
    let dictionary = project.write_fixture(&JsonFixture::dictionary()).unwrap();

    project
        .command()
        .args(["resolve", &template, &dictionary, "--strict"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("1 placeholder(s) could not be resolved"))
        .stderr(predicate::str::contains("/a: {{nowhere.url}}"));
}

#[test]
fn test_resolve_rejects_array_dictionary() {
    let project = TestProject::new().unwrap();
    let template = project.write_json("template.json", &json!({})).unwrap();
    let dictionary = project.write_json("dict.json", &json!([1, 2])).unwrap();

    project
        .command()
        .args(["resolve", &template, &dictionary])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid template dictionary 'dict.json'"))
        .stderr(predicate::str::contains("keyed by source item id"));
}

#[test]
fn test_check_lists_tokens_with_suggestions() {
    let project = TestProject::new().unwrap();
    let document = project
        .write_json("doc.json", &json!({ "svc": format!("{{{{{SERVICE_ID}.ur}}}}"), "ok": "plain" }))
        .unwrap();
    let dictionary = project.write_fixture(&JsonFixture::dictionary()).unwrap();

    project
        .command()
        .args(["check", &document, "--dictionary", &dictionary])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("/svc: {{{{{SERVICE_ID}.ur}}}}")))
        .stdout(predicate::str::contains(format!("did you mean: {SERVICE_ID}.url")))
        .stdout(predicate::str::contains("1 placeholder(s) unresolved"));
}

#[test]
fn test_check_json_output() {
    let project = TestProject::new().unwrap();
    let document = project
        .write_json("doc.json", &json!({ "items": ["{{a.itemId}}", "x {{b.url}} y"] }))
        .unwrap();

    let found = project.run(&["check", &document, "--json"]).unwrap().json().unwrap();
    assert_eq!(
        found,
        json!([
            { "pointer": "/items/0", "token": "{{a.itemId}}" },
            { "pointer": "/items/1", "token": "{{b.url}}" }
        ])
    );
}

#[test]
fn test_check_clean_document() {
    let project = TestProject::new().unwrap();
    let document = project.write_json("doc.json", &json!({ "title": "done" })).unwrap();

    project
        .command()
        .args(["check", &document])
        .assert()
        .success()
        .stdout(predicate::str::contains("No unresolved placeholders"));
}
