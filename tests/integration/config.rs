use predicates::prelude::*;
use serde_json::json;

use crate::common::TestProject;

#[test]
fn test_local_config_makes_resolution_strict() {
    let project = TestProject::new().unwrap();
    project.write_file("soltpl.toml", "fail_on_unresolved = true\n").unwrap();
    let template = project.write_json("t.json", &json!({ "a": "{{x.url}}" })).unwrap();
    let dictionary = project.write_json("d.json", &json!({})).unwrap();

    project
        .command()
        .args(["resolve", &template, &dictionary])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not be resolved"));
}

#[test]
fn test_explicit_config_overrides_local_file() {
    let project = TestProject::new().unwrap();
    project.write_file("soltpl.toml", "fail_on_unresolved = true\n").unwrap();
    let relaxed = project.write_file("relaxed.toml", "fail_on_unresolved = false\n").unwrap();
    let template = project.write_json("t.json", &json!({ "a": "{{x.url}}" })).unwrap();
    let dictionary = project.write_json("d.json", &json!({})).unwrap();

    project
        .command()
        .args(["--config", relaxed.to_str().unwrap(), "resolve", &template, &dictionary])
        .assert()
        .success();
}

#[test]
fn test_config_from_environment_variable() {
    let project = TestProject::new().unwrap();
    let strict = project.write_file("strict.toml", "fail_on_unresolved = true\n").unwrap();
    let template = project.write_json("t.json", &json!({ "a": "{{x.url}}" })).unwrap();
    let dictionary = project.write_json("d.json", &json!({})).unwrap();

    project
        .command()
        .env("SOLTPL_CONFIG", &strict)
        .args(["resolve", &template, &dictionary])
        .assert()
        .failure();
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let project = TestProject::new().unwrap();
    let file = project.write_json("t.json", &json!([])).unwrap();

    project
        .command()
        .args(["-c", "absent.toml", "order", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn test_unknown_config_key_is_an_error() {
    let project = TestProject::new().unwrap();
    project.write_file("soltpl.toml", "strictness = 3\n").unwrap();
    let file = project.write_json("t.json", &json!([])).unwrap();

    project
        .command()
        .args(["order", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("soltpl.toml"));
}

#[test]
fn test_default_locator_url_from_config() {
    let project = TestProject::new().unwrap();
    project
        .write_file("soltpl.toml", "default_locator_url = \"https://geocode.example.com/GeocodeServer\"\n")
        .unwrap();
    let template = project
        .write_json("t.json", &json!({ "geocoder": "{{organization.helperServices.geocode:defaultLocatorUrl}}" }))
        .unwrap();
    let dictionary = project.write_json("d.json", &json!({ "organization": {} })).unwrap();

    let resolved = project.run(&["resolve", &template, &dictionary]).unwrap().json().unwrap();
    assert_eq!(resolved["geocoder"], "https://geocode.example.com/GeocodeServer");
}

#[test]
fn test_tree_scanner_from_config() {
    let project = TestProject::new().unwrap();
    project.write_file("soltpl.toml", "id_scanner = \"tree\"\n").unwrap();
    let id = "0123456789abcdef0123456789abcdef";
    let file = project.write_json("item.json", &json!({ id: { "itemId": id } })).unwrap();

    let result = project.run(&["templatize-ids", &file]).unwrap().json().unwrap();
    let token = format!("{{{{{id}.itemId}}}}");
    assert_eq!(result[&token]["itemId"], json!(token));
}

#[test]
fn test_verbose_logging_goes_to_stderr() {
    let project = TestProject::new().unwrap();
    let file = project.write_json("t.json", &json!([{ "itemId": "a" }])).unwrap();

    let output = project.run(&["--verbose", "order", &file]).unwrap();
    output.assert_success();
    assert!(output.stderr.contains("Sorted 1 template(s)"));
    assert_eq!(output.json().unwrap()["buildOrder"], json!(["a"]));
}
