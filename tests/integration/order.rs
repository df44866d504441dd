use predicates::prelude::*;
use serde_json::json;
use solution_templates::test_utils::JsonFixture;

use crate::common::TestProject;

#[test]
fn test_order_reports_cycle_to_patch() {
    let project = TestProject::new().unwrap();
    let file = project.write_fixture(&JsonFixture::cyclic_solution()).unwrap();

    let output = project.run(&["order", &file]).unwrap();
    output.assert_success();
    let ordering = output.json().unwrap();

    assert_eq!(ordering["buildOrder"], json!(["dsh", "map", "wma"]));
    assert_eq!(ordering["missingDependencies"], json!([]));
    assert_eq!(ordering["itemsToBePatched"], json!({ "dsh": ["wma"] }));
}

#[test]
fn test_order_reports_missing_dependencies() {
    let project = TestProject::new().unwrap();
    let file = project.write_fixture(&JsonFixture::map_and_app()).unwrap();

    let ordering = project.run(&["order", &file]).unwrap().json().unwrap();
    assert_eq!(ordering["buildOrder"], json!(["svc", "map", "wma"]));
    assert_eq!(ordering["missingDependencies"], json!(["basemap"]));
    assert_eq!(ordering["itemsToBePatched"], json!({}));
}

#[test]
fn test_order_tree_format() {
    let project = TestProject::new().unwrap();
    let file = project.write_fixture(&JsonFixture::map_and_app()).unwrap();

    project
        .command()
        .args(["order", &file, "--format", "tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wma [Web Mapping Application]"))
        .stdout(predicate::str::contains("basemap (missing)"))
        .stdout(predicate::str::contains("Build order: svc -> map -> wma"))
        .stdout(predicate::str::contains("Missing: basemap"));
}

#[test]
fn test_order_tree_lists_patches() {
    let project = TestProject::new().unwrap();
    let file = project.write_fixture(&JsonFixture::cyclic_solution()).unwrap();

    project
        .command()
        .args(["order", &file, "-f", "tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(circular reference)"))
        .stdout(predicate::str::contains("Patch: dsh <- wma"));
}

#[test]
fn test_order_empty_list() {
    let project = TestProject::new().unwrap();
    let file = project.write_json("empty.json", &json!([])).unwrap();

    let ordering = project.run(&["order", &file]).unwrap().json().unwrap();
    assert_eq!(ordering["buildOrder"], json!([]));
}

#[test]
fn test_order_rejects_non_template_input() {
    let project = TestProject::new().unwrap();
    let file = project.write_json("bad.json", &json!({ "items": [] })).unwrap();

    project
        .command()
        .args(["order", &file])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid template input"))
        .stderr(predicate::str::contains("templates"));
}

#[test]
fn test_order_missing_file() {
    let project = TestProject::new().unwrap();

    project
        .command()
        .args(["order", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file exists"));
}
