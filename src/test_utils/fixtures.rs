//! JSON fixtures for templates, layer definitions and dictionaries.

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// Source id of the feature service used by the layer fixtures.
pub const SERVICE_ID: &str = "4efe5f693de34620934787ead6693f10";

/// Source id of the web map referencing [`SERVICE_ID`].
pub const MAP_ID: &str = "9a5fe0d9e3d44ab0a8c5d2c4fb2b1a77";

/// A named JSON document that can be written to disk.
#[derive(Clone, Debug)]
pub struct JsonFixture {
    pub name: String,
    pub content: Value,
}

impl JsonFixture {
    pub fn new(name: impl Into<String>, content: Value) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    /// Three templates depending on each other in a cycle:
    /// `wma -> map -> dsh -> wma`.
    pub fn cyclic_solution() -> Self {
        Self::new(
            "cyclic_solution",
            json!({
                "templates": [
                    { "itemId": "wma", "type": "Web Mapping Application", "dependencies": ["map"],
                      "data": { "map": "{{map.itemId}}" } },
                    { "itemId": "map", "type": "Web Map", "dependencies": ["dsh"],
                      "data": { "dashboard": "{{dsh.itemId}}" } },
                    { "itemId": "dsh", "type": "Dashboard", "dependencies": ["wma"],
                      "data": { "app": "{{wma.itemId}}" } }
                ]
            }),
        )
    }

    /// An app, a map and a service with one dependency outside the set.
    pub fn map_and_app() -> Self {
        Self::new(
            "map_and_app",
            json!([
                { "itemId": "wma", "type": "Web Mapping Application", "dependencies": ["map"] },
                { "itemId": "map", "type": "Web Map", "dependencies": ["svc", "basemap"] },
                { "itemId": "svc", "type": "Feature Service", "dependencies": [] }
            ]),
        )
    }

    /// A web map's data referencing a service by bare id.
    pub fn web_map_data() -> Self {
        Self::new(
            "web_map_data",
            json!({
                "operationalLayers": [{
                    "id": "layer_0",
                    "itemId": SERVICE_ID,
                    "url": format!("https://services.example.com/{SERVICE_ID}/FeatureServer/0"),
                    "title": "Election results"
                }],
                "tables": []
            }),
        )
    }

    /// A feature service definition with one layer of election results.
    pub fn feature_service() -> Self {
        Self::new(
            "feature_service",
            json!({
                "layers": [{
                    "id": 0,
                    "name": "Results",
                    "type": "Feature Layer",
                    "displayField": "COUNTY",
                    "fields": [
                        { "name": "OBJECTID", "alias": "OBJECTID", "type": "esriFieldTypeOID" },
                        { "name": "COUNTY", "alias": "County", "type": "esriFieldTypeString" },
                        { "name": "VOTED_DEM_2012", "alias": "Voted Dem 2012", "type": "esriFieldTypeDouble" }
                    ],
                    "templates": [{
                        "name": "New result",
                        "prototype": { "attributes": { "COUNTY": null, "VOTED_DEM_2012": null } }
                    }],
                    "drawingInfo": {
                        "renderer": {
                            "type": "classBreaks",
                            "field": "VOTED_DEM_2012",
                            "valueExpression": "$feature.VOTED_DEM_2012 * 100"
                        },
                        "labelingInfo": [{ "labelExpression": "[COUNTY]", "where": "VOTED_DEM_2012 > 0.5" }]
                    },
                    "definitionExpression": "COUNTY <> ''"
                }],
                "tables": []
            }),
        )
    }

    /// Item data of [`feature_service`](Self::feature_service) with a popup.
    pub fn feature_service_data() -> Self {
        Self::new(
            "feature_service_data",
            json!({
                "layers": [{
                    "id": 0,
                    "popupInfo": {
                        "title": "{COUNTY}",
                        "fieldInfos": [{ "fieldName": "VOTED_DEM_2012", "label": "Dem share" }]
                    }
                }]
            }),
        )
    }

    /// Dictionary entries for the deployed service and map.
    pub fn dictionary() -> Self {
        Self::new(
            "dictionary",
            json!({
                SERVICE_ID: {
                    "itemId": "a1b2c3d4e5f60718293a4b5c6d7e8f90",
                    "url": "https://services.dest.com/Results/FeatureServer",
                    "name": "Results_dest",
                    "layer0": {
                        "fields": {
                            "county": { "name": "county", "alias": "County", "type": "esriFieldTypeString" },
                            "voted_dem_2012": { "name": "voted_dem_2012", "alias": "Voted Dem 2012", "type": "esriFieldTypeDouble" }
                        },
                        "url": "https://services.dest.com/Results/FeatureServer/0",
                        "layerId": "0",
                        "itemId": "a1b2c3d4e5f60718293a4b5c6d7e8f90"
                    }
                },
                MAP_ID: { "itemId": "0f0e0d0c0b0a09080706050403020100" }
            }),
        )
    }

    /// Write the fixture to `dir/<name>.json`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("{}.json", self.name));
        let text = serde_json::to_string_pretty(&self.content)?;
        fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}
