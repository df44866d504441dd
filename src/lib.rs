//! solution-templates - ordering and templatization of Solution item templates
//!
//! A Solution is a bundle of item templates (maps, apps, feature services,
//! dashboards, ...) captured from one organization so it can be deployed into
//! another. Captured JSON is full of values that only make sense where it was
//! captured: item ids, service urls, field names. This crate rewrites those
//! values as `{{placeholder}}` tokens, decides the order in which the items
//! must be recreated, and resolves the tokens again from a dictionary of the
//! items as they were deployed.
//!
//! # Pipeline
//!
//! ```text
//! capture:  templatize_ids ─► templatize_service / templatize_layer ─► cache_field_infos
//! deploy:   sort ─► DeploymentSession::next_item ─► (create) ─► complete ─► ... ─► patch_pass
//!                                   │
//!                                   └── resolve(template, dictionary, transforms)
//! ```
//!
//! # Modules
//!
//! - [`resolver`] - build order with cycle and missing-dependency reporting
//! - [`placeholder`] - token primitives and the item id scanners
//! - [`fields`] - field name templatization and the FieldInfo cache
//! - [`templating`] - the dictionary, transforms and the substitution engine
//! - [`deployment`] - step-by-step deployment sequencing
//! - [`core`] - the template model and error types
//! - [`config`] - `soltpl.toml` settings
//! - [`cli`] - the `soltpl` command line
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use solution_templates::core::ItemTemplate;
//! use solution_templates::resolver::sort;
//! use solution_templates::templating::{TemplateDictionary, Transforms, resolve};
//!
//! let map = ItemTemplate::new("map", "Web Map");
//! let app = ItemTemplate::new("app", "Web Mapping Application").with_dependencies(["map"]);
//! let ordering = sort(&[app, map]);
//! assert_eq!(ordering.build_order, vec!["map", "app"]);
//!
//! let dictionary = TemplateDictionary::try_from(json!({ "map": { "itemId": "f00d" } })).unwrap();
//! let data = resolve(&json!({ "webmap": "{{map.itemId}}" }), &dictionary, &Transforms::with_builtins());
//! assert_eq!(data["webmap"], "f00d");
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod deployment;
pub mod fields;
pub mod placeholder;
pub mod resolver;
pub mod templating;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
