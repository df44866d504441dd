//! Sequencing of a Solution deployment.
//!
//! The orchestrator that talks to the platform creates items one at a time in
//! build order. Each item's placeholders can only be resolved once the items
//! it depends on exist and their facts are in the dictionary, so the
//! sequence is always:
//!
//! ```text
//! next_item() ─► create the item externally ─► complete(facts) ─► next_item() ...
//! ```
//!
//! [`DeploymentSession::next_item`] hands out a [`PendingItem`] that borrows
//! the session mutably, so the next item cannot be requested until the
//! pending one has been completed or dropped. Dropping a pending item
//! without completing it leaves the session where it was.
//!
//! Cyclic references cannot be satisfied in one pass. Once every item is
//! complete, [`DeploymentSession::patch_pass`] re-resolves the templates
//! listed in `items_to_be_patched`, now that every id is known.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use solution_templates::core::ItemTemplate;
//! use solution_templates::deployment::DeploymentSession;
//! use solution_templates::templating::{ItemFacts, TemplateDictionary};
//!
//! let mut map = ItemTemplate::new("map", "Web Map");
//! let mut app = ItemTemplate::new("app", "Web Mapping Application").with_dependencies(["map"]);
//! app.data = json!({ "map": { "itemId": "{{map.itemId}}" } });
//!
//! let mut session = DeploymentSession::new(vec![app, map], TemplateDictionary::new());
//!
//! let pending = session.next_item().unwrap();
//! assert_eq!(pending.source_id(), "map");
//! pending.complete(&ItemFacts::new("new-map"));
//!
//! let pending = session.next_item().unwrap();
//! assert_eq!(pending.template().data["map"]["itemId"], "new-map");
//! pending.complete(&ItemFacts::new("new-app"));
//!
//! assert!(session.is_complete());
//! ```

use tracing::{debug, warn};

use crate::core::{ItemTemplate, find_template};
use crate::resolver::{BuildOrdering, sort};
use crate::templating::{ItemFacts, TemplateDictionary, Transforms, resolve_in_place};

/// Drives the creation of a set of templates in build order.
#[derive(Debug)]
pub struct DeploymentSession {
    templates: Vec<ItemTemplate>,
    ordering: BuildOrdering,
    dictionary: TemplateDictionary,
    transforms: Transforms,
    position: usize,
}

impl DeploymentSession {
    /// Sort `templates` and start a session with the built-in transforms.
    pub fn new(templates: Vec<ItemTemplate>, dictionary: TemplateDictionary) -> Self {
        let ordering = sort(&templates);
        if !ordering.missing_dependencies.is_empty() {
            warn!(
                "Templates reference items outside the Solution: {}",
                ordering.missing_dependencies.join(", ")
            );
        }
        Self {
            templates,
            ordering,
            dictionary,
            transforms: Transforms::with_builtins(),
            position: 0,
        }
    }

    /// Use `transforms` instead of the built-in transforms.
    #[must_use]
    pub fn with_transforms(mut self, transforms: Transforms) -> Self {
        self.transforms = transforms;
        self
    }

    pub fn ordering(&self) -> &BuildOrdering {
        &self.ordering
    }

    pub fn dictionary(&self) -> &TemplateDictionary {
        &self.dictionary
    }

    /// End the session, keeping the dictionary.
    pub fn into_dictionary(self) -> TemplateDictionary {
        self.dictionary
    }

    /// Number of items not yet completed.
    pub fn remaining(&self) -> usize {
        self.ordering.build_order.len() - self.position
    }

    /// Returns true once every item in the build order has been completed.
    pub fn is_complete(&self) -> bool {
        self.position >= self.ordering.build_order.len()
    }

    /// The next item to create, with its template resolved against the
    /// current dictionary. `None` when every item is complete.
    pub fn next_item(&mut self) -> Option<PendingItem<'_>> {
        let source_id = self.ordering.build_order.get(self.position)?.clone();
        let Some(template) = find_template(&self.templates, &source_id) else {
            warn!("No template for {source_id} in the build order");
            return None;
        };
        let template = resolve_template(template, &self.dictionary, &self.transforms);
        debug!("Next item {source_id} ({} remaining)", self.remaining());
        Some(PendingItem {
            session: self,
            source_id,
            template,
        })
    }

    /// Templates whose cyclic references can be repaired now.
    ///
    /// Returns `None` until every item has been completed.
    pub fn patch_pass(&self) -> Option<Vec<PatchItem>> {
        if !self.is_complete() {
            return None;
        }
        let patches = self
            .ordering
            .items_to_be_patched
            .iter()
            .filter_map(|(item_id, dependencies)| {
                let template = find_template(&self.templates, item_id)?;
                debug!("Patching {item_id} for {}", dependencies.join(", "));
                Some(PatchItem {
                    item_id: item_id.clone(),
                    dependencies: dependencies.clone(),
                    template: resolve_template(template, &self.dictionary, &self.transforms),
                })
            })
            .collect();
        Some(patches)
    }
}

/// An item handed out for creation.
#[derive(Debug)]
pub struct PendingItem<'s> {
    session: &'s mut DeploymentSession,
    source_id: String,
    template: ItemTemplate,
}

impl PendingItem<'_> {
    /// Id of the source item the template was captured from.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// The template with every currently resolvable placeholder resolved.
    pub fn template(&self) -> &ItemTemplate {
        &self.template
    }

    /// Record the facts of the created item and advance the session.
    pub fn complete(self, facts: &ItemFacts) {
        debug!("Completed {} as {}", self.source_id, facts.item_id);
        self.session.dictionary.record_item(&self.source_id, facts);
        self.session.position += 1;
    }
}

/// A template to update after every item exists.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchItem {
    /// Id of the source item to patch.
    pub item_id: String,
    /// The dependencies that closed a cycle.
    pub dependencies: Vec<String>,
    /// The template resolved against the final dictionary.
    pub template: ItemTemplate,
}

/// Resolve the JSON parts of a template; ids and dependencies are kept.
pub fn resolve_template(
    template: &ItemTemplate,
    dictionary: &TemplateDictionary,
    transforms: &Transforms,
) -> ItemTemplate {
    let mut resolved = template.clone();
    resolve_in_place(&mut resolved.item, dictionary, transforms);
    resolve_in_place(&mut resolved.data, dictionary, transforms);
    resolve_in_place(&mut resolved.properties, dictionary, transforms);
    for resource in &mut resolved.resources {
        resolve_in_place(resource, dictionary, transforms);
    }
    resolved
}
