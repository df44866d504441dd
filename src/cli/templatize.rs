//! Commands that templatize captured item JSON.
//!
//! ```bash
//! soltpl templatize-ids item.json
//! soltpl templatize-ids item.json --term Source_Service --suffix .name
//! soltpl templatize-fields service.json --item-id 4efe... --data data.json --dependencies deps.json
//! ```

use anyhow::Result;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

use super::common::{print_json, read_dependencies, read_json};
use crate::config::SolutionConfig;
use crate::constants::ITEM_ID_SUFFIX;
use crate::fields::{is_service_definition, templatize_layer, templatize_service};
use crate::placeholder::{get_ids, templatize_terms};

/// Replace bare item ids with `{{id.itemId}}` placeholders.
#[derive(Args, Debug)]
pub struct TemplatizeIdsCommand {
    /// JSON document to templatize
    file: PathBuf,

    /// Additional literal term to templatize (repeatable)
    #[arg(long = "term")]
    terms: Vec<String>,

    /// Suffix appended to each `--term` inside its placeholder
    #[arg(long, default_value = ITEM_ID_SUFFIX)]
    suffix: String,
}

impl TemplatizeIdsCommand {
    pub fn execute(self, config: &SolutionConfig) -> Result<()> {
        let document = read_json(&self.file)?;
        let found = get_ids(&document.to_string());
        info!("Found {} distinct item id(s) in {}", found.len(), self.file.display());

        let mut templatized = config.id_scanner.scanner().templatize_ids(&document);
        if !self.terms.is_empty() {
            templatized = templatize_terms(&templatized, &self.terms, &self.suffix);
        }
        print_json(&templatized)
    }
}

/// Replace field names in a layer or service definition with field tokens.
#[derive(Args, Debug)]
pub struct TemplatizeFieldsCommand {
    /// Layer definition, or service definition with `layers`/`tables`
    file: PathBuf,

    /// Id of the source item owning the layers
    #[arg(long)]
    item_id: String,

    /// Item data holding per-layer popups and drawing info
    #[arg(long)]
    data: Option<PathBuf>,

    /// JSON list of `{ "id", "name" }` records of the item's dependencies
    #[arg(long)]
    dependencies: Option<PathBuf>,
}

impl TemplatizeFieldsCommand {
    /// Prints the templatized definition, or `{ "definition", "data" }` when
    /// `--data` is given.
    pub fn execute(self) -> Result<()> {
        let mut definition = read_json(&self.file)?;
        let mut data = self.data.as_deref().map(read_json).transpose()?;
        let dependencies = match &self.dependencies {
            Some(path) => read_dependencies(path)?,
            None => Vec::new(),
        };

        if is_service_definition(&definition) {
            templatize_service(&mut definition, data.as_mut(), &self.item_id, &dependencies);
        } else {
            templatize_layer(&mut definition, data.as_mut(), &self.item_id, &dependencies);
        }

        match data {
            Some(data) => print_json(&json!({ "definition": definition, "data": data })),
            None => print_json(&definition),
        }
    }
}
