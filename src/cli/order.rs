//! Print the build order of a set of item templates.
//!
//! # Examples
//!
//! ```bash
//! soltpl order templates.json                # BuildOrdering as JSON
//! soltpl order solution-data.json --format tree
//! ```

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use super::common::{print_json, read_templates};
use crate::resolver::{DependencyGraph, sort};

/// Output format of the `order` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OrderFormat {
    /// `{ buildOrder, missingDependencies, itemsToBePatched }`
    #[default]
    Json,
    /// Dependency tree followed by the build order
    Tree,
}

/// Compute the order in which templates must be deployed.
#[derive(Args, Debug)]
pub struct OrderCommand {
    /// JSON array of item templates, or Solution data with a `templates` array
    templates: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OrderFormat::Json)]
    format: OrderFormat,
}

impl OrderCommand {
    pub fn execute(self) -> Result<()> {
        let templates = read_templates(&self.templates)?;
        let ordering = sort(&templates);

        match self.format {
            OrderFormat::Json => print_json(&ordering),
            OrderFormat::Tree => {
                let graph = DependencyGraph::from_templates(&templates);
                print!("{}", graph.to_forest_string());
                println!();
                println!("{} {}", "Build order:".bold(), ordering.build_order.join(" -> "));
                if !ordering.missing_dependencies.is_empty() {
                    println!(
                        "{} {}",
                        "Missing:".yellow().bold(),
                        ordering.missing_dependencies.join(", ")
                    );
                }
                for (item_id, dependencies) in &ordering.items_to_be_patched {
                    println!("{} {item_id} <- {}", "Patch:".cyan().bold(), dependencies.join(", "));
                }
                Ok(())
            }
        }
    }
}
