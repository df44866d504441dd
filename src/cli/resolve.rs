//! Placeholder resolution and inspection.
//!
//! ```bash
//! soltpl resolve template.json dictionary.json
//! soltpl resolve template.json dictionary.json --strict
//! soltpl check template.json --dictionary dictionary.json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

use super::common::{print_json, read_dictionary, read_json};
use crate::config::SolutionConfig;
use crate::core::SolutionError;
use crate::templating::{UnresolvedToken, find_unresolved, report_unresolved, resolve};

/// Resolve every placeholder of a document against a dictionary.
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// JSON document containing placeholders
    template: PathBuf,

    /// Template dictionary keyed by source item id
    dictionary: PathBuf,

    /// Fail if any placeholder remains unresolved
    #[arg(long)]
    strict: bool,
}

impl ResolveCommand {
    pub fn execute(self, config: &SolutionConfig) -> Result<()> {
        let template = read_json(&self.template)?;
        let dictionary = read_dictionary(&self.dictionary)?;
        debug!("Dictionary has {} entries", dictionary.len());

        let resolved = resolve(&template, &dictionary, &config.transforms());
        let remaining = report_unresolved(&resolved, &dictionary);

        if !remaining.is_empty() && (self.strict || config.fail_on_unresolved) {
            return Err(SolutionError::UnresolvedPlaceholders {
                count: remaining.len(),
                tokens: remaining.iter().map(ToString::to_string).collect(),
            }
            .into());
        }
        print_json(&resolved)
    }
}

/// List the placeholders present in a document.
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// JSON document to inspect
    file: PathBuf,

    /// Dictionary used to suggest similar paths
    #[arg(short, long)]
    dictionary: Option<PathBuf>,

    /// Print the findings as JSON
    #[arg(long)]
    json: bool,
}

impl CheckCommand {
    pub fn execute(self) -> Result<()> {
        let document = read_json(&self.file)?;
        let found = match &self.dictionary {
            Some(path) => report_unresolved(&document, &read_dictionary(path)?),
            None => find_unresolved(&document),
        };

        if self.json {
            return print_json(&found);
        }
        print_findings(&found);
        Ok(())
    }
}

fn print_findings(found: &[UnresolvedToken]) {
    if found.is_empty() {
        println!("{}", "No unresolved placeholders".green());
        return;
    }
    for token in found {
        println!("{token}");
    }
    println!("{} placeholder(s) unresolved", found.len().to_string().yellow().bold());
}
