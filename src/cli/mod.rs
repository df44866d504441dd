//! Command-line interface for soltpl.
//!
//! Each subcommand exposes one engine of the library over JSON files, so
//! captured templates can be inspected and transformed without writing code:
//!
//! - `order` - build order, missing dependencies and cycles to patch
//! - `templatize-ids` - replace bare item ids with `{{id.itemId}}`
//! - `templatize-fields` - replace field names with field tokens
//! - `resolve` - substitute placeholders from a dictionary
//! - `check` - list the placeholders still present in a document
//!
//! Output goes to stdout as JSON (or text where noted); logs go to stderr.
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - debug logging
//! - `--quiet` / `-q` - errors only
//! - `--config` / `-c` - configuration file (see [`crate::config`])
//!
//! Without `--verbose` or `--quiet`, `RUST_LOG` is honored, then the
//! configured `log_level`, then `warn`.

mod common;
mod order;
mod resolve;
mod templatize;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::SolutionConfig;

pub use order::OrderFormat;

/// Log filter used when nothing else selects one.
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Runtime settings derived from the global flags.
///
/// Kept separate from [`Cli`] so tests can build one directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter forced by `--verbose` or `--quiet`.
    pub log_level: Option<String>,

    /// Configuration file given with `--config`.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The log filter directive: the forced level, then `RUST_LOG`, then the
    /// configured level, then `warn`.
    #[must_use]
    pub fn log_directive(&self, config: &SolutionConfig) -> String {
        if let Some(level) = &self.log_level {
            return level.clone();
        }
        if let Ok(from_env) = std::env::var(EnvFilter::DEFAULT_ENV)
            && !from_env.trim().is_empty()
        {
            return from_env;
        }
        config.log_level.clone().unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }

    /// Install the stderr subscriber. Does nothing if one is already set.
    pub fn init_logging(&self, config: &SolutionConfig) {
        let directive = self.log_directive(config);
        let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Dependency ordering and placeholder tooling for Solution item templates.
#[derive(Parser, Debug)]
#[command(
    name = "soltpl",
    about = "Order, templatize and resolve Solution item templates",
    version,
    long_about = "soltpl computes the deployment order of captured item templates, \
                  replaces environment-specific ids and field names with placeholders, \
                  and resolves those placeholders against a dictionary of deployed items."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a configuration file (overrides SOLTPL_CONFIG and soltpl.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the build order of a set of templates.
    Order(order::OrderCommand),

    /// Replace bare item ids with `{{id.itemId}}` placeholders.
    TemplatizeIds(templatize::TemplatizeIdsCommand),

    /// Replace field names in a layer or service definition with field tokens.
    TemplatizeFields(templatize::TemplatizeFieldsCommand),

    /// Resolve placeholders against a template dictionary.
    Resolve(resolve::ResolveCommand),

    /// List the placeholders remaining in a document.
    Check(resolve::CheckCommand),
}

impl Cli {
    /// Run the parsed command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or an input file cannot be
    /// loaded, or if `resolve` runs in strict mode and placeholders remain.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Run the parsed command with an explicit [`CliConfig`].
    pub fn execute_with_config(self, cli_config: CliConfig) -> Result<()> {
        let config = SolutionConfig::load(cli_config.config_path.as_deref())?;
        cli_config.init_logging(&config);

        match self.command {
            Commands::Order(cmd) => cmd.execute(),
            Commands::TemplatizeIds(cmd) => cmd.execute(&config),
            Commands::TemplatizeFields(cmd) => cmd.execute(),
            Commands::Resolve(cmd) => cmd.execute(&config),
            Commands::Check(cmd) => cmd.execute(),
        }
    }
}
