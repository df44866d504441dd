//! Configuration for soltpl.
//!
//! Settings live in a small TOML file. The first of these that applies is
//! used:
//!
//! 1. the path given with `--config` (must exist)
//! 2. the path in the `SOLTPL_CONFIG` environment variable (must exist)
//! 3. `soltpl.toml` in the current directory
//! 4. the platform default, `~/.soltpl/soltpl.toml` (or
//!    `%LOCALAPPDATA%\soltpl\soltpl.toml` on Windows)
//!
//! With no file at all, every setting has its default.
//!
//! ```toml
//! log_level = "debug"
//! schema_changes_allowed = false
//! fail_on_unresolved = true
//! id_scanner = "tree"
//! default_locator_url = "https://geocode.example.com/arcgis/rest/services/World/GeocodeServer"
//! ```

pub mod parser;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{CONFIG_ENV_VAR, CONFIG_FILE_NAME};
use crate::core::SolutionError;
use crate::fields::MappingOptions;
use crate::placeholder::IdScannerKind;
use crate::templating::Transforms;

pub use parser::parse_config;

/// User settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolutionConfig {
    /// Log filter used when neither `--verbose`, `--quiet` nor `RUST_LOG` is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Whether the destination allows deleting stale fields.
    pub schema_changes_allowed: bool,

    /// Treat placeholders left after resolution as an error.
    pub fail_on_unresolved: bool,

    /// Which GUID scanner templatizes ids.
    pub id_scanner: IdScannerKind,

    /// Returned by `defaultLocatorUrl` when the organization has no geocoder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_locator_url: Option<String>,
}

impl SolutionConfig {
    /// Locate and load the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file (argument or environment
    /// variable) does not exist, or if the selected file cannot be parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match Self::locate(explicit)? {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// The configuration file to use, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SolutionError::Config`] when an explicitly named file is missing.
    pub fn locate(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        let from_env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let required = explicit.map(Path::to_path_buf).or(from_env);
        if let Some(path) = required {
            if !path.is_file() {
                return Err(SolutionError::Config {
                    message: format!("configuration file not found: {}", path.display()),
                }
                .into());
            }
            return Ok(Some(path));
        }

        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            return Ok(Some(local));
        }
        Ok(Self::default_path().ok().filter(|path| path.is_file()))
    }

    /// Load the configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        parse_config(path).with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// The platform default configuration path.
    ///
    /// # Errors
    ///
    /// Returns an error if the home (or local data) directory cannot be
    /// determined.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("soltpl")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".soltpl")
        };

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }

    /// Built-in transforms configured with the locator fallback.
    pub fn transforms(&self) -> Transforms {
        Transforms::with_locator_fallback(self.default_locator_url.clone())
    }

    pub fn mapping_options(&self) -> MappingOptions {
        MappingOptions {
            schema_changes_allowed: self.schema_changes_allowed,
        }
    }
}
