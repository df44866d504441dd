//! Input and output helpers shared by the commands.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::core::{Dependency, ItemTemplate, SolutionError};
use crate::templating::TemplateDictionary;

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&text).map_err(|e| SolutionError::TemplateParse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    debug!("Read {}", path.display());
    Ok(value)
}

/// Read item templates: either a bare array or an object carrying a
/// `templates` array (the data of a Solution item).
pub fn read_templates(path: &Path) -> Result<Vec<ItemTemplate>> {
    let value = read_json(path)?;
    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => map.remove("templates").ok_or_else(|| SolutionError::TemplateParse {
            path: path.display().to_string(),
            reason: "object has no `templates` array".to_string(),
        })?,
        _ => {
            return Err(SolutionError::TemplateParse {
                path: path.display().to_string(),
                reason: "expected an array of templates".to_string(),
            }
            .into());
        }
    };

    let templates: Vec<ItemTemplate> =
        serde_json::from_value(list).map_err(|e| SolutionError::TemplateParse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    debug!("Loaded {} template(s) from {}", templates.len(), path.display());
    Ok(templates)
}

/// Read a template dictionary (a JSON object keyed by source item id).
pub fn read_dictionary(path: &Path) -> Result<TemplateDictionary> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&text).map_err(|e| SolutionError::DictionaryParse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    TemplateDictionary::try_from(value).map_err(|e| match e {
        SolutionError::DictionaryParse {
            reason,
            ..
        } => SolutionError::DictionaryParse {
            path: path.display().to_string(),
            reason,
        }
        .into(),
        other => other.into(),
    })
}

/// Read the `[{ "id": ..., "name": ... }]` list of declared dependencies.
pub fn read_dependencies(path: &Path) -> Result<Vec<Dependency>> {
    let value = read_json(path)?;
    serde_json::from_value(value)
        .with_context(|| format!("Expected a list of {{ id, name }} records in {}", path.display()))
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}
