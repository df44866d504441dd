use std::fmt;

use crate::constants::{FIELDS_SEGMENT, LAYER_SEGMENT, NAME_SUFFIX};
use crate::placeholder::placeholder;

/// Dictionary path under which the fields of one layer are stored,
/// `itemId.layer<id>.fields`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    item_id: String,
    base: String,
}

impl FieldPath {
    /// Path of the fields of layer `layer_id` in item `item_id`.
    pub fn new(item_id: impl Into<String>, layer_id: impl fmt::Display) -> Self {
        let item_id = item_id.into();
        let base = format!("{item_id}.{LAYER_SEGMENT}{layer_id}.{FIELDS_SEGMENT}");
        Self {
            item_id,
            base,
        }
    }

    /// Use `base` verbatim as the fields path.
    pub fn from_base(base: impl Into<String>) -> Self {
        let base = base.into();
        let item_id = base.split('.').next().unwrap_or_default().to_string();
        Self {
            item_id,
            base,
        }
    }

    /// Item id the path belongs to.
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// The dotted path, without markers.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Fields path of another layer of the same item.
    #[must_use]
    pub fn sibling(&self, layer_id: impl fmt::Display) -> Self {
        Self::new(self.item_id.clone(), layer_id)
    }

    /// Dictionary path of one field's deployed name.
    pub fn name_path(&self, field: &str) -> String {
        format!("{}.{}.{NAME_SUFFIX}", self.base, field.to_lowercase())
    }

    /// `{{base.<lowercased field>.name}}`.
    pub fn token(&self, field: &str) -> String {
        placeholder(&self.name_path(field))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}
