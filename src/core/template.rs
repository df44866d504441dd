//! Item template data model.
//!
//! An [`ItemTemplate`] is the parameterized description of one platform item.
//! Templates are serialized with the camelCase names used by persisted
//! Solution items (`itemId`, `estimatedDeploymentCostFactor`, ...).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};

use crate::constants::{DEFAULT_DEPLOYMENT_COST_FACTOR, SYNC_VIEWS_PROPERTY};

/// Parameterized description of a platform item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTemplate {
    /// Id of the source item this template was captured from.
    pub item_id: String,

    /// Platform item type, e.g. "Feature Service" or "Web Map".
    #[serde(rename = "type", default)]
    pub item_type: String,

    /// Short unique key of the template within its Solution.
    #[serde(default)]
    pub key: String,

    /// Item properties (title, url, extent, ...).
    #[serde(default)]
    pub item: Value,

    /// Item data (the JSON payload of maps, apps, views).
    #[serde(default)]
    pub data: Value,

    /// Resource file references attached to the item.
    #[serde(default)]
    pub resources: Vec<Value>,

    /// Ids of items that must exist before this one is created.
    ///
    /// May reference ids outside the working set or form cycles.
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub dependencies: Vec<String>,

    /// Ids of groups the item is shared with.
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub groups: Vec<String>,

    /// Type-specific properties (service definitions, layer lists, ...).
    #[serde(default)]
    pub properties: Value,

    /// Relative cost of deploying this item, used for progress reporting.
    #[serde(default = "default_cost_factor")]
    pub estimated_deployment_cost_factor: f64,
}

fn default_cost_factor() -> f64 {
    DEFAULT_DEPLOYMENT_COST_FACTOR
}

/// Accept any JSON for an id list, keeping only the string entries of an array.
fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(string_list(&value))
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

impl ItemTemplate {
    /// Create an empty template for `item_id`.
    pub fn new(item_id: impl Into<String>, item_type: impl Into<String>) -> Self {
        let item_id = item_id.into();
        let item_type = item_type.into();
        Self {
            key: template_key(&item_id, &item_type),
            item: json!({ "id": item_id, "type": item_type }),
            item_id,
            item_type,
            data: Value::Null,
            resources: Vec::new(),
            dependencies: Vec::new(),
            groups: Vec::new(),
            properties: Value::Null,
            estimated_deployment_cost_factor: DEFAULT_DEPLOYMENT_COST_FACTOR,
        }
    }

    /// Add declared dependencies (builder style).
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.extend(dependencies.into_iter().map(Into::into));
        self
    }

    /// Ids of synchronization views listed under `properties.syncViews`.
    #[must_use]
    pub fn sync_views(&self) -> Vec<String> {
        self.properties.get(SYNC_VIEWS_PROPERTY).map(string_list).unwrap_or_default()
    }

    /// Every id this template must wait for: declared dependencies followed by
    /// synchronization views, in listed order.
    #[must_use]
    pub fn dependency_ids(&self) -> Vec<String> {
        let mut ids = self.dependencies.clone();
        ids.extend(self.sync_views());
        ids
    }
}

/// Build a placeholder template for an id that is referenced but not part of
/// the working set.
#[must_use]
pub fn placeholder_template(item_id: &str, item_type: &str) -> ItemTemplate {
    ItemTemplate::new(item_id, item_type)
}

fn template_key(item_id: &str, item_type: &str) -> String {
    let prefix: String = item_type
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(4)
        .collect::<String>()
        .to_lowercase();
    let suffix: String = item_id.chars().take(8).collect();
    format!("{prefix}{suffix}")
}

/// Position of the template for `item_id` in `templates`.
#[must_use]
pub fn find_template_index(templates: &[ItemTemplate], item_id: &str) -> Option<usize> {
    templates.iter().position(|t| t.item_id == item_id)
}

/// The template for `item_id`, if present.
#[must_use]
pub fn find_template<'a>(templates: &'a [ItemTemplate], item_id: &str) -> Option<&'a ItemTemplate> {
    templates.iter().find(|t| t.item_id == item_id)
}

/// Item ids of `templates`, in order.
#[must_use]
pub fn template_ids(templates: &[ItemTemplate]) -> Vec<String> {
    templates.iter().map(|t| t.item_id.clone()).collect()
}

/// A declared item dependency: the dependency's id and its service name.
///
/// Used to cross-reference `sourceServiceName` values in view layer
/// definitions back to the item that will provide them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Source item id.
    pub id: String,
    /// Service name of the item.
    pub name: String,
}

impl Dependency {
    /// Create a dependency record.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Id of the first dependency whose service name is `name`.
#[must_use]
pub fn dependency_id_for_name<'a>(dependencies: &'a [Dependency], name: &str) -> Option<&'a str> {
    dependencies.iter().find(|d| d.name == name).map(|d| d.id.as_str())
}
