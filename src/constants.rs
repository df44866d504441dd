//! Shared constants for placeholder tokens, dictionary paths and configuration.

/// Opening marker of a placeholder token.
pub const PLACEHOLDER_START: &str = "{{";

/// Closing marker of a placeholder token.
pub const PLACEHOLDER_END: &str = "}}";

/// Suffix appended to a bare item id when it is templatized.
pub const ITEM_ID_SUFFIX: &str = ".itemId";

/// Suffix selecting the deployed name of an item or field.
pub const NAME_SUFFIX: &str = "name";

/// Path segment prefix for a layer or table inside an item's dictionary entry.
pub const LAYER_SEGMENT: &str = "layer";

/// Path segment holding a layer's field name mapping.
pub const FIELDS_SEGMENT: &str = "fields";

/// Property of a template's `properties` holding synchronization view ids.
pub const SYNC_VIEWS_PROPERTY: &str = "syncViews";

/// Length of a platform item id (32 hex characters).
pub const GUID_LENGTH: usize = 32;

/// Cost factor assigned to placeholder templates created for external ids.
pub const DEFAULT_DEPLOYMENT_COST_FACTOR: f64 = 2.0;

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "SOLTPL_CONFIG";

/// Project-local configuration file name.
pub const CONFIG_FILE_NAME: &str = "soltpl.toml";
