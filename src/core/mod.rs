//! Core types for solution-templates
//!
//! This module holds the data model shared by every engine and the error
//! types used around them.
//!
//! - [`ItemTemplate`] - parameterized description of one platform item
//! - [`Dependency`] - a declared dependency's id and service name
//! - [`SolutionError`] / [`ErrorContext`] - typed errors and their CLI rendering
//!
//! # Examples
//!
//! ```rust
//! use solution_templates::core::ItemTemplate;
//!
//! let dashboard = ItemTemplate::new("dsh", "Dashboard").with_dependencies(["wma"]);
//! assert_eq!(dashboard.dependency_ids(), vec!["wma"]);
//! ```

pub mod error;
pub mod template;

pub use error::{ErrorContext, SolutionError, user_friendly_error};
pub use template::{
    Dependency, ItemTemplate, dependency_id_for_name, find_template, find_template_index,
    placeholder_template, template_ids,
};
