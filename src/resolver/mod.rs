//! Build ordering for item templates.
//!
//! Templates reference each other through their `dependencies` lists (and
//! `properties.syncViews`). Before a Solution can be deployed, those
//! references have to be turned into a creation order in which every
//! dependency exists before the items that need it.
//!
//! # Overview
//!
//! - [`sort`] computes a [`BuildOrdering`]: the build order, the ids that are
//!   referenced but missing, and the cyclic references to patch afterwards
//! - [`DependencyGraph`] is a petgraph view of the same relationships for
//!   inspection and tree rendering
//!
//! # Cycles
//!
//! Items in a Solution legitimately reference each other (a web map and the
//! app that embeds it, a dashboard and its own map widgets). A cycle is
//! therefore not an error. The sort breaks it at the first back edge it
//! finds, produces a best-effort order, and lists the back edge in
//! `items_to_be_patched` so the deployer can fix the reference once every id
//! is known.

pub mod build_order;
pub mod dependency_graph;

pub use build_order::{BuildOrdering, sort};
pub use dependency_graph::{DependencyGraph, TemplateNode};
