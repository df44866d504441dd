//! Build order computation for a set of item templates.
//!
//! The sort is a three-color depth-first search over the templates in their
//! original order. A vertex is appended to the build order when it finishes,
//! which puts every dependency ahead of the items that required it. Cycles
//! and references to ids outside the working set never abort the sort; they
//! are reported in the returned [`BuildOrdering`] so the caller can create
//! everything once and then patch the cyclic references in a second pass.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

use crate::core::ItemTemplate;

/// Result of sorting a set of templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOrdering {
    /// Item ids, dependencies first.
    pub build_order: Vec<String>,
    /// Unique ids referenced as dependencies but absent from the templates.
    pub missing_dependencies: Vec<String>,
    /// Vertex id to the dependency ids that closed a cycle back to an
    /// in-progress ancestor while that vertex was being visited.
    pub items_to_be_patched: IndexMap<String, Vec<String>>,
}

impl BuildOrdering {
    /// Returns true if any cyclic reference needs a patch pass.
    #[must_use]
    pub fn needs_patching(&self) -> bool {
        !self.items_to_be_patched.is_empty()
    }
}

/// Color states for the depth-first search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not yet visited.
    White,
    /// On the current DFS path.
    Gray,
    /// Finished and appended to the build order.
    Black,
}

/// One level of the explicit DFS stack.
struct Frame<'a> {
    vertex: &'a str,
    dependencies: &'a [String],
    next: usize,
}

/// Compute the build order of `templates`.
///
/// Deterministic for a given input order and never fails. A template's
/// dependency list is its declared `dependencies` followed by any
/// `properties.syncViews` ids. A dependency on a vertex that is still in
/// progress (including a vertex depending on itself) is recorded under
/// `items_to_be_patched[vertex]`; only that back edge is recorded, not the
/// whole cycle.
///
/// # Examples
///
/// ```
/// use solution_templates::core::ItemTemplate;
/// use solution_templates::resolver::sort;
///
/// let templates = vec![
///     ItemTemplate::new("wma", "Web Mapping Application").with_dependencies(["map"]),
///     ItemTemplate::new("map", "Web Map"),
///     ItemTemplate::new("dsh", "Dashboard").with_dependencies(["wma"]),
/// ];
/// assert_eq!(sort(&templates).build_order, vec!["map", "wma", "dsh"]);
/// ```
#[must_use]
pub fn sort(templates: &[ItemTemplate]) -> BuildOrdering {
    let adjacency: Vec<Vec<String>> = templates.iter().map(ItemTemplate::dependency_ids).collect();

    let mut vertex_index: HashMap<&str, usize> = HashMap::with_capacity(templates.len());
    for (index, template) in templates.iter().enumerate() {
        vertex_index.entry(template.item_id.as_str()).or_insert(index);
    }
    let mut colors: HashMap<&str, Color> =
        vertex_index.keys().map(|&id| (id, Color::White)).collect();

    let mut ordering = BuildOrdering::default();
    let mut missing_seen: HashSet<&str> = HashSet::new();

    for template in templates {
        let root = template.item_id.as_str();
        if colors.get(root) != Some(&Color::White) {
            continue;
        }

        colors.insert(root, Color::Gray);
        let mut stack = vec![Frame {
            vertex: root,
            dependencies: &adjacency[vertex_index[root]],
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let vertex = frame.vertex;
            let dependencies = frame.dependencies;
            let Some(dependency) = dependencies.get(frame.next) else {
                stack.pop();
                colors.insert(vertex, Color::Black);
                trace!("Finished {vertex}");
                ordering.build_order.push(vertex.to_string());
                continue;
            };
            frame.next += 1;

            match colors.get(dependency.as_str()).copied() {
                Some(Color::White) => {
                    colors.insert(dependency.as_str(), Color::Gray);
                    stack.push(Frame {
                        vertex: dependency.as_str(),
                        dependencies: &adjacency[vertex_index[dependency.as_str()]],
                        next: 0,
                    });
                }
                Some(Color::Gray) => {
                    debug!("Cyclic reference {vertex} -> {dependency} will need patching");
                    ordering
                        .items_to_be_patched
                        .entry(vertex.to_string())
                        .or_default()
                        .push(dependency.clone());
                }
                Some(Color::Black) => {}
                None => {
                    if missing_seen.insert(dependency.as_str()) {
                        debug!("{vertex} depends on {dependency}, which is not in the template set");
                        ordering.missing_dependencies.push(dependency.clone());
                    }
                }
            }
        }
    }

    debug!(
        "Sorted {} template(s): {} missing dependencies, {} vertex(es) to patch",
        ordering.build_order.len(),
        ordering.missing_dependencies.len(),
        ordering.items_to_be_patched.len()
    );
    ordering
}
