//! Dependency graph over item templates, rendered for `order --format tree`.
//!
//! The build order itself comes from [`sort`](super::sort), which walks the
//! templates directly so that their listed order is preserved exactly. This
//! graph only feeds the tree view.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::fmt::{self, Write};

use crate::core::ItemTemplate;

/// A vertex of the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateNode {
    /// Item id of the template, or of the referenced item.
    pub item_id: String,
    /// Item type when known.
    pub item_type: Option<String>,
    /// True if the id is referenced but no template provides it.
    pub external: bool,
}

impl fmt::Display for TemplateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.item_type.as_deref() {
            _ if self.external => write!(f, "{} (missing)", self.item_id),
            Some(item_type) if !item_type.is_empty() => write!(f, "{} [{item_type}]", self.item_id),
            _ => f.write_str(&self.item_id),
        }
    }
}

/// Directed graph where an edge `a -> b` means `a` depends on `b`.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<TemplateNode, ()>,
    index_of: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Build the graph of `templates`, including sync-view dependencies.
    ///
    /// Ids referenced but not provided by any template become external nodes.
    #[must_use]
    pub fn from_templates(templates: &[ItemTemplate]) -> Self {
        let mut graph = Self::default();
        for template in templates {
            graph.vertex(&template.item_id, Some(template.item_type.as_str()));
        }
        for template in templates {
            let from = graph.vertex(&template.item_id, None);
            for dependency in template.dependency_ids() {
                let to = graph.vertex(&dependency, None);
                graph.graph.update_edge(from, to, ());
            }
        }
        graph
    }

    /// Index of `item_id`, adding it as an external node when unseen.
    fn vertex(&mut self, item_id: &str, item_type: Option<&str>) -> NodeIndex {
        if let Some(&index) = self.index_of.get(item_id) {
            return index;
        }
        let index = self.graph.add_node(TemplateNode {
            item_id: item_id.to_string(),
            item_type: item_type.map(str::to_string),
            external: item_type.is_none(),
        });
        self.index_of.insert(item_id.to_string(), index);
        index
    }

    /// Direct dependencies of `index`, in the order they were declared.
    fn dependencies(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut deps: Vec<NodeIndex> = self.graph.neighbors_directed(index, Direction::Outgoing).collect();
        // petgraph yields the most recently added edge first
        deps.reverse();
        deps
    }

    /// Render one tree per root. A graph made only of cycles renders every
    /// node as its own tree.
    #[must_use]
    pub fn to_forest_string(&self) -> String {
        let mut starts: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&index| self.graph.neighbors_directed(index, Direction::Incoming).next().is_none())
            .collect();
        if starts.is_empty() {
            starts = self.graph.node_indices().collect();
        }

        let mut out = String::new();
        for start in starts {
            self.render(start, "", true, &mut Vec::new(), &mut out);
        }
        out
    }

    /// Append the subtree of `index`; `branch` holds the ancestors being drawn.
    fn render(
        &self,
        index: NodeIndex,
        indent: &str,
        last: bool,
        branch: &mut Vec<NodeIndex>,
        out: &mut String,
    ) {
        let (elbow, guide) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };
        let _ = writeln!(out, "{indent}{elbow}{}", self.graph[index]);
        let indent = format!("{indent}{guide}");

        if branch.contains(&index) {
            let _ = writeln!(out, "{indent}└── (circular reference)");
            return;
        }

        branch.push(index);
        let deps = self.dependencies(index);
        for (position, &dep) in deps.iter().enumerate() {
            self.render(dep, &indent, position + 1 == deps.len(), branch, out);
        }
        branch.pop();
    }
}
