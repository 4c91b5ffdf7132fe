//! Import graph of a parsed module tree.
//!
//! Nodes are module paths and edges point from an importer to the module it
//! imports, labelled with the import name. The same path imported from two
//! places is one node with two incoming edges.

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

use super::types::Module;
use crate::core::{Result, ShortError};

/// Directed graph of imports between module paths.
#[derive(Debug, Default)]
pub struct ImportGraph {
    graph: DiGraph<String, String>,
    node_map: HashMap<String, NodeIndex>,
}

impl ImportGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph of `root` and all of its import subtrees.
    #[must_use]
    pub fn from_module<T>(root: &Module<T>) -> Self {
        let mut graph = Self::new();
        graph.ensure_node(&root.path);
        graph.add_module(root);
        graph
    }

    fn add_module<T>(&mut self, module: &Module<T>) {
        for import in &module.imports {
            self.add_import(&module.path, &import.name, &import.path);
            self.add_module(&import.module);
        }
    }

    fn ensure_node(&mut self, path: &str) -> NodeIndex {
        if let Some(&index) = self.node_map.get(path) {
            index
        } else {
            let index = self.graph.add_node(path.to_string());
            self.node_map.insert(path.to_string(), index);
            index
        }
    }

    /// Record that `importer` imports `path` under `name`.
    pub fn add_import(&mut self, importer: &str, name: &str, path: &str) {
        let from = self.ensure_node(importer);
        let to = self.ensure_node(path);

        // The same subtree is walked once per import site
        let exists = self
            .graph
            .edges_connecting(from, to)
            .any(|edge| edge.weight() == name);
        if !exists {
            self.graph.add_edge(from, to, name.to_string());
        }
    }

    /// Imports declared directly by `path`, as `(name, path)` pairs in
    /// declaration order.
    #[must_use]
    pub fn direct_imports(&self, path: &str) -> Vec<(String, String)> {
        let Some(&index) = self.node_map.get(path) else {
            return Vec::new();
        };

        let mut edges: Vec<_> = self.graph.edges_directed(index, Direction::Outgoing).collect();
        edges.sort_by_key(|edge| edge.id());
        edges
            .into_iter()
            .map(|edge| (edge.weight().clone(), self.graph[edge.target()].clone()))
            .collect()
    }

    /// All paths ordered so that every module comes after the modules it
    /// imports.
    pub fn dependency_order(&self) -> Result<Vec<String>> {
        match toposort(&self.graph, None) {
            Ok(indices) => Ok(indices.into_iter().rev().map(|idx| self.graph[idx].clone()).collect()),
            Err(cycle) => Err(ShortError::CyclicImport {
                chain: format!("cycle through {}", self.graph[cycle.node_id()]),
            }),
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Render the imports below `root` as a box-drawing tree.
    ///
    /// Levels deeper than `max_depth` are collapsed into a `…` line.
    #[must_use]
    pub fn to_tree_string(&self, root: &str, max_depth: Option<usize>) -> String {
        let mut result = format!("{root}\n");
        let mut ancestors = vec![root.to_string()];
        self.build_tree_string(root, &mut result, "", 1, max_depth, &mut ancestors);
        result
    }

    fn build_tree_string(
        &self,
        path: &str,
        result: &mut String,
        prefix: &str,
        depth: usize,
        max_depth: Option<usize>,
        ancestors: &mut Vec<String>,
    ) {
        let imports = self.direct_imports(path);
        if imports.is_empty() {
            return;
        }
        if max_depth.is_some_and(|max| depth > max) {
            result.push_str(&format!("{prefix}└── …\n"));
            return;
        }

        for (i, (name, target)) in imports.iter().enumerate() {
            let is_last = i == imports.len() - 1;
            let connector = if is_last {
                "└── "
            } else {
                "├── "
            };
            result.push_str(&format!("{prefix}{connector}{name}: {target}\n"));

            let child_prefix = if is_last {
                format!("{prefix}    ")
            } else {
                format!("{prefix}│   ")
            };
            if ancestors.contains(target) {
                result.push_str(&format!("{child_prefix}└── (circular reference)\n"));
                continue;
            }

            ancestors.push(target.clone());
            self.build_tree_string(target, result, &child_prefix, depth + 1, max_depth, ancestors);
            ancestors.pop();
        }
    }
}
