//! Plan export for visualization and tooling.
//!
//! Renders a resolved plan as a serializable graph for consumption by
//! build-report UIs, Graphviz, or documentation generators. Everything here
//! is behind the `plan-export` feature.

use serde::Serialize;

use crate::key::ServiceKey;
use crate::plan::{DependencyRef, ResolvedPlan};
use crate::symbol::SymbolUniverse;

/// One service of an exported plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlanNode {
    /// Stable node id: the implementation name, `@key`-suffixed when keyed
    pub id: String,
    pub interface: String,
    pub implementation: String,
    pub lifetime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub priority: i32,
    /// Whether this node wins primary selection for its binding
    pub primary: bool,
    pub dispose: String,
    pub obsolete: bool,
}

/// One dependency of an exported plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlanEdge {
    pub from: String,
    pub to: String,
    /// Collection-valued edges fan out to every member of the binding
    pub collection: bool,
    /// Target is satisfied outside the plan (an external collection
    /// registration)
    pub external: bool,
}

/// A resolved plan flattened into nodes and edges.
#[derive(Debug, Clone, Serialize)]
pub struct PlanGraph {
    pub root: String,
    pub nodes: Vec<PlanNode>,
    pub edges: Vec<PlanEdge>,
}

fn node_id(universe: &SymbolUniverse, binding: &ServiceKey) -> String {
    match binding.key() {
        Some(key) => format!("{}@{}", universe.name(binding.symbol), key),
        None => universe.name(binding.symbol).to_string(),
    }
}

impl PlanGraph {
    /// Flattens `plan` against the universe it was resolved in.
    pub fn from_plan(plan: &ResolvedPlan, universe: &SymbolUniverse) -> Self {
        let mut nodes = Vec::with_capacity(plan.len());
        let mut edges = Vec::new();

        for selection in plan.selections() {
            let service = selection.service;
            nodes.push(PlanNode {
                id: node_id(universe, &service.identity()),
                interface: universe.name(service.interface_type).to_string(),
                implementation: universe.name(service.implementation_type).to_string(),
                lifetime: service.lifetime.to_string(),
                key: service.key.as_deref().map(str::to_string),
                priority: service.priority,
                primary: selection.is_primary,
                dispose: service.dispose.as_str().to_string(),
                obsolete: service.obsolete,
            });
        }

        for service in plan.services() {
            let from = node_id(universe, &service.identity());
            for dep in &service.dependencies {
                match dep {
                    DependencyRef::Single(binding) => match plan.primary_for(binding) {
                        Some(target) => edges.push(PlanEdge {
                            from: from.clone(),
                            to: node_id(universe, &target.identity()),
                            collection: false,
                            external: false,
                        }),
                        None => edges.push(PlanEdge {
                            from: from.clone(),
                            to: node_id(universe, binding),
                            collection: false,
                            external: true,
                        }),
                    },
                    DependencyRef::Collection(binding) => {
                        let members = plan.collection_for(binding);
                        if members.is_empty() {
                            edges.push(PlanEdge {
                                from: from.clone(),
                                to: node_id(universe, binding),
                                collection: true,
                                external: true,
                            });
                        }
                        for member in members {
                            edges.push(PlanEdge {
                                from: from.clone(),
                                to: node_id(universe, &member.identity()),
                                collection: true,
                                external: false,
                            });
                        }
                    }
                }
            }
        }

        Self {
            root: universe.name(plan.root()).to_string(),
            nodes,
            edges,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Renders the graph in Graphviz DOT format.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        out.push_str("digraph plan {\n  rankdir=TB;\n  node [shape=box];\n");
        for node in &self.nodes {
            let color = match node.lifetime.as_str() {
                "Singleton" => "lightblue",
                "Scoped" => "lightgreen",
                "Transient" => "lightyellow",
                _ => "white",
            };
            let style = if node.primary { "filled,bold" } else { "filled" };
            out.push_str(&format!(
                "  \"{}\" [label=\"{}\\n({})\", fillcolor={}, style=\"{}\"];\n",
                node.id, node.implementation, node.lifetime, color, style
            ));
        }
        for edge in &self.edges {
            let style = match (edge.collection, edge.external) {
                (true, _) => "bold",
                (_, true) => "dashed",
                _ => "solid",
            };
            out.push_str(&format!(
                "  \"{}\" -> \"{}\" [style={}];\n",
                edge.from, edge.to, style
            ));
        }
        out.push_str("}\n");
        out
    }

    /// Renders the graph in Mermaid format for documentation embeds.
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("graph TD\n");
        for node in &self.nodes {
            out.push_str(&format!("  {}[{}]\n", sanitize(&node.id), node.id));
        }
        for edge in &self.edges {
            let arrow = if edge.collection { "==>" } else { "-->" };
            out.push_str(&format!(
                "  {} {} {}\n",
                sanitize(&edge.from),
                arrow,
                sanitize(&edge.to)
            ));
        }
        out
    }
}

/// Mermaid node ids cannot carry punctuation.
fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
