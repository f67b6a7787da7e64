//! Relationship graph
//!
//! Derives the tool↔objective network consumed by the force-directed map:
//! one node per entity, one undirected edge per related pair regardless of
//! which side (or both) authored the association. Layout itself is the
//! visualization layer's job; this module only prepares the data.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;

use crate::catalog::{Catalog, EntityKind};

/// A node in the relationship graph
#[derive(Debug, Clone, Serialize)]
pub struct RelationNode {
    /// Entity slug; node identity
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    /// Incident edge count, incremented once per edge endpoint
    pub connections: usize,
}

/// An undirected edge between a tool and an objective
#[derive(Debug, Clone, Serialize)]
pub struct RelationEdge {
    pub source: String,
    pub target: String,
}

/// The derived relationship graph
pub struct RelationGraph {
    graph: UnGraph<RelationNode, ()>,
    indices: HashMap<String, NodeIndex>,
}

impl RelationGraph {
    /// Build the graph from the catalog.
    ///
    /// Edges are emitted in two passes with unordered-pair deduplication:
    /// first from each tool's `objectives` tag association, then from each
    /// objective's `related_tools` list (exact slug match, falling back to a
    /// slug re-derived from the tool display name). References that resolve
    /// to nothing are dropped silently; `lint` reports them. Output is stable
    /// for stable input ordering.
    pub fn build(catalog: &Catalog) -> Self {
        let mut graph = UnGraph::with_capacity(
            catalog.tool_count() + catalog.objective_count(),
            catalog.tool_count() * 2,
        );
        let mut indices = HashMap::new();

        for tool in catalog.tools() {
            let idx = graph.add_node(RelationNode {
                id: tool.slug().to_string(),
                name: tool.name.clone(),
                kind: EntityKind::Tool,
                connections: 0,
            });
            indices.insert(tool.slug().to_string(), idx);
        }
        for objective in catalog.objectives() {
            let idx = graph.add_node(RelationNode {
                id: objective.slug.clone(),
                name: objective.name.clone(),
                kind: EntityKind::Objective,
                connections: 0,
            });
            indices.insert(objective.slug.clone(), idx);
        }

        // Unordered pair set; (a, b) and (b, a) are the same edge.
        let mut emitted: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
        let mut emit = |graph: &mut UnGraph<RelationNode, ()>, a: NodeIndex, b: NodeIndex| {
            if emitted.contains(&(a, b)) || emitted.contains(&(b, a)) {
                return;
            }
            emitted.insert((a, b));
            graph.add_edge(a, b, ());
        };

        // Pass 1: tool-side associations.
        for tool in catalog.tools() {
            let tool_idx = indices[tool.slug()];
            for objective_slug in &tool.tags.objectives {
                let Some(objective) = catalog.objective_by_slug(objective_slug) else {
                    continue;
                };
                emit(&mut graph, tool_idx, indices[objective.slug.as_str()]);
            }
        }

        // Pass 2: objective-side references.
        for objective in catalog.objectives() {
            let objective_idx = indices[objective.slug.as_str()];
            for reference in &objective.related_tools {
                let Some(tool) = catalog.resolve_tool_reference(reference) else {
                    continue;
                };
                emit(&mut graph, objective_idx, indices[tool.slug()]);
            }
        }

        // Count incident edges per endpoint.
        for idx in indices.values() {
            let degree = graph.edges(*idx).count();
            graph[*idx].connections = degree;
        }

        Self { graph, indices }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node lookup by entity slug
    pub fn node(&self, slug: &str) -> Option<&RelationNode> {
        self.indices.get(slug).map(|&idx| &self.graph[idx])
    }

    /// Nodes in insertion order: tools first, then objectives
    pub fn nodes(&self) -> impl Iterator<Item = &RelationNode> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Edges in emission order
    pub fn edges(&self) -> Vec<RelationEdge> {
        self.graph
            .edge_indices()
            .filter_map(|e| {
                let (a, b) = self.graph.edge_endpoints(e)?;
                Some(RelationEdge {
                    source: self.graph[a].id.clone(),
                    target: self.graph[b].id.clone(),
                })
            })
            .collect()
    }

    /// Slugs of the entities directly connected to `slug`
    pub fn neighbors(&self, slug: &str) -> Vec<&str> {
        let Some(&idx) = self.indices.get(slug) else {
            return Vec::new();
        };
        self.graph
            .neighbors(idx)
            .map(|n| self.graph[n].id.as_str())
            .collect()
    }

    /// Node/link document for the force-directed map consumer
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "nodes": self.nodes().collect::<Vec<_>>(),
            "links": self.edges(),
        })
    }

    /// GraphViz DOT export, tools and objectives colour-coded
    pub fn to_dot(&self) -> String {
        let mut output = String::new();
        output.push_str("graph PolicyNetwork {\n");
        output.push_str("  layout=neato;\n");
        output.push_str("  node [shape=circle, style=filled, fontname=\"Helvetica\", fontsize=10];\n");
        output.push('\n');

        for node in self.nodes() {
            let color = match node.kind {
                EntityKind::Tool => "#27ae60",
                EntityKind::Objective => "#3498db",
            };
            output.push_str(&format!(
                "  \"{}\" [label=\"{}\", fillcolor=\"{}\"];\n",
                node.id,
                node.name.replace('"', "\\\""),
                color
            ));
        }

        output.push('\n');
        for edge in self.edges() {
            output.push_str(&format!("  \"{}\" -- \"{}\";\n", edge.source, edge.target));
        }

        output.push_str("}\n");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_single_edge_and_connection_counts() {
        let catalog = Catalog::from_yaml(
            "tools:\n  - name: Grants\n    id: grants\n    tags:\n      objectives: [boost_rd]\n",
            "objectives:\n  - name: Boost R&D\n    tag: boost_rd\n    description: d\n    related_tools: []\n",
        )
        .unwrap();
        let graph = RelationGraph::build(&catalog);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node("grants").unwrap().connections, 1);
        assert_eq!(graph.node("boost_rd").unwrap().connections, 1);
    }

    #[test]
    fn test_bidirectional_association_deduplicated() {
        // Both sides author the same relationship; one edge results.
        let catalog = Catalog::from_yaml(
            "tools:\n  - name: Grants\n    id: grants\n    tags:\n      objectives: [boost_rd]\n",
            "objectives:\n  - name: Boost R&D\n    tag: boost_rd\n    description: d\n    related_tools: [grants]\n",
        )
        .unwrap();
        let graph = RelationGraph::build(&catalog);

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node("grants").unwrap().connections, 1);
    }

    #[test]
    fn test_objective_side_fallback_resolution() {
        let catalog = Catalog::from_yaml(
            "tools:\n  - name: R&D Tax Credits\n    id: rd_tax_credits\n",
            "objectives:\n  - name: Boost R&D\n    tag: boost_rd\n    description: d\n    related_tools: [r_and_d_tax_credits]\n",
        )
        .unwrap();
        let graph = RelationGraph::build(&catalog);

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbors("boost_rd"), vec!["rd_tax_credits"]);
    }

    #[test]
    fn test_unresolvable_references_dropped() {
        let catalog = Catalog::from_yaml(
            "tools:\n  - name: Grants\n    id: grants\n    tags:\n      objectives: [ghost_objective]\n",
            "objectives:\n  - name: Boost R&D\n    tag: boost_rd\n    description: d\n    related_tools: [ghost_tool]\n",
        )
        .unwrap();
        let graph = RelationGraph::build(&catalog);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node("grants").unwrap().connections, 0);
    }

    #[test]
    fn test_json_export_shape() {
        let catalog = Catalog::from_yaml(
            "tools:\n  - name: Grants\n    id: grants\n    tags:\n      objectives: [boost_rd]\n",
            "objectives:\n  - name: Boost R&D\n    tag: boost_rd\n    description: d\n",
        )
        .unwrap();
        let json = RelationGraph::build(&catalog).to_json();

        assert_eq!(json["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(json["links"].as_array().unwrap().len(), 1);
        assert_eq!(json["nodes"][0]["type"], "tool");
        assert_eq!(json["links"][0]["source"], "grants");
        assert_eq!(json["links"][0]["target"], "boost_rd");
    }

    #[test]
    fn test_dot_export_contains_nodes_and_edges() {
        let catalog = Catalog::from_yaml(
            "tools:\n  - name: Grants\n    id: grants\n    tags:\n      objectives: [boost_rd]\n",
            "objectives:\n  - name: Boost R&D\n    tag: boost_rd\n    description: d\n",
        )
        .unwrap();
        let dot = RelationGraph::build(&catalog).to_dot();

        assert!(dot.starts_with("graph PolicyNetwork"));
        assert!(dot.contains("\"grants\" [label=\"Grants\""));
        assert!(dot.contains("\"grants\" -- \"boost_rd\";"));
    }
}
