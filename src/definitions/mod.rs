//! # Diagram Definitions
//!
//! A diagram is described as data: a [`DiagramDefinition`] lists clusters,
//! nodes and edges as plain records and [`DiagramDefinition::build`] replays
//! them against a [`GraphDescription`], so all validation stays in the model.
//!
//! Definitions are usually written in TOML:
//!
//! ```
//! use archdiagrams::definitions::parse_definition;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let definition = parse_definition(
//!     r#"
//! name = "demo"
//! direction = "left-to-right"
//!
//! [[nodes]]
//! id = "A"
//!
//! [[nodes]]
//! id = "B"
//!
//! [[edges]]
//! from = "A"
//! to = "B"
//! label = "uses"
//! "#,
//!     "demo.toml",
//! )?;
//!
//! let graph = definition.build()?;
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! # Ok(())
//! # }
//! ```

mod loader;

use serde::Deserialize;

pub use loader::{builtin_definitions, load_definitions, parse_definition, select_definitions};

use crate::error::GraphError;
use crate::graph::{
    Attributes, Cluster, Direction, Edge, EdgeDirection, EdgeStyle, Element, GraphDescription,
    Label, Node, Shape,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagramDefinition {
    /// Logical name, also the artifact file stem
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub direction: Direction,
    /// Graph-level attributes such as `splines` or `nodesep`
    #[serde(default)]
    pub graph: Attributes,
    #[serde(default)]
    pub node_defaults: Attributes,
    #[serde(default)]
    pub edge_defaults: Attributes,
    #[serde(default)]
    pub clusters: Vec<ClusterRecord>,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterRecord {
    pub id: String,
    #[serde(default)]
    pub label: Option<Label>,
    /// Members in emission order: nested cluster ids and node ids. Nodes may
    /// also name their cluster themselves
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeRecord {
    pub id: String,
    #[serde(default)]
    pub label: Option<Label>,
    #[serde(default)]
    pub shape: Option<Shape>,
    #[serde(default)]
    pub cluster: Option<String>,
    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub label: Option<Label>,
    #[serde(default)]
    pub style: EdgeStyle,
    #[serde(default)]
    pub direction: EdgeDirection,
    #[serde(default)]
    pub attributes: Attributes,
}

impl DiagramDefinition {
    /// Replay the records against a fresh graph description.
    ///
    /// Clusters go first so nodes can be placed in them, then nodes, then
    /// edges. A node listed in a cluster's `children` lands in that cluster at
    /// the listed position. The first invalid record aborts the build.
    pub fn build(&self) -> Result<GraphDescription, GraphError> {
        let mut graph = GraphDescription::new(&self.name).with_direction(self.direction);
        if let Some(title) = &self.title {
            graph = graph.with_title(title);
        }

        for (key, value) in &self.graph {
            graph.set_attribute(Element::Graph, key, value)?;
        }
        for (key, value) in &self.node_defaults {
            graph.set_attribute(Element::NodeDefaults, key, value)?;
        }
        for (key, value) in &self.edge_defaults {
            graph.set_attribute(Element::EdgeDefaults, key, value)?;
        }

        for record in &self.clusters {
            let mut cluster = Cluster::new(&record.id).with_children(&record.children);
            cluster.label = record.label.clone();
            cluster.attributes = record.attributes.clone();
            graph.add_cluster(cluster)?;
        }

        for record in &self.nodes {
            let mut node = Node::new(&record.id);
            if let Some(label) = &record.label {
                node = node.with_label(label.clone());
            }
            node.shape = record.shape;
            node.attributes = record.attributes.clone();

            match &record.cluster {
                Some(cluster) => graph.add_node_in(cluster, node)?,
                None => graph.add_node(node)?,
            };
        }

        for record in &self.edges {
            let mut edge = Edge::new(&record.from, &record.to)
                .with_style(record.style)
                .with_direction(record.direction);
            edge.label = record.label.clone();
            edge.attributes = record.attributes.clone();
            graph.add_edge(edge)?;
        }

        Ok(graph)
    }
}
