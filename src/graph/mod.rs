//! # Graph Description Module
//!
//! This module holds the in-memory model of a diagram and its serialization
//! to Graphviz DOT.
//!
//! ## Components
//!
//! ### Model
//! - **GraphDescription**: append-only container of nodes, edges and clusters
//!   that validates every declaration as it is made
//! - **Node**, **Edge**, **Cluster**: the declared elements and their visual
//!   attributes
//!
//! ### Serialization
//! - **DotSerializer**: deterministic DOT output, nodes first, then clusters,
//!   then edges
//!
//! ## Example
//!
//! ```
//! use archdiagrams::graph::{Cluster, DotSerializer, Edge, GraphDescription, Node, Shape};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut graph = GraphDescription::new("demo");
//!
//! graph.add_node(Node::new("App").with_shape(Shape::Component))?;
//! graph.add_cluster(Cluster::new("core").with_label("core"))?;
//! graph.add_node_in("core", Node::new("Engine"))?;
//! graph.add_edge(Edge::new("App", "Engine").with_label("uses"))?;
//!
//! let dot = DotSerializer::new().serialize(&graph)?;
//! assert!(dot.contains("subgraph \"cluster_core\""));
//! assert!(dot.contains("\"App\" -> \"Engine\" [label=\"uses\"];"));
//! # Ok(())
//! # }
//! ```

mod description;
mod serializer;
mod types;

pub use description::{GraphDescription, SCOPE_SEPARATOR};
pub use serializer::DotSerializer;
pub use types::{
    Attributes, Cluster, ClusterHandle, Direction, Edge, EdgeDirection, EdgeHandle, EdgeStyle,
    Element, Label, Node, NodeHandle, Shape,
};
