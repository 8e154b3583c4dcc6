//! # archdiagrams - Architecture Diagrams as Data
//!
//! archdiagrams builds graph descriptions (nodes, edges and nested clusters
//! carrying visual attributes) and renders them with Graphviz. When the
//! engine is missing or fails, the DOT source is written next to where the
//! image would have gone, so a run never loses its output.
//!
//! ## Main Components
//!
//! - **Graph**: The [`GraphDescription`](graph::GraphDescription) model and
//!   its DOT serializer
//! - **Render**: Engines, output sinks and the render-or-fallback pipeline
//! - **Definitions**: Diagrams described in TOML, including the four
//!   built-in architecture views
//! - **Batch**: Per-diagram failure isolation for multi-diagram runs
//! - **Reports**: Human-readable and JSON summaries of a run
//!
//! ## Usage
//!
//! ```
//! use archdiagrams::graph::{Cluster, Edge, GraphDescription, Node, Shape};
//! use archdiagrams::render::{
//!     ImageFormat, MemorySink, OutputLocation, RenderPipeline, RenderResult,
//! };
//! use archdiagrams::render::GraphvizEngine;
//!
//! # fn main() -> miette::Result<()> {
//! let mut graph = GraphDescription::new("deployment");
//! graph.add_node(Node::new("App").with_shape(Shape::Component))?;
//! graph.add_node(Node::new("DB").with_shape(Shape::Cylinder))?;
//! graph.add_cluster(Cluster::new("server").with_label("Servidor").with_child("DB"))?;
//! graph.add_edge(Edge::new("App", "DB").with_label("JDBC"))?;
//!
//! // An engine that cannot be started falls back to the DOT source
//! let pipeline = RenderPipeline::new(
//!     GraphvizEngine::new("/nonexistent/dot"),
//!     MemorySink::new(),
//!     OutputLocation::new("docs/diagrams"),
//! )
//! .with_format(ImageFormat::Svg);
//!
//! let result = pipeline.render(&graph, "deployment")?;
//! assert!(matches!(result, RenderResult::SourceOnly { .. }));
//! assert_eq!(
//!     result.path(),
//!     std::path::Path::new("docs/diagrams/deployment.source")
//! );
//! # Ok(())
//! # }
//! ```

// Private modules
mod constants;
mod utils;

// Public modules
pub mod batch;
pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod definitions;
pub mod error;
pub mod executors;
pub mod graph;
pub mod render;
pub mod reports;

pub use common::ConfigBuilder;

/// Main entry point for the library
pub fn run(cli: cli::Cli) -> miette::Result<()> {
    commands::execute_command(cli.command)
}
