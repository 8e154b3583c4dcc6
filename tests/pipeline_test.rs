//! End-to-end tests for building, serializing and rendering descriptions

use std::fs;
use std::path::Path;

use archdiagrams::error::{DiagramError, EngineError, GraphError};
use archdiagrams::graph::{Cluster, DotSerializer, Edge, GraphDescription, Node};
use archdiagrams::render::{
    FsSink, GraphvizEngine, ImageFormat, MemorySink, OutputLocation, RenderEngine,
    RenderPipeline, RenderResult,
};
use pretty_assertions::assert_eq;

/// Engine that returns a fixed image
struct StubEngine;

impl RenderEngine for StubEngine {
    fn name(&self) -> &str {
        "stub"
    }

    fn render(&self, _source: &str, _format: ImageFormat) -> Result<Vec<u8>, EngineError> {
        Ok(b"\x89PNG stub".to_vec())
    }
}

fn demo_graph() -> GraphDescription {
    let mut graph = GraphDescription::new("demo");
    graph.add_node(Node::new("A")).unwrap();
    graph.add_node(Node::new("B")).unwrap();
    graph
        .add_edge(Edge::new("A", "B").with_label("uses"))
        .unwrap();
    graph
}

#[test]
fn test_working_engine_produces_image() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path().join("diagrams");
    let pipeline = RenderPipeline::new(StubEngine, FsSink, OutputLocation::new(&dir));

    let result = pipeline.render(&demo_graph(), "demo").unwrap();

    assert!(matches!(result, RenderResult::Rendered { .. }));
    assert_eq!(result.path(), dir.join("demo.png").as_path());
    assert_eq!(fs::read(dir.join("demo.png")).unwrap(), b"\x89PNG stub");
    assert!(!dir.join("demo.source").exists());
}

#[test]
fn test_missing_engine_saves_serialization() {
    let temp = tempfile::tempdir().unwrap();
    let pipeline = RenderPipeline::new(
        GraphvizEngine::new("/nonexistent/bin/dot"),
        FsSink,
        OutputLocation::new(temp.path()),
    );
    let graph = demo_graph();

    let result = pipeline.render(&graph, "demo").unwrap();

    let source_path = temp.path().join("demo.source");
    assert_eq!(result.path(), source_path.as_path());
    assert!(matches!(
        result.cause(),
        Some(EngineError::Unavailable { .. })
    ));
    assert_eq!(
        fs::read_to_string(&source_path).unwrap(),
        DotSerializer::new().serialize(&graph).unwrap()
    );
    assert!(!temp.path().join("demo.png").exists());
}

#[test]
fn test_demo_serialization() {
    let dot = DotSerializer::new().serialize(&demo_graph()).unwrap();

    assert_eq!(
        dot,
        r#"digraph "demo" {
    rankdir=TB;

    "A" [label="A"];
    "B" [label="B"];

    "A" -> "B" [label="uses"];
}
"#
    );
}

#[test]
fn test_cluster_cycle_rejected_and_graph_untouched() {
    let mut graph = GraphDescription::new("cyclic");
    graph.add_node(Node::new("A")).unwrap();
    graph
        .add_cluster(Cluster::new("C").with_child("A").with_child("D"))
        .unwrap();

    let err = graph
        .add_cluster(Cluster::new("D").with_child("C"))
        .unwrap_err();

    assert!(matches!(err, GraphError::Cycle { .. }));
    assert_eq!(graph.cluster_count(), 1);
}

#[test]
fn test_repeated_renders_are_identical() {
    let pipeline = RenderPipeline::new(
        GraphvizEngine::new("/nonexistent/bin/dot"),
        MemorySink::new(),
        OutputLocation::new("out"),
    );
    let graph = demo_graph();

    pipeline.render(&graph, "first").unwrap();
    pipeline.render(&graph, "second").unwrap();

    let first = pipeline.sink().contents(Path::new("out/first.source"));
    let second = pipeline.sink().contents(Path::new("out/second.source"));
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn test_invalid_name_writes_nothing() {
    let pipeline = RenderPipeline::new(StubEngine, MemorySink::new(), OutputLocation::new("out"));

    let err = pipeline.render(&demo_graph(), "nested/demo").unwrap_err();

    assert!(matches!(err, DiagramError::Sink(_)));
    assert!(pipeline.sink().paths().is_empty());
}
