use log::{info, warn};

use crate::error::DiagramError;
use crate::graph::{DotSerializer, GraphDescription};
use crate::render::{ImageFormat, OutputLocation, OutputSink, RenderEngine, RenderResult};

/// Serializes a graph, hands it to the engine and writes the outcome.
///
/// Construction errors and sink errors are returned; engine errors never are.
/// When the engine fails the exact DOT text that was sent to it is written to
/// the `.source` path instead.
pub struct RenderPipeline<E, S> {
    engine: E,
    sink: S,
    location: OutputLocation,
    format: ImageFormat,
    serializer: DotSerializer,
}

impl<E: RenderEngine, S: OutputSink> RenderPipeline<E, S> {
    pub fn new(engine: E, sink: S, location: OutputLocation) -> Self {
        Self {
            engine,
            sink,
            location,
            format: ImageFormat::default(),
            serializer: DotSerializer::new(),
        }
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn location(&self) -> &OutputLocation {
        &self.location
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Render `graph` under the logical diagram `name`
    pub fn render(
        &self,
        graph: &GraphDescription,
        name: &str,
    ) -> Result<RenderResult, DiagramError> {
        let source = self.serializer.serialize(graph)?;

        let image_path = self.location.image_path(name, self.format)?;
        let source_path = self.location.source_path(name)?;
        self.sink.create_dir_all(self.location.dir())?;

        match self.engine.render(&source, self.format) {
            Ok(bytes) => {
                self.sink.write(&image_path, &bytes)?;
                info!(
                    diagram = name,
                    path:% = image_path.display(),
                    bytes = bytes.len();
                    "Diagram rendered"
                );
                Ok(RenderResult::Rendered { path: image_path })
            }
            Err(cause) => {
                warn!(
                    diagram = name,
                    engine = self.engine.name(),
                    cause:% = cause;
                    "Rendering failed, saving DOT source instead"
                );
                self.sink.write(&source_path, source.as_bytes())?;
                Ok(RenderResult::SourceOnly {
                    path: source_path,
                    cause,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::error::{EngineError, GraphError, SinkError};
    use crate::graph::{Edge, Node};
    use crate::render::MemorySink;

    struct FixedEngine(Vec<u8>);

    impl RenderEngine for FixedEngine {
        fn name(&self) -> &str {
            "fixed"
        }

        fn render(&self, _source: &str, _format: ImageFormat) -> Result<Vec<u8>, EngineError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenEngine;

    impl RenderEngine for BrokenEngine {
        fn name(&self) -> &str {
            "broken"
        }

        fn render(&self, _source: &str, format: ImageFormat) -> Result<Vec<u8>, EngineError> {
            Err(EngineError::UnsupportedFormat {
                program: "broken".to_string(),
                format: format.to_string(),
            })
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
    fn test_rendered_artifact_written() {
        let pipeline = RenderPipeline::new(
            FixedEngine(b"\x89PNG".to_vec()),
            MemorySink::new(),
            OutputLocation::new("out"),
        );

        let result = pipeline.render(&demo_graph(), "demo").unwrap();
        assert!(result.is_rendered());
        assert_eq!(result.path(), Path::new("out/demo.png"));
        assert_eq!(
            pipeline.sink().contents(Path::new("out/demo.png")),
            Some(b"\x89PNG".to_vec())
        );
        assert_eq!(pipeline.sink().paths(), vec![PathBuf::from("out/demo.png")]);
    }

    #[test]
    fn test_format_selects_extension() {
        let pipeline = RenderPipeline::new(
            FixedEngine(b"<svg/>".to_vec()),
            MemorySink::new(),
            OutputLocation::new("out"),
        )
        .with_format(ImageFormat::Svg);

        let result = pipeline.render(&demo_graph(), "demo").unwrap();
        assert_eq!(result.path(), Path::new("out/demo.svg"));
    }

    #[test]
    fn test_engine_failure_falls_back_to_source() {
        let pipeline =
            RenderPipeline::new(BrokenEngine, MemorySink::new(), OutputLocation::new("out"));
        let graph = demo_graph();

        let result = pipeline.render(&graph, "demo").unwrap();
        match &result {
            RenderResult::SourceOnly { path, cause } => {
                assert_eq!(path, Path::new("out/demo.source"));
                assert!(matches!(cause, EngineError::UnsupportedFormat { .. }));
            }
            RenderResult::Rendered { .. } => panic!("expected source-only result"),
        }

        let expected = DotSerializer::new().serialize(&graph).unwrap();
        assert_eq!(
            pipeline
                .sink()
                .contents_string(Path::new("out/demo.source"))
                .as_deref(),
            Some(expected.as_str())
        );
    }

    #[test]
    fn test_invalid_graph_never_reaches_engine_or_sink() {
        let mut graph = GraphDescription::new("broken");
        graph
            .add_cluster(crate::graph::Cluster::new("com").with_child("missing"))
            .unwrap();
        let pipeline = RenderPipeline::new(
            FixedEngine(Vec::new()),
            MemorySink::new(),
            OutputLocation::new("out"),
        );

        let err = pipeline.render(&graph, "broken").unwrap_err();
        assert!(matches!(
            err,
            DiagramError::Graph(GraphError::UnknownMember { .. })
        ));
        assert!(!pipeline.sink().has_dir(Path::new("out")));
    }

    #[test]
    fn test_sink_failure_is_reported() {
        let pipeline = RenderPipeline::new(
            FixedEngine(b"png".to_vec()),
            MemorySink::read_only(),
            OutputLocation::new("out"),
        );

        let err = pipeline.render(&demo_graph(), "demo").unwrap_err();
        assert!(matches!(
            err,
            DiagramError::Sink(SinkError::CreateDir { .. })
        ));
    }
}
