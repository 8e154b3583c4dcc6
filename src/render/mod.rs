//! # Render Pipeline Module
//!
//! Turns a finished [`GraphDescription`](crate::graph::GraphDescription) into
//! an image through an external engine, falling back to the DOT text when the
//! engine cannot produce one.
//!
//! - **RenderEngine** / **GraphvizEngine**: the external engine capability
//! - **OutputSink** / **FsSink** / **MemorySink**: where artifacts are written
//! - **OutputLocation**: maps a diagram name to its artifact paths
//! - **RenderPipeline**: serialize, invoke, write, fall back

mod engine;
mod pipeline;
mod sink;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub use engine::{GraphvizEngine, RenderEngine};
pub use pipeline::RenderPipeline;
pub use sink::{FsSink, MemorySink, OutputLocation, OutputSink};

use crate::error::EngineError;

/// Raster or vector format requested from the engine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
    Pdf,
    Jpg,
    Gif,
}

impl ImageFormat {
    /// Graphviz `-T` argument and file extension
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
            ImageFormat::Pdf => "pdf",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Gif => "gif",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of rendering one diagram
#[derive(Debug)]
pub enum RenderResult {
    /// The engine produced an image, written at `path`
    Rendered { path: PathBuf },
    /// The engine failed; the DOT text was written at `path` instead
    SourceOnly { path: PathBuf, cause: EngineError },
}

impl RenderResult {
    pub fn path(&self) -> &Path {
        match self {
            RenderResult::Rendered { path } | RenderResult::SourceOnly { path, .. } => path,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, RenderResult::Rendered { .. })
    }

    pub fn cause(&self) -> Option<&EngineError> {
        match self {
            RenderResult::Rendered { .. } => None,
            RenderResult::SourceOnly { cause, .. } => Some(cause),
        }
    }
}

impl fmt::Display for RenderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderResult::Rendered { path } => {
                write!(f, "Diagram generated at {}", path.display())
            }
            RenderResult::SourceOnly { path, cause } => write!(
                f,
                "Rendering failed ({cause}); DOT source saved at {}",
                path.display()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_result_accessors() {
        let rendered = RenderResult::Rendered {
            path: PathBuf::from("out/demo.png"),
        };
        assert!(rendered.is_rendered());
        assert!(rendered.cause().is_none());
        assert_eq!(rendered.to_string(), "Diagram generated at out/demo.png");

        let fallback = RenderResult::SourceOnly {
            path: PathBuf::from("out/demo.source"),
            cause: EngineError::EmptyOutput {
                program: "dot".to_string(),
            },
        };
        assert!(!fallback.is_rendered());
        assert_eq!(fallback.path(), Path::new("out/demo.source"));
        assert_eq!(
            fallback.to_string(),
            "Rendering failed (Rendering engine 'dot' produced no output); DOT source saved at \
             out/demo.source"
        );
    }

    #[test]
    fn test_image_format_extension() {
        assert_eq!(ImageFormat::default(), ImageFormat::Png);
        assert_eq!(ImageFormat::Svg.as_str(), "svg");
        assert_eq!(ImageFormat::Jpg.to_string(), "jpg");
    }
}
