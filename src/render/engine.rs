use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use log::debug;

use crate::constants::engine::DEFAULT_PROGRAM;
use crate::error::EngineError;
use crate::render::ImageFormat;

/// Graphviz prints `Format: "x" not recognized` for an unknown `-T` value
const UNKNOWN_FORMAT_MARKER: &str = "not recognized";

/// Capability to lay out and rasterize DOT text.
///
/// Any failure, whatever its cause, is reported as an [`EngineError`] and
/// handled uniformly by the pipeline.
pub trait RenderEngine {
    /// Name used in log lines and error messages
    fn name(&self) -> &str;

    fn render(&self, source: &str, format: ImageFormat) -> Result<Vec<u8>, EngineError>;
}

/// Runs the Graphviz `dot` executable, feeding DOT on stdin and reading the
/// artifact from stdout
#[derive(Debug, Clone)]
pub struct GraphvizEngine {
    program: PathBuf,
    name: String,
}

impl Default for GraphvizEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl GraphvizEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        Self {
            name: program.display().to_string(),
            program,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl RenderEngine for GraphvizEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, source: &str, format: ImageFormat) -> Result<Vec<u8>, EngineError> {
        debug!(program = self.name.as_str(), format = format.as_str(); "Invoking rendering engine");

        let mut child = Command::new(&self.program)
            .arg(format!("-T{}", format.as_str()))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                    EngineError::Unavailable {
                        program: self.name.clone(),
                        source,
                    }
                }
                _ => EngineError::Invocation {
                    program: self.name.clone(),
                    source,
                },
            })?;

        // stdin is written concurrently while stdout and stderr are drained
        let (output, written) = thread::scope(|scope| {
            let writer = child
                .stdin
                .take()
                .map(|mut stdin| scope.spawn(move || stdin.write_all(source.as_bytes())));
            let output = child.wait_with_output();
            let written = match writer {
                Some(handle) => handle
                    .join()
                    .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked"))),
                None => Ok(()),
            };
            (output, written)
        });

        let output = output.map_err(|source| EngineError::Invocation {
            program: self.name.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.contains(UNKNOWN_FORMAT_MARKER) {
                return Err(EngineError::UnsupportedFormat {
                    program: self.name.clone(),
                    format: format.as_str().to_string(),
                });
            }
            return Err(EngineError::Failed {
                program: self.name.clone(),
                status: output.status.to_string(),
                stderr,
            });
        }

        // A closed stdin only matters if the engine also produced nothing
        match written {
            Err(source) if source.kind() != io::ErrorKind::BrokenPipe => {
                return Err(EngineError::Invocation {
                    program: self.name.clone(),
                    source,
                });
            }
            _ => {}
        }

        if output.stdout.is_empty() {
            return Err(EngineError::EmptyOutput {
                program: self.name.clone(),
            });
        }

        Ok(output.stdout)
    }
}
