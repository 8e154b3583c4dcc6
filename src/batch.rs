//! Generation of several diagrams in one run
//!
//! Each diagram is built and rendered on its own; a failure is recorded in
//! its [`DiagramOutcome`] and the batch moves on to the next one.

use std::path::PathBuf;

use log::{error, info};
use serde::Serialize;

use crate::definitions::DiagramDefinition;
use crate::error::DiagramError;
use crate::render::{OutputSink, RenderEngine, RenderPipeline, RenderResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Rendered { path: PathBuf },
    SourceOnly { path: PathBuf, cause: String },
    BuildFailed { error: String },
    SinkFailed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramOutcome {
    pub name: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl DiagramOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(
            self.status,
            OutcomeStatus::BuildFailed { .. } | OutcomeStatus::SinkFailed { .. }
        )
    }

    fn from_render(name: &str, result: Result<RenderResult, DiagramError>) -> Self {
        let status = match result {
            Ok(RenderResult::Rendered { path }) => OutcomeStatus::Rendered { path },
            Ok(RenderResult::SourceOnly { path, cause }) => OutcomeStatus::SourceOnly {
                path,
                cause: cause.to_string(),
            },
            Err(DiagramError::Sink(err)) => OutcomeStatus::SinkFailed {
                error: err.to_string(),
            },
            Err(err) => OutcomeStatus::BuildFailed {
                error: err.to_string(),
            },
        };

        Self {
            name: name.to_string(),
            status,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    outcomes: Vec<DiagramOutcome>,
}

impl BatchReport {
    pub fn outcomes(&self) -> &[DiagramOutcome] {
        &self.outcomes
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn rendered_count(&self) -> usize {
        self.count(|status| matches!(status, OutcomeStatus::Rendered { .. }))
    }

    pub fn source_only_count(&self) -> usize {
        self.count(|status| matches!(status, OutcomeStatus::SourceOnly { .. }))
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_failure())
            .count()
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    fn count(&self, predicate: impl Fn(&OutcomeStatus) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.status))
            .count()
    }
}

/// Build and render every definition in order.
///
/// `on_outcome` is called as soon as each diagram is done, so status can be
/// reported while the batch is still running.
pub fn run_batch<E, S>(
    definitions: &[DiagramDefinition],
    pipeline: &RenderPipeline<E, S>,
    mut on_outcome: impl FnMut(&DiagramOutcome),
) -> BatchReport
where
    E: RenderEngine,
    S: OutputSink,
{
    let mut report = BatchReport::default();

    for definition in definitions {
        info!(diagram = definition.name.as_str(); "Generating diagram");

        let outcome = match definition.build() {
            Ok(graph) => DiagramOutcome::from_render(
                &definition.name,
                pipeline.render(&graph, &definition.name),
            ),
            Err(err) => DiagramOutcome {
                name: definition.name.clone(),
                status: OutcomeStatus::BuildFailed {
                    error: err.to_string(),
                },
            },
        };

        if outcome.is_failure() {
            error!(diagram = definition.name.as_str(); "Diagram could not be generated");
        }

        on_outcome(&outcome);
        report.outcomes.push(outcome);
    }

    report
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::definitions::parse_definition;
    use crate::error::EngineError;
    use crate::render::{ImageFormat, MemorySink, OutputLocation};

    struct EchoEngine;

    impl RenderEngine for EchoEngine {
        fn name(&self) -> &str {
            "echo"
        }

        fn render(&self, source: &str, _format: ImageFormat) -> Result<Vec<u8>, EngineError> {
            Ok(source.as_bytes().to_vec())
        }
    }

    fn definitions() -> Vec<DiagramDefinition> {
        [
            "name = \"first\"\n[[nodes]]\nid = \"A\"\n",
            "name = \"broken\"\n[[edges]]\nfrom = \"A\"\nto = \"B\"\n",
            "name = \"../escape\"\n[[nodes]]\nid = \"A\"\n",
            "name = \"last\"\n[[nodes]]\nid = \"Z\"\n",
        ]
        .iter()
        .map(|source| parse_definition(source, "inline.toml").unwrap())
        .collect()
    }

    #[test]
    fn test_failures_are_isolated_per_diagram() {
        let pipeline =
            RenderPipeline::new(EchoEngine, MemorySink::new(), OutputLocation::new("out"));
        let mut seen = Vec::new();

        let report = run_batch(&definitions(), &pipeline, |outcome| {
            seen.push(outcome.name.clone())
        });

        assert_eq!(seen, vec!["first", "broken", "../escape", "last"]);
        assert_eq!(report.total(), 4);
        assert_eq!(report.rendered_count(), 2);
        assert_eq!(report.failure_count(), 2);
        assert!(matches!(
            report.outcomes()[1].status,
            OutcomeStatus::BuildFailed { .. }
        ));
        assert!(matches!(
            report.outcomes()[2].status,
            OutcomeStatus::SinkFailed { .. }
        ));
        assert!(pipeline.sink().contents(Path::new("out/last.png")).is_some());
    }

    #[test]
    fn test_unwritable_sink_fails_every_diagram_without_panicking() {
        let pipeline = RenderPipeline::new(
            EchoEngine,
            MemorySink::read_only(),
            OutputLocation::new("out"),
        );

        let report = run_batch(&definitions()[..1], &pipeline, |_| {});
        assert_eq!(report.failure_count(), 1);
        assert!(report.has_failures());
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = DiagramOutcome {
            name: "classes".to_string(),
            status: OutcomeStatus::Rendered {
                path: PathBuf::from("docs/diagrams/classes.png"),
            },
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "classes",
                "status": "rendered",
                "path": "docs/diagrams/classes.png",
            })
        );
    }
}
