//! Human-readable console report generation

use std::fmt::Write;

use console::style;

use super::ReportGenerator;
use crate::batch::{BatchReport, DiagramOutcome, OutcomeStatus};
use crate::error::DiagramError;
use crate::utils::string::pluralize;

pub struct HumanReportGenerator;

impl Default for HumanReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanReportGenerator {
    pub fn new() -> Self {
        Self
    }
}

/// One line describing where a diagram ended up, or why it did not
pub fn status_line(outcome: &DiagramOutcome) -> String {
    match &outcome.status {
        OutcomeStatus::Rendered { path } => format!(
            "{} {} generated at {}",
            style("✓").green(),
            style(&outcome.name).bold(),
            style(path.display()).bold()
        ),
        OutcomeStatus::SourceOnly { path, cause } => format!(
            "{} {} could not be rendered ({}). DOT source saved at {}",
            style("⚠").yellow(),
            style(&outcome.name).bold(),
            cause,
            style(path.display()).bold()
        ),
        OutcomeStatus::BuildFailed { error } => format!(
            "{} {} has an invalid definition: {}",
            style("✗").red(),
            style(&outcome.name).bold(),
            error
        ),
        OutcomeStatus::SinkFailed { error } => format!(
            "{} {} could not be written: {}",
            style("✗").red(),
            style(&outcome.name).bold(),
            error
        ),
    }
}

impl ReportGenerator for HumanReportGenerator {
    fn generate_report(&self, report: &BatchReport) -> Result<String, DiagramError> {
        let mut output = String::new();

        if report.total() == 0 {
            writeln!(output, "{} No diagrams to generate", style("ℹ").blue())?;
            return Ok(output);
        }

        writeln!(
            output,
            "\n{} {} {}: {} rendered, {} source only, {} failed",
            style("📐").cyan(),
            style(report.total()).bold(),
            pluralize("diagram", report.total()),
            style(report.rendered_count()).green().bold(),
            style(report.source_only_count()).yellow().bold(),
            style(report.failure_count()).red().bold(),
        )?;

        if report.source_only_count() > 0 {
            writeln!(
                output,
                "\n{} Tip: install Graphviz (https://graphviz.org) and run again to render the \
                 saved sources",
                style("💡").yellow()
            )?;
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_status_lines_mention_paths_and_causes() {
        console::set_colors_enabled(false);

        let rendered = DiagramOutcome {
            name: "classes".to_string(),
            status: OutcomeStatus::Rendered {
                path: PathBuf::from("docs/diagrams/classes.png"),
            },
        };
        assert_eq!(
            status_line(&rendered),
            "✓ classes generated at docs/diagrams/classes.png"
        );

        let fallback = DiagramOutcome {
            name: "classes".to_string(),
            status: OutcomeStatus::SourceOnly {
                path: PathBuf::from("docs/diagrams/classes.source"),
                cause: "Rendering engine 'dot' is not available".to_string(),
            },
        };
        let line = status_line(&fallback);
        assert!(line.contains("Rendering engine 'dot' is not available"));
        assert!(line.ends_with("docs/diagrams/classes.source"));
    }

    #[test]
    fn test_empty_report() {
        console::set_colors_enabled(false);

        let output = HumanReportGenerator::new()
            .generate_report(&BatchReport::default())
            .unwrap();
        assert!(output.contains("No diagrams to generate"));
    }
}
