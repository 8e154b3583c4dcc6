//! Generate command executor

use console::style;
use miette::{Result, WrapErr};

use crate::batch::run_batch;
use crate::cli::ReportFormat;
use crate::common::resolve_definitions;
use crate::config::GenerateConfig;
use crate::definitions::select_definitions;
use crate::error::DiagramError;
use crate::executors::CommandExecutor;
use crate::render::{FsSink, GraphvizEngine, OutputLocation, RenderPipeline};
use crate::reports::{HumanReportGenerator, JsonReportGenerator, ReportGenerator, status_line};
use crate::utils::string::pluralize;

pub struct GenerateExecutor;

impl CommandExecutor for GenerateExecutor {
    type Config = GenerateConfig;

    fn execute(config: Self::Config) -> Result<()> {
        let definitions = resolve_definitions(&config.definition_paths)
            .wrap_err("Failed to load diagram definitions")?;
        let definitions = select_definitions(definitions, &config.names)?;

        eprintln!(
            "{} Generating {} {} as {} into {}\n",
            style("📐").cyan(),
            style(definitions.len()).bold(),
            pluralize("diagram", definitions.len()),
            style(config.format).bold(),
            style(config.output_dir.display()).bold()
        );

        let pipeline = RenderPipeline::new(
            GraphvizEngine::new(&config.engine),
            FsSink,
            OutputLocation::new(&config.output_dir),
        )
        .with_format(config.format);

        let report = run_batch(&definitions, &pipeline, |outcome| {
            eprintln!("  {}", status_line(outcome));
        });

        let output = match config.report {
            ReportFormat::Human => HumanReportGenerator::new().generate_report(&report)?,
            ReportFormat::Json => JsonReportGenerator::new().generate_report(&report)?,
        };
        println!("{output}");

        if report.has_failures() {
            return Err(DiagramError::BatchFailed {
                failed: report.failure_count(),
                total: report.total(),
            }
            .into());
        }

        Ok(())
    }
}
