//! Generate command configuration

use std::path::PathBuf;

use crate::cli::ReportFormat;
use crate::common::missing_field;
use crate::render::ImageFormat;

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub names: Vec<String>,
    pub definition_paths: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub format: ImageFormat,
    pub engine: PathBuf,
    pub report: ReportFormat,
}

impl GenerateConfig {
    pub fn builder() -> GenerateConfigBuilder {
        GenerateConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct GenerateConfigBuilder {
    names: Option<Vec<String>>,
    definition_paths: Option<Vec<PathBuf>>,
    output_dir: Option<PathBuf>,
    format: Option<ImageFormat>,
    engine: Option<PathBuf>,
    report: Option<ReportFormat>,
}

impl GenerateConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.names = Some(names);
        self
    }

    pub fn with_definition_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.definition_paths = Some(paths);
        self
    }

    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = Some(output_dir);
        self
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_engine(mut self, engine: PathBuf) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn with_report(mut self, report: ReportFormat) -> Self {
        self.report = Some(report);
        self
    }
}

impl crate::common::ConfigBuilder for GenerateConfigBuilder {
    type Config = GenerateConfig;

    fn build(self) -> Result<Self::Config, crate::error::DiagramError> {
        Ok(GenerateConfig {
            names: self.names.unwrap_or_default(),
            definition_paths: self.definition_paths.unwrap_or_default(),
            output_dir: self.output_dir.ok_or_else(|| missing_field("output_dir"))?,
            format: self.format.unwrap_or_default(),
            engine: self.engine.ok_or_else(|| missing_field("engine"))?,
            report: self.report.ok_or_else(|| missing_field("report"))?,
        })
    }
}
