//! Source command configuration

use std::path::PathBuf;

use crate::common::missing_field;

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub name: String,
    pub definition_paths: Vec<PathBuf>,
}

impl SourceConfig {
    pub fn builder() -> SourceConfigBuilder {
        SourceConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct SourceConfigBuilder {
    name: Option<String>,
    definition_paths: Option<Vec<PathBuf>>,
}

impl SourceConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_definition_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.definition_paths = Some(paths);
        self
    }
}

impl crate::common::ConfigBuilder for SourceConfigBuilder {
    type Config = SourceConfig;

    fn build(self) -> Result<Self::Config, crate::error::DiagramError> {
        Ok(SourceConfig {
            name: self.name.ok_or_else(|| missing_field("name"))?,
            definition_paths: self.definition_paths.unwrap_or_default(),
        })
    }
}
