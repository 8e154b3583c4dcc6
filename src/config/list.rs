//! List command configuration

use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct ListConfig {
    pub definition_paths: Vec<PathBuf>,
}

impl ListConfig {
    pub fn builder() -> ListConfigBuilder {
        ListConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct ListConfigBuilder {
    definition_paths: Option<Vec<PathBuf>>,
}

impl ListConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_definition_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.definition_paths = Some(paths);
        self
    }
}

impl crate::common::ConfigBuilder for ListConfigBuilder {
    type Config = ListConfig;

    fn build(self) -> Result<Self::Config, crate::error::DiagramError> {
        Ok(ListConfig {
            definition_paths: self.definition_paths.unwrap_or_default(),
        })
    }
}
