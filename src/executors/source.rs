//! Source command executor

use miette::{Result, WrapErr};

use crate::common::resolve_definitions;
use crate::config::SourceConfig;
use crate::definitions::select_definitions;
use crate::error::DefinitionError;
use crate::executors::CommandExecutor;
use crate::graph::DotSerializer;

pub struct SourceExecutor;

impl CommandExecutor for SourceExecutor {
    type Config = SourceConfig;

    fn execute(config: Self::Config) -> Result<()> {
        let definitions = resolve_definitions(&config.definition_paths)
            .wrap_err("Failed to load diagram definitions")?;
        let selected = select_definitions(definitions, std::slice::from_ref(&config.name))?;

        for definition in selected {
            let graph = definition
                .build()
                .map_err(|source| DefinitionError::Build {
                    name: definition.name.clone(),
                    source,
                })?;
            let dot = DotSerializer::new().serialize(&graph)?;
            print!("{dot}");
        }

        Ok(())
    }
}
