//! Source command implementation

use miette::{Result, WrapErr};

use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::SourceConfig;
use crate::error::DiagramError;

impl FromCommand for SourceConfig {
    fn from_command(command: Commands) -> Result<Self, DiagramError> {
        match command {
            Commands::Source { name, definitions } => SourceConfig::builder()
                .with_name(name)
                .with_definition_paths(definitions.get_paths())
                .build(),
            _ => Err(DiagramError::ConfigurationError {
                message: "Invalid command type for SourceConfig".to_string(),
            }),
        }
    }
}

crate::impl_try_from_command!(SourceConfig);

/// Execute the source command
pub fn execute_source_command(command: Commands) -> Result<()> {
    let config = SourceConfig::from_command(command)
        .wrap_err("Failed to parse source command configuration")?;

    use crate::executors::CommandExecutor;
    use crate::executors::source::SourceExecutor;
    SourceExecutor::execute(config)
}
