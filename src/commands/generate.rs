//! Generate command implementation

use miette::{Result, WrapErr};

use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::GenerateConfig;
use crate::error::DiagramError;

impl FromCommand for GenerateConfig {
    fn from_command(command: Commands) -> Result<Self, DiagramError> {
        match command {
            Commands::Generate {
                names,
                definitions,
                output_dir,
                format,
                engine,
                report,
            } => GenerateConfig::builder()
                .with_names(names)
                .with_definition_paths(definitions.get_paths())
                .with_output_dir(output_dir)
                .with_format(format)
                .with_engine(engine)
                .with_report(report)
                .build(),
            _ => Err(DiagramError::ConfigurationError {
                message: "Invalid command type for GenerateConfig".to_string(),
            }),
        }
    }
}

crate::impl_try_from_command!(GenerateConfig);

/// Execute the generate command
pub fn execute_generate_command(command: Commands) -> Result<()> {
    let config = GenerateConfig::from_command(command)
        .wrap_err("Failed to parse generate command configuration")?;

    use crate::executors::CommandExecutor;
    use crate::executors::generate::GenerateExecutor;
    GenerateExecutor::execute(config)
}
