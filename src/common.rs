//! Common functionality shared across commands

use std::path::PathBuf;

use clap::Args;

use crate::definitions::{DiagramDefinition, builtin_definitions, load_definitions};
use crate::error::DefinitionError;

/// Where diagram definitions are read from
#[derive(Args, Debug, Clone, Default)]
pub struct DefinitionArgs {
    /// Definition files or directories of `*.toml` files (built-in diagrams
    /// if not specified)
    #[arg(
        long = "definitions",
        value_name = "PATH",
        env = "ARCHDIAGRAMS_DEFINITIONS",
        value_delimiter = ','
    )]
    pub paths: Vec<PathBuf>,
}

impl DefinitionArgs {
    /// Get paths; empty means the built-in definitions
    pub fn get_paths(&self) -> Vec<PathBuf> {
        self.paths.clone()
    }
}

/// Load definitions from `paths`, or the built-in set when empty
pub fn resolve_definitions(paths: &[PathBuf]) -> Result<Vec<DiagramDefinition>, DefinitionError> {
    if paths.is_empty() {
        builtin_definitions()
    } else {
        load_definitions(paths)
    }
}

/// Generic builder trait for configuration objects
pub trait ConfigBuilder: Sized {
    type Config;

    /// Build the configuration, returning an error if validation fails
    fn build(self) -> Result<Self::Config, crate::error::DiagramError>;
}

/// Trait for configurations that can be created from CLI commands
/// This trait simplifies command-to-config conversions
pub trait FromCommand: Sized {
    /// The command variant that this config can be created from
    fn from_command(command: crate::cli::Commands) -> Result<Self, crate::error::DiagramError>;
}

/// Macro to implement `TryFrom<Commands>` using [`FromCommand`] trait
#[macro_export]
macro_rules! impl_try_from_command {
    ($config:ty) => {
        impl std::convert::TryFrom<$crate::cli::Commands> for $config {
            type Error = $crate::error::DiagramError;

            fn try_from(command: $crate::cli::Commands) -> Result<Self, Self::Error> {
                <$config as $crate::common::FromCommand>::from_command(command)
            }
        }
    };
}

/// Error for a builder field that was never set
pub(crate) fn missing_field(field: &str) -> crate::error::DiagramError {
    crate::error::DiagramError::ConfigurationError {
        message: format!("Missing required field: {field}"),
    }
}
