//! Command implementations for the archdiagrams CLI
//!
//! This module contains the implementations for each CLI command:
//! - generate: Render diagrams, saving DOT sources when rendering fails
//! - source: Print the DOT source of a single diagram
//! - list: Show the diagrams that can be generated

pub mod generate;
pub mod list;
pub mod source;

use miette::Result;

use crate::cli::Commands;

/// Execute a command based on CLI input
pub fn execute_command(command: Commands) -> Result<()> {
    match &command {
        Commands::Generate { .. } => generate::execute_generate_command(command),
        Commands::Source { .. } => source::execute_source_command(command),
        Commands::List { .. } => list::execute_list_command(command),
    }
}
