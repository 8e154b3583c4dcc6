//! List command executor

use console::style;
use miette::{Result, WrapErr};

use crate::common::resolve_definitions;
use crate::config::ListConfig;
use crate::executors::CommandExecutor;
use crate::utils::string::pluralize;

pub struct ListExecutor;

impl CommandExecutor for ListExecutor {
    type Config = ListConfig;

    fn execute(config: Self::Config) -> Result<()> {
        let definitions = resolve_definitions(&config.definition_paths)
            .wrap_err("Failed to load diagram definitions")?;

        if definitions.is_empty() {
            eprintln!("{} No diagram definitions found", style("ℹ").blue());
            return Ok(());
        }

        for definition in &definitions {
            let title = definition.title.as_deref().unwrap_or_default();
            match definition.build() {
                Ok(graph) => println!(
                    "{} {} ({} {}, {} {}, {} {}) {}",
                    style("•").cyan(),
                    style(&definition.name).bold(),
                    graph.node_count(),
                    pluralize("node", graph.node_count()),
                    graph.edge_count(),
                    pluralize("edge", graph.edge_count()),
                    graph.cluster_count(),
                    pluralize("cluster", graph.cluster_count()),
                    style(title).dim()
                ),
                Err(err) => println!(
                    "{} {} {}",
                    style("✗").red(),
                    style(&definition.name).bold(),
                    style(format!("(invalid: {err})")).red()
                ),
            }
        }

        Ok(())
    }
}
