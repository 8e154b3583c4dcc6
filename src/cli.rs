use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::common::DefinitionArgs;
use crate::render::ImageFormat;

#[derive(Parser, Debug)]
#[command(
    name = "archdiagrams",
    about = "📐 Generate architecture diagrams with Graphviz",
    long_about = "archdiagrams builds use-case, class, deployment and package diagrams from \
                  declarative definitions and renders them with Graphviz. When Graphviz is not \
                  available the DOT source of each diagram is saved instead, so a run never \
                  loses its output.",
    version
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        default_value = crate::constants::logging::DEFAULT_LEVEL,
        env = "ARCHDIAGRAMS_LOG_LEVEL"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render diagrams to images
    ///
    /// Builds every selected diagram and renders it with the Graphviz engine.
    /// Diagrams that cannot be rendered have their DOT source saved next to
    /// where the image would have gone.
    #[command(
        long_about = "Render the selected diagrams (all of them by default) into the output \
                      directory as <name>.<format>. If the rendering engine is missing or \
                      fails, the DOT description is written to <name>.source instead and the \
                      run carries on. Existing files are overwritten."
    )]
    Generate {
        /// Diagrams to generate (all if none given)
        #[arg(value_name = "NAME")]
        names: Vec<String>,

        #[command(flatten)]
        definitions: DefinitionArgs,

        /// Directory the artifacts are written to
        #[arg(
            short,
            long,
            value_name = "DIR",
            default_value = crate::constants::output::DEFAULT_DIR,
            env = "ARCHDIAGRAMS_OUTPUT_DIR"
        )]
        output_dir: PathBuf,

        /// Image format requested from the engine
        #[arg(
            short,
            long,
            value_enum,
            default_value = crate::constants::output::DEFAULT_FORMAT,
            env = "ARCHDIAGRAMS_FORMAT"
        )]
        format: ImageFormat,

        /// Graphviz executable used for rendering
        #[arg(
            long,
            value_name = "PROGRAM",
            default_value = crate::constants::engine::DEFAULT_PROGRAM,
            env = "ARCHDIAGRAMS_ENGINE"
        )]
        engine: PathBuf,

        /// Format of the summary printed at the end of the run
        #[arg(
            long,
            value_enum,
            default_value = crate::constants::output::DEFAULT_REPORT,
            env = "ARCHDIAGRAMS_REPORT"
        )]
        report: ReportFormat,
    },

    /// Print the DOT source of one diagram
    Source {
        /// Diagram to print
        #[arg(value_name = "NAME")]
        name: String,

        #[command(flatten)]
        definitions: DefinitionArgs,
    },

    /// List the available diagrams
    List {
        #[command(flatten)]
        definitions: DefinitionArgs,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, clap::ValueEnum)]
pub enum ReportFormat {
    Human,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["archdiagrams", "generate"]).unwrap();

        match cli.command {
            Commands::Generate {
                names,
                output_dir,
                format,
                engine,
                report,
                ..
            } => {
                assert!(names.is_empty());
                assert_eq!(output_dir, PathBuf::from("docs/diagrams"));
                assert_eq!(format, ImageFormat::Png);
                assert_eq!(engine, PathBuf::from("dot"));
                assert_eq!(report, ReportFormat::Human);
            }
            _ => panic!("Expected Generate command"),
        }
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_generate_with_options() {
        let cli = Cli::try_parse_from([
            "archdiagrams",
            "generate",
            "classes",
            "packages",
            "--format",
            "svg",
            "-o",
            "out",
            "--definitions",
            "defs",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate {
                names,
                output_dir,
                format,
                definitions,
                ..
            } => {
                assert_eq!(names, vec!["classes", "packages"]);
                assert_eq!(output_dir, PathBuf::from("out"));
                assert_eq!(format, ImageFormat::Svg);
                assert_eq!(definitions.paths, vec![PathBuf::from("defs")]);
            }
            _ => panic!("Expected Generate command"),
        }
    }
}
