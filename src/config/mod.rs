//! # Configuration Module
//!
//! This module provides configuration structures for all archdiagrams
//! commands. Each command has its own config module with a builder.
//!
//! ## Command Configurations
//!
//! - **GenerateConfig**: Configuration for the `generate` command
//! - **SourceConfig**: Configuration for the `source` command
//! - **ListConfig**: Configuration for the `list` command
//!
//! ## Example
//!
//! ```
//! use archdiagrams::ConfigBuilder;
//! use archdiagrams::cli::ReportFormat;
//! use archdiagrams::config::GenerateConfig;
//! use archdiagrams::render::ImageFormat;
//!
//! let config = GenerateConfig::builder()
//!     .with_names(vec!["classes".to_string()])
//!     .with_definition_paths(vec![])
//!     .with_output_dir("docs/diagrams".into())
//!     .with_format(ImageFormat::Svg)
//!     .with_engine("dot".into())
//!     .with_report(ReportFormat::Human)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.format, ImageFormat::Svg);
//! ```

pub mod generate;
pub mod list;
pub mod source;

pub use generate::GenerateConfig;
pub use list::ListConfig;
pub use source::SourceConfig;
