//! Configuration constants for archdiagrams
//!
//! Defaults used by the CLI when no flag or environment variable overrides
//! them.

/// Output location configuration
pub mod output {
    /// Directory diagrams are written to when none is given
    pub const DEFAULT_DIR: &str = "docs/diagrams";

    /// Extension of the DOT text written when rendering fails
    pub const SOURCE_EXTENSION: &str = "source";

    /// Default image format when not specified
    pub const DEFAULT_FORMAT: &str = "png";

    /// Default report format when not specified
    pub const DEFAULT_REPORT: &str = "human";
}

/// Rendering engine configuration
pub mod engine {
    /// Graphviz executable looked up on `PATH`
    pub const DEFAULT_PROGRAM: &str = "dot";
}

pub mod logging {
    pub const DEFAULT_LEVEL: &str = "warn";
}

/// Definition discovery configuration
pub mod definitions {
    /// Pattern matched inside directories passed as definition paths
    pub const FILE_PATTERN: &str = "*.toml";
}
