use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
#[error("Invalid diagram definition in '{file}'")]
#[diagnostic(
    code(archdiagrams::definition_parse_error),
    help("Check the TOML syntax and field names near the highlighted position")
)]
pub struct DefinitionParseError {
    pub file: String,
    #[source_code]
    pub source_code: NamedSource<String>,
    #[label("problem here")]
    pub span: Option<SourceSpan>,
    #[source]
    pub source: toml::de::Error,
}

/// Errors raised while declaring the contents of a graph description.
///
/// These abort the build of the affected diagram; nothing is rendered.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Identifier '{id}' is already defined in {scope}")]
    #[diagnostic(
        code(archdiagrams::duplicate_id),
        help("Node ids must be unique within their cluster, cluster ids within the whole graph")
    )]
    DuplicateId { id: String, scope: String },

    #[error("Edge endpoint '{endpoint}' is not a registered node or cluster")]
    #[diagnostic(
        code(archdiagrams::unknown_endpoint),
        help("Declare both endpoints before the edge that connects them")
    )]
    UnknownEndpoint { endpoint: String },

    #[error("Edge endpoint '{endpoint}' is ambiguous, candidates: {candidates}")]
    #[diagnostic(
        code(archdiagrams::ambiguous_endpoint),
        help("Qualify the endpoint with its cluster, e.g. 'cluster::node'")
    )]
    AmbiguousEndpoint {
        endpoint: String,
        candidates: String,
    },

    #[error("Adding cluster '{cluster}' would create a containment cycle through {members}")]
    #[diagnostic(
        code(archdiagrams::cluster_cycle),
        help("Clusters must form a tree; a cluster cannot contain itself")
    )]
    Cycle { cluster: String, members: String },

    #[error("Invalid identifier '{id}': {reason}")]
    #[diagnostic(code(archdiagrams::invalid_id))]
    InvalidId { id: String, reason: &'static str },

    #[error("Cluster '{cluster}' does not exist")]
    #[diagnostic(
        code(archdiagrams::unknown_scope),
        help("Add the cluster before placing nodes inside it")
    )]
    UnknownScope { cluster: String },

    #[error("Cluster '{cluster}' lists unknown member '{member}'")]
    #[diagnostic(
        code(archdiagrams::unknown_member),
        help("Every child of a cluster must be a node placed in it or a cluster added to the graph")
    )]
    UnknownMember { cluster: String, member: String },

    #[error("'{id}' already belongs to cluster '{parent}'")]
    #[diagnostic(
        code(archdiagrams::already_grouped),
        help("A node or cluster can only have one enclosing cluster")
    )]
    AlreadyGrouped { id: String, parent: String },

    #[error("Edge endpoint cluster '{cluster}' contains no nodes")]
    #[diagnostic(
        code(archdiagrams::empty_cluster_endpoint),
        help("Edges to a cluster are anchored on one of its nodes")
    )]
    EmptyClusterEndpoint { cluster: String },

    #[error("Handle does not belong to graph '{graph}'")]
    #[diagnostic(code(archdiagrams::unknown_handle))]
    UnknownHandle { graph: String },
}

/// Failures of the external rendering engine.
///
/// The render pipeline never propagates these; they become the cause of a
/// source-only result.
#[derive(Error, Debug, Diagnostic)]
pub enum EngineError {
    #[error("Rendering engine '{program}' is not available")]
    #[diagnostic(
        code(archdiagrams::engine_unavailable),
        help("Install Graphviz or point --engine at the 'dot' executable")
    )]
    Unavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to communicate with rendering engine '{program}'")]
    #[diagnostic(code(archdiagrams::engine_invocation))]
    Invocation {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Rendering engine '{program}' exited with {status}: {stderr}")]
    #[diagnostic(code(archdiagrams::engine_failed))]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Rendering engine '{program}' produced no output")]
    #[diagnostic(code(archdiagrams::engine_empty_output))]
    EmptyOutput { program: String },

    #[error("Rendering engine '{program}' does not support format '{format}'")]
    #[diagnostic(code(archdiagrams::unsupported_format))]
    UnsupportedFormat { program: String, format: String },
}

/// Failures to resolve or write an output location.
#[derive(Error, Debug, Diagnostic)]
pub enum SinkError {
    #[error("Invalid diagram name '{name}': {reason}")]
    #[diagnostic(
        code(archdiagrams::invalid_name),
        help("Diagram names become file names and cannot contain path separators")
    )]
    InvalidName { name: String, reason: &'static str },

    #[error("Failed to create output directory '{path}'")]
    #[diagnostic(
        code(archdiagrams::create_dir),
        help("Check permissions on the output directory and its parents")
    )]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{path}'")]
    #[diagnostic(
        code(archdiagrams::write_output),
        help("Check file permissions and disk space")
    )]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while locating, reading or building diagram definitions.
#[derive(Error, Debug, Diagnostic)]
pub enum DefinitionError {
    #[error("Failed to read definition file '{path}'")]
    #[diagnostic(
        code(archdiagrams::definition_read),
        help("Check if the file exists and you have read permissions")
    )]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(Box<DefinitionParseError>),

    #[error("Invalid definition search pattern '{pattern}'")]
    #[diagnostic(code(archdiagrams::definition_pattern))]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Failed to list definition files")]
    #[diagnostic(code(archdiagrams::definition_glob))]
    Glob(#[from] glob::GlobError),

    #[error("Diagram '{name}' is defined in both '{first}' and '{second}'")]
    #[diagnostic(
        code(archdiagrams::duplicate_diagram),
        help("Diagram names must be unique across all definition files")
    )]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },

    #[error("No diagram named '{name}' (available: {available})")]
    #[diagnostic(code(archdiagrams::diagram_not_found))]
    NotFound { name: String, available: String },

    #[error("Failed to build diagram '{name}'")]
    #[diagnostic(code(archdiagrams::definition_build))]
    Build {
        name: String,
        #[source]
        #[diagnostic_source]
        source: GraphError,
    },
}

#[derive(Error, Debug, Diagnostic)]
pub enum DiagramError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Definition(#[from] DefinitionError),

    #[error("JSON serialization error")]
    #[diagnostic(
        code(archdiagrams::json_error),
        help("This is likely an internal error - please report it")
    )]
    Json(#[from] serde_json::Error),

    #[error("String formatting error")]
    #[diagnostic(
        code(archdiagrams::fmt_error),
        help("This is likely an internal error - please report it")
    )]
    Fmt(#[from] std::fmt::Error),

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(archdiagrams::config_error),
        help("Check your command arguments and configuration")
    )]
    ConfigurationError { message: String },

    #[error("{failed} of {total} diagrams could not be generated")]
    #[diagnostic(
        code(archdiagrams::batch_failed),
        help("See the status lines above for the cause of each failure")
    )]
    BatchFailed { failed: usize, total: usize },
}
