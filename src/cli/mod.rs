//! CLI support for stream-expr
//!
//! Provides programmatic access to the command-line front end so the same
//! checks can be embedded in other tools.

mod candidates;
mod check;
mod docs;

pub use candidates::{CandidateOptions, execute_candidates};
pub use check::{CheckResult, RenderOptions, execute_check, execute_render};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};

use std::{io, path::Path};

use tracing_subscriber::EnvFilter;

use crate::{BuilderConfig, BuilderError, ExpressionNode};

/// Errors that can occur during CLI operations
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Builder(#[from] BuilderError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No input provided
    #[error("No expression provided. Pass a file or pipe JSON to stdin.")]
    NoInput,

    #[error("Expected the expression root to be a scope, found a {0} node")]
    NotAScope(crate::ast::NodeKind),

    #[error("Cannot descend into '{0}'")]
    Coordinate(String),

    #[error("Unknown category: '{0}'\nRun 'stream-expr docs' to see available categories.")]
    UnknownCategory(String),
}

/// Parse an expression tree from its JSON form
pub fn load_expression(json: &str) -> Result<ExpressionNode, CliError> {
    Ok(serde_json::from_str(json)?)
}

/// Load the builder configuration, falling back to the defaults
pub fn load_config(path: Option<&Path>) -> Result<BuilderConfig, CliError> {
    match path {
        Some(path) => Ok(BuilderConfig::from_path(path)?),
        None => Ok(BuilderConfig::default()),
    }
}

/// Log filter for the binary: `directives` (normally `RUST_LOG`) when they
/// parse, otherwise warnings and above.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}
