//! Validate and render expression trees

use super::{CliError, load_expression};
use crate::{Coordinate, ValidationIssue, issues, render, render_plain};

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Every scope is filled; carries the expression as query text
    Complete(String),
    /// Submission would be refused for these reasons
    Incomplete(Vec<ValidationIssue>),
}

/// Options for the render command
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Expression tree as JSON
    pub expression: String,
    /// Child of the root to mark as selected
    pub highlight: Option<Coordinate>,
    /// Emit query text instead of markup
    pub plain: bool,
}

/// Execute a check operation
pub fn execute_check(expression: &str) -> Result<CheckResult, CliError> {
    let root = load_expression(expression)?;
    let found = issues(&root);

    if found.is_empty() {
        Ok(CheckResult::Complete(render_plain(&root)))
    } else {
        Ok(CheckResult::Incomplete(found))
    }
}

pub fn execute_render(options: &RenderOptions) -> Result<String, CliError> {
    let root = load_expression(&options.expression)?;

    if options.plain {
        Ok(render_plain(&root))
    } else {
        Ok(render(&root, options.highlight))
    }
}
