//! Resolve the candidate tokens for a position inside an expression

use super::{CliError, load_expression};
use crate::{
    BuilderConfig, CandidateFilter, Candidates, Coordinate, ExpressionNode, FocusStack,
    FunctionMetadata, InputAttribute, Resolver,
};

/// Options for the candidates command
#[derive(Debug, Clone, Default)]
pub struct CandidateOptions {
    /// Expression tree as JSON; its root must be a scope
    pub expression: String,
    /// Function metadata document as JSON
    pub metadata: String,
    /// Input attributes as a JSON array of `{name, type}`
    pub inputs: String,
    /// Drill-down path to the focused node
    pub path: Vec<Coordinate>,
    pub filter: Option<CandidateFilter>,
    pub config: BuilderConfig,
}

pub fn execute_candidates(options: &CandidateOptions) -> Result<Candidates, CliError> {
    let root = match load_expression(&options.expression)? {
        ExpressionNode::Scope(scope) => scope,
        other => return Err(CliError::NotAScope(other.kind())),
    };
    let metadata = FunctionMetadata::from_json_str(&options.metadata)?;
    let inputs: Vec<InputAttribute> = serde_json::from_str(&options.inputs)?;

    let catalog = options.config.catalog_builder().build(&inputs, &metadata);

    let mut focus = FocusStack::new(root);
    for coordinate in &options.path {
        if !focus.descend(*coordinate) {
            return Err(CliError::Coordinate(coordinate.to_string()));
        }
    }

    let resolver = Resolver::new(&catalog, &options.config.operators);
    Ok(resolver.resolve(focus.current_focus(), options.filter.as_ref()))
}
