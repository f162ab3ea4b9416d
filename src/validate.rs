use std::fmt;

use serde::Serialize;

use crate::ast::{Coordinate, ExpressionNode};

/// Why a scope cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum IssueKind {
    EmptyScope,
    /// Ends in an operator still waiting for its right operand
    DanglingOperator { symbol: String },
}

/// One failure, located by its path from the validated root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub path: Vec<Coordinate>,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = if self.path.is_empty() {
            "root".to_string()
        } else {
            self.path
                .iter()
                .map(Coordinate::to_string)
                .collect::<Vec<_>>()
                .join(" > ")
        };
        match &self.kind {
            IssueKind::EmptyScope => write!(f, "{}: empty expression", location),
            IssueKind::DanglingOperator { symbol } => {
                write!(f, "{}: '{}' is missing its right operand", location, symbol)
            }
        }
    }
}

/// Every incomplete scope in the tree, depth first.
pub fn issues(root: &ExpressionNode) -> Vec<ValidationIssue> {
    let mut found = Vec::new();
    let mut path = Vec::new();
    walk(root, &mut path, &mut found);
    found
}

/// True iff no scope in the tree is empty or ends in a non-terminal operator.
pub fn validate(root: &ExpressionNode) -> bool {
    issues(root).is_empty()
}

fn walk(node: &ExpressionNode, path: &mut Vec<Coordinate>, found: &mut Vec<ValidationIssue>) {
    if let ExpressionNode::Scope(scope) = node {
        match scope.last() {
            None => found.push(ValidationIssue {
                path: path.clone(),
                kind: IssueKind::EmptyScope,
            }),
            Some(ExpressionNode::Operator(op)) if !op.is_terminal => found.push(ValidationIssue {
                path: path.clone(),
                kind: IssueKind::DanglingOperator {
                    symbol: op.symbol.clone(),
                },
            }),
            Some(_) => {}
        }
    }

    for (coordinate, child) in node.slots() {
        path.push(coordinate);
        walk(child, path, found);
        path.pop();
    }
}
