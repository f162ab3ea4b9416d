use crate::{
    ast::{Coordinate, NodeKind},
    types::ConcreteType,
    validate::ValidationIssue,
};

pub type Result<T> = std::result::Result<T, BuilderError>;

/// Errors raised by the expression builder.
///
/// Everything here is scoped to a single edit session; nothing in the core
/// is fatal to the process.
#[derive(thiserror::Error, Debug)]
pub enum BuilderError {
    /// A data type outside `int/long/float/double/string/bool`
    #[error("unknown data type: '{0}'")]
    UnknownType(String),

    /// A coordinate that does not address a child of the node
    #[error("coordinate {coordinate} is out of range for {node} node")]
    OutOfRangeCoordinate {
        coordinate: Coordinate,
        node: NodeKind,
    },

    /// Submission refused because the tree still has gaps
    #[error("expression is incomplete ({} issue(s))", .0.len())]
    IncompleteExpression(Vec<ValidationIssue>),

    #[error("cannot insert into a {0} node, focus a scope first")]
    FocusNotScope(NodeKind),

    #[error("function does not accept additional parameters")]
    NotVariadic,

    #[error("'{value}' is not a valid {data_type} value")]
    InvalidLiteral {
        data_type: ConcreteType,
        value: String,
    },

    #[error("invalid function syntax: {0}")]
    InvalidSignature(String),

    #[error("'{0}' is not available at the current position")]
    NotACandidate(String),

    #[error("no expression is being edited")]
    NoActiveSession,

    #[error("expression for '{0}' is already being edited")]
    SessionActive(String),

    #[error("unknown output attribute: '{0}'")]
    UnknownSlot(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BuilderError {
    pub fn out_of_range(coordinate: Coordinate, node: NodeKind) -> Self {
        Self::OutOfRangeCoordinate { coordinate, node }
    }

    pub fn invalid_literal(data_type: ConcreteType, value: impl Into<String>) -> Self {
        Self::InvalidLiteral {
            data_type,
            value: value.into(),
        }
    }
}
