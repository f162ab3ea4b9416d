use serde::{Deserialize, Serialize};

use crate::types::GenericType::{self, Bool, Number, Text};

/// Operator as offered to the user.
///
/// `left_types` constrain the node immediately before the operator,
/// `right_types` the node that must follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorDescriptor {
    /// Stable identifier (`greater_than`)
    pub key: String,
    /// Rendered token (`>`)
    pub symbol: String,
    pub description: String,
    pub left_types: Vec<GenericType>,
    pub right_types: Vec<GenericType>,
    pub return_types: Vec<GenericType>,
    /// May open an empty scope (prefix `NOT`)
    #[serde(default)]
    pub is_first: bool,
    /// May close a scope (postfix `IS NULL`)
    #[serde(default)]
    pub is_terminal: bool,
    /// Opens a nested scope instead of inserting a marker
    #[serde(default)]
    pub opens_scope: bool,
}

impl OperatorDescriptor {
    fn binary(
        key: &str,
        symbol: &str,
        description: &str,
        operands: &[GenericType],
        returns: GenericType,
    ) -> Self {
        OperatorDescriptor {
            key: key.to_string(),
            symbol: symbol.to_string(),
            description: description.to_string(),
            left_types: operands.to_vec(),
            right_types: operands.to_vec(),
            return_types: vec![returns],
            is_first: false,
            is_terminal: false,
            opens_scope: false,
        }
    }

    /// The synthetic `()` entry that groups a sub-expression.
    pub fn bracket() -> Self {
        OperatorDescriptor {
            key: "bracket".to_string(),
            symbol: "()".to_string(),
            description: "Bracket".to_string(),
            left_types: GenericType::ALL.to_vec(),
            right_types: GenericType::ALL.to_vec(),
            return_types: GenericType::ALL.to_vec(),
            is_first: true,
            is_terminal: false,
            opens_scope: true,
        }
    }
}

/// Immutable operator configuration shared by the resolver and sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorTable {
    operators: Vec<OperatorDescriptor>,
}

impl OperatorTable {
    pub fn new(operators: Vec<OperatorDescriptor>) -> Self {
        OperatorTable { operators }
    }

    /// The stream query operators available in the builder.
    pub fn builtin() -> Self {
        let mut operators = vec![
            OperatorDescriptor {
                key: "is_null".to_string(),
                symbol: "IS NULL".to_string(),
                description: "Null Check".to_string(),
                left_types: vec![Text],
                right_types: vec![Bool],
                return_types: vec![Bool],
                is_first: false,
                is_terminal: true,
                opens_scope: false,
            },
            OperatorDescriptor {
                key: "not".to_string(),
                symbol: "NOT".to_string(),
                description: "Logical Not".to_string(),
                left_types: vec![Bool],
                right_types: vec![Bool, Text, Number],
                return_types: vec![Bool],
                is_first: true,
                is_terminal: false,
                opens_scope: false,
            },
        ];

        operators.extend([
            OperatorDescriptor::binary("multiply", "*", "Multiplication", &[Number], Number),
            OperatorDescriptor::binary("divide", "/", "Division", &[Number], Number),
            OperatorDescriptor::binary("modulo", "%", "Modulus", &[Number], Number),
            OperatorDescriptor::binary("addition", "+", "Addition", &[Number], Number),
            OperatorDescriptor::binary("subtraction", "-", "Subtraction", &[Number], Number),
            OperatorDescriptor::binary("less_than", "<", "Less than", &[Number], Bool),
            OperatorDescriptor::binary("less_than_equal", "<=", "Less than or equal", &[Number], Bool),
            OperatorDescriptor::binary("greater_than", ">", "Greater than", &[Number], Bool),
            OperatorDescriptor::binary(
                "greater_than_equal",
                ">=",
                "Greater than or equal",
                &[Number],
                Bool,
            ),
            OperatorDescriptor::binary("equal", "==", "Equal comparison", &[Text, Number], Bool),
            OperatorDescriptor::binary("not_equal", "!=", "Not equal comparison", &[Text, Number], Bool),
            OperatorDescriptor::binary("and", "AND", "Logical AND", &[Text, Number, Bool], Bool),
            OperatorDescriptor::binary("or", "OR", "Logical OR", &[Text, Number, Bool], Bool),
        ]);

        OperatorTable { operators }
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperatorDescriptor> {
        self.operators.iter()
    }

    pub fn get(&self, key: &str) -> Option<&OperatorDescriptor> {
        self.operators.iter().find(|op| op.key == key)
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::builtin()
    }
}
