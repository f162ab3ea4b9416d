//! Documentation content for the stream-expr CLI

use super::CliError;
use crate::{GenericType, OperatorTable};

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Expressions,
    Operators,
    Types,
}

impl DocCategory {
    /// Parse category name from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "expressions" | "expression" | "expr" => Some(Self::Expressions),
            "operators" | "operator" | "ops" => Some(Self::Operators),
            "types" | "type" => Some(Self::Types),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"STREAM-EXPR DOCUMENTATION

stream-expr checks and inspects the expression trees built in the visual
mapping editor: output attribute mappings and stream filter conditions.

DOCUMENTATION CATEGORIES

  expressions       Node kinds, scopes, and how trees are stored as JSON
  operators         Operators available in the builder and their types
  types             Concrete types and their generic classes

Run 'stream-expr doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str, operators: &OperatorTable) -> Result<String, CliError> {
    match DocCategory::parse(name) {
        Some(DocCategory::Expressions) => Ok(EXPRESSIONS_DOC.to_string()),
        Some(DocCategory::Operators) => Ok(operators_doc(operators)),
        Some(DocCategory::Types) => Ok(TYPES_DOC.to_string()),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

fn type_list(types: &[GenericType]) -> String {
    if types.is_empty() {
        return "-".to_string();
    }
    types
        .iter()
        .map(|ty| ty.as_str())
        .collect::<Vec<_>>()
        .join("|")
}

fn operators_doc(operators: &OperatorTable) -> String {
    let mut out = String::from("OPERATORS\n\n");
    out.push_str(&format!(
        "  {:<20} {:<8} {:<18} {:<18} {:<8} {}\n",
        "KEY", "SYMBOL", "LEFT", "RIGHT", "RETURNS", "NOTES"
    ));

    for op in operators.iter() {
        let mut notes = Vec::new();
        if op.is_first {
            notes.push("may start a scope");
        }
        if op.is_terminal {
            notes.push("may end a scope");
        }
        out.push_str(&format!(
            "  {:<20} {:<8} {:<18} {:<18} {:<8} {}\n",
            op.key,
            op.symbol,
            type_list(&op.left_types),
            type_list(&op.right_types),
            type_list(&op.return_types),
            notes.join(", ")
        ));
    }

    out.push_str(
        r#"
  ()  Bracket. Opens a nested scope; offered wherever a value may start.

Operators after a value must accept that value on the left and return a type
the enclosing scope allows. After an operator only values of its right types
(or a bracket) may follow.
"#,
    );
    out
}

const EXPRESSIONS_DOC: &str = r#"EXPRESSIONS - Node Kinds

Every expression is a tree stored as JSON with a "nodeType" tag.

SCOPE
  {"nodeType": "scope", "allowedReturnTypes": ["bool"], "children": [...]}
    An ordered sequence of operands and operators. The whole expression is a
    scope, so is every bracket and every function parameter.

    Constraints:
      - A scope must not be empty when submitted
      - A scope must not end in an operator waiting for a right operand

ATTRIBUTE
  {"nodeType": "attribute", "name": "amount", "dataType": "int"}

LITERAL
  {"nodeType": "literal", "dataType": "int", "value": {"number": "5"}}
  {"nodeType": "literal", "dataType": "string", "value": {"text": "abc"}}
  {"nodeType": "literal", "dataType": "bool", "value": {"bool": true}}

OPERATOR
  {"nodeType": "operator", "symbol": ">", "leftTypes": ["number"],
   "rightTypes": ["number"], "returnTypes": ["bool"], "isTerminal": false}

FUNCTION
  {"nodeType": "function", "displayName": "str:concat()",
   "returnTypes": ["string"], "signature": "str:concat(<STRING> arg...)",
   "parameters": [<scope>, ...], "allowsVariadicTail": true,
   "variadicTypes": ["string"]}

COORDINATES
  item-N     N-th child of a scope
  param-N    N-th parameter of a function

  Example:
    Expression:  amount > str:length(name)
    Path:        item-2,param-0   (the parameter scope holding `name`)
"#;

const TYPES_DOC: &str = r#"TYPES - Concrete Types and Generic Classes

  int, long, float, double    number
  string                      text
  bool                        bool

Type names are case-insensitive in metadata and input files. Any other type
name is rejected. Function parameters declared as OBJECT accept every type.
"#;
