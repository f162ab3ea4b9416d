use std::{fmt, rc::Rc, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    ast::{OperatorDescriptor, signature},
    catalog::{FunctionDescriptor, InputAttribute},
    error::{BuilderError, Result},
    types::{ConcreteType, GenericType, generic_set},
};

/// Address of a child slot inside a container node.
///
/// `Child` indexes a scope's children, `Param` a function's parameters.
/// The textual form (`item-3`, `param-0`) is the class tag the renderer
/// puts on the matching span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Coordinate {
    Child(usize),
    Param(usize),
}

impl Coordinate {
    pub fn index(self) -> usize {
        match self {
            Coordinate::Child(i) | Coordinate::Param(i) => i,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Child(i) => write!(f, "item-{}", i),
            Coordinate::Param(i) => write!(f, "param-{}", i),
        }
    }
}

impl FromStr for Coordinate {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (tag, index) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("invalid coordinate '{}'", s))?;
        let index: usize = index
            .parse()
            .map_err(|_| format!("invalid coordinate index in '{}'", s))?;
        match tag {
            "item" => Ok(Coordinate::Child(index)),
            "param" => Ok(Coordinate::Param(index)),
            _ => Err(format!("invalid coordinate tag in '{}'", s)),
        }
    }
}

/// Variant tag of an [`ExpressionNode`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Attribute,
    Literal,
    Operator,
    Function,
    Scope,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Attribute => "attribute",
            NodeKind::Literal => "literal",
            NodeKind::Operator => "operator",
            NodeKind::Function => "function",
            NodeKind::Scope => "scope",
        };
        f.write_str(name)
    }
}

/// One node of a partially built expression.
///
/// Container children are held behind `Rc`, so cloning a subtree for a
/// drill-down snapshot shares every untouched branch; `Rc::make_mut`
/// copies only the path that is actually edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "nodeType", rename_all = "camelCase")]
pub enum ExpressionNode {
    /// Reference to an input attribute
    Attribute(AttributeNode),

    /// User-entered constant
    Literal(LiteralNode),

    /// Operator marker inside a scope's child sequence
    Operator(OperatorNode),

    /// Function call with one scope per parameter
    Function(FunctionNode),

    /// Parenthesized sub-expression, parameter slot, or the whole expression
    Scope(ScopeNode),
}

impl ExpressionNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            ExpressionNode::Attribute(_) => NodeKind::Attribute,
            ExpressionNode::Literal(_) => NodeKind::Literal,
            ExpressionNode::Operator(_) => NodeKind::Operator,
            ExpressionNode::Function(_) => NodeKind::Function,
            ExpressionNode::Scope(_) => NodeKind::Scope,
        }
    }

    /// Generic classes this node can produce.
    ///
    /// For an operator this is its result type, which only matters when the
    /// operator is terminal (`x IS NULL` yields a bool).
    pub fn generic_return_types(&self) -> Vec<GenericType> {
        match self {
            ExpressionNode::Attribute(attr) => vec![attr.data_type.generic()],
            ExpressionNode::Literal(lit) => vec![lit.data_type.generic()],
            ExpressionNode::Operator(op) => op.return_types.clone(),
            ExpressionNode::Function(func) => generic_set(&func.return_types),
            ExpressionNode::Scope(scope) => generic_set(&scope.allowed_return_types),
        }
    }

    /// Whether the node can be drilled into
    pub fn is_container(&self) -> bool {
        matches!(self, ExpressionNode::Function(_) | ExpressionNode::Scope(_))
    }

    pub fn as_scope(&self) -> Option<&ScopeNode> {
        match self {
            ExpressionNode::Scope(scope) => Some(scope),
            _ => None,
        }
    }

    pub fn as_scope_mut(&mut self) -> Option<&mut ScopeNode> {
        match self {
            ExpressionNode::Scope(scope) => Some(scope),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionNode> {
        match self {
            ExpressionNode::Function(func) => Some(func),
            _ => None,
        }
    }

    pub fn as_function_mut(&mut self) -> Option<&mut FunctionNode> {
        match self {
            ExpressionNode::Function(func) => Some(func),
            _ => None,
        }
    }

    /// The child or parameter slot at `coordinate`.
    pub fn child(&self, coordinate: Coordinate) -> Result<&Rc<ExpressionNode>> {
        let slot = match (self, coordinate) {
            (ExpressionNode::Scope(scope), Coordinate::Child(i)) => scope.children.get(i),
            (ExpressionNode::Function(func), Coordinate::Param(i)) => func.parameters.get(i),
            _ => None,
        };
        slot.ok_or_else(|| BuilderError::out_of_range(coordinate, self.kind()))
    }

    pub fn child_mut(&mut self, coordinate: Coordinate) -> Result<&mut Rc<ExpressionNode>> {
        let kind = self.kind();
        let slot = match (self, coordinate) {
            (ExpressionNode::Scope(scope), Coordinate::Child(i)) => scope.children.get_mut(i),
            (ExpressionNode::Function(func), Coordinate::Param(i)) => func.parameters.get_mut(i),
            _ => None,
        };
        slot.ok_or_else(|| BuilderError::out_of_range(coordinate, kind))
    }

    /// Direct children with their coordinates; empty for terminal nodes.
    pub fn slots(&self) -> Vec<(Coordinate, &ExpressionNode)> {
        match self {
            ExpressionNode::Scope(scope) => scope
                .children
                .iter()
                .enumerate()
                .map(|(i, child)| (Coordinate::Child(i), child.as_ref()))
                .collect(),
            ExpressionNode::Function(func) => func
                .parameters
                .iter()
                .enumerate()
                .map(|(i, param)| (Coordinate::Param(i), param.as_ref()))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl From<AttributeNode> for ExpressionNode {
    fn from(node: AttributeNode) -> Self {
        ExpressionNode::Attribute(node)
    }
}

impl From<LiteralNode> for ExpressionNode {
    fn from(node: LiteralNode) -> Self {
        ExpressionNode::Literal(node)
    }
}

impl From<OperatorNode> for ExpressionNode {
    fn from(node: OperatorNode) -> Self {
        ExpressionNode::Operator(node)
    }
}

impl From<FunctionNode> for ExpressionNode {
    fn from(node: FunctionNode) -> Self {
        ExpressionNode::Function(node)
    }
}

impl From<ScopeNode> for ExpressionNode {
    fn from(node: ScopeNode) -> Self {
        ExpressionNode::Scope(node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeNode {
    pub name: String,
    pub data_type: ConcreteType,
}

impl AttributeNode {
    pub fn new(name: impl Into<String>, data_type: ConcreteType) -> Self {
        AttributeNode {
            name: name.into(),
            data_type,
        }
    }
}

impl From<&InputAttribute> for AttributeNode {
    fn from(attr: &InputAttribute) -> Self {
        AttributeNode::new(attr.name.clone(), attr.data_type)
    }
}

/// Value of a literal, already parsed for its concrete type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LiteralValue {
    Number(Decimal),
    Text(String),
    Bool(bool),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Number(n) => write!(f, "{}", n),
            LiteralValue::Text(s) => f.write_str(s),
            LiteralValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteralNode {
    pub data_type: ConcreteType,
    pub value: LiteralValue,
}

impl LiteralNode {
    /// Parse user input for `data_type`.
    ///
    /// `int` is bounded to 32 bits and `long` to 64. `float` and `double`
    /// also accept scientific notation (`1e5`).
    ///
    /// # Examples
    ///
    /// ```
    /// use stream_expr::ast::LiteralNode;
    /// use stream_expr::types::ConcreteType;
    ///
    /// let five = LiteralNode::parse(ConcreteType::Int, "5").unwrap();
    /// assert_eq!(five.value.to_string(), "5");
    /// assert!(LiteralNode::parse(ConcreteType::Int, "5.5").is_err());
    /// ```
    pub fn parse(data_type: ConcreteType, raw: &str) -> Result<Self> {
        let value = match data_type.generic() {
            GenericType::Text => LiteralValue::Text(raw.to_string()),
            GenericType::Bool => match raw.trim().to_lowercase().as_str() {
                "true" => LiteralValue::Bool(true),
                "false" => LiteralValue::Bool(false),
                _ => return Err(BuilderError::invalid_literal(data_type, raw)),
            },
            GenericType::Number if data_type == ConcreteType::Int => {
                let n: i32 = raw
                    .trim()
                    .parse()
                    .map_err(|_| BuilderError::invalid_literal(data_type, raw))?;
                LiteralValue::Number(Decimal::from(n))
            }
            GenericType::Number if data_type.is_integral() => {
                let n: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| BuilderError::invalid_literal(data_type, raw))?;
                LiteralValue::Number(Decimal::from(n))
            }
            GenericType::Number => {
                let raw = raw.trim();
                let n = Decimal::from_str(raw)
                    .or_else(|_| Decimal::from_scientific(raw))
                    .map_err(|_| BuilderError::invalid_literal(data_type, raw))?;
                LiteralValue::Number(n)
            }
        };
        Ok(LiteralNode { data_type, value })
    }

    pub fn generic_type(&self) -> GenericType {
        self.data_type.generic()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorNode {
    pub symbol: String,
    pub left_types: Vec<GenericType>,
    pub right_types: Vec<GenericType>,
    pub return_types: Vec<GenericType>,
    /// Valid as the last element of a scope (`IS NULL`)
    pub is_terminal: bool,
}

impl From<&OperatorDescriptor> for OperatorNode {
    fn from(desc: &OperatorDescriptor) -> Self {
        OperatorNode {
            symbol: desc.symbol.clone(),
            left_types: desc.left_types.clone(),
            right_types: desc.right_types.clone(),
            return_types: desc.return_types.clone(),
            is_terminal: desc.is_terminal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionNode {
    /// `name()` or `namespace:name()`
    pub display_name: String,
    pub return_types: Vec<ConcreteType>,
    /// The syntax string the parameters were generated from
    pub signature: String,
    pub parameters: Vec<Rc<ExpressionNode>>,
    pub allows_variadic_tail: bool,
    pub variadic_types: Vec<ConcreteType>,
}

impl FunctionNode {
    /// Instantiate a function call from its descriptor using the syntax at
    /// `syntax_index`. Every fixed parameter starts as an empty scope.
    pub fn from_descriptor(desc: &FunctionDescriptor, syntax_index: usize) -> Result<Self> {
        let syntax = desc.syntax.get(syntax_index).ok_or_else(|| {
            BuilderError::InvalidSignature(format!(
                "{} has no syntax #{}",
                desc.display_name(),
                syntax_index
            ))
        })?;
        let parsed = signature::parse(&syntax.syntax)?;

        Ok(FunctionNode {
            display_name: desc.display_name(),
            return_types: desc.return_types(),
            signature: syntax.syntax.clone(),
            parameters: parsed
                .fixed
                .into_iter()
                .map(|types| Rc::new(ScopeNode::new(types).into()))
                .collect(),
            allows_variadic_tail: parsed.variadic.is_some(),
            variadic_types: parsed.variadic.unwrap_or_default(),
        })
    }

    /// Append one more variadic parameter slot.
    pub fn push_variadic(&mut self) -> Result<()> {
        if !self.allows_variadic_tail {
            return Err(BuilderError::NotVariadic);
        }
        self.parameters
            .push(Rc::new(ScopeNode::new(self.variadic_types.clone()).into()));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeNode {
    pub allowed_return_types: Vec<ConcreteType>,
    pub children: Vec<Rc<ExpressionNode>>,
}

impl ScopeNode {
    pub fn new(allowed_return_types: Vec<ConcreteType>) -> Self {
        ScopeNode {
            allowed_return_types,
            children: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn last(&self) -> Option<&ExpressionNode> {
        self.children.last().map(Rc::as_ref)
    }

    pub fn push(&mut self, node: impl Into<ExpressionNode>) {
        self.children.push(Rc::new(node.into()));
    }

    pub fn generic_types(&self) -> Vec<GenericType> {
        generic_set(&self.allowed_return_types)
    }

    /// Builder-style push, handy when assembling trees by hand
    pub fn with(mut self, node: impl Into<ExpressionNode>) -> Self {
        self.push(node);
        self
    }
}
