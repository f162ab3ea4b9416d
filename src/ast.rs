//! # Expression Tree
//!
//! This module defines the tree a user assembles token by token in the
//! visual expression builder. Unlike a parsed AST, the tree is usually
//! *incomplete*: scopes may be empty and a scope may end in an operator that
//! still waits for its right operand.
//!
//! ## Architecture Overview
//!
//! - **[node]** - The [`ExpressionNode`] sum type and its per-variant structs
//! - **[operators]** - Operator descriptors and the built-in operator table
//! - **[signature]** - Parsing of function syntax strings into parameter slots
//!
//! ## Core Concepts
//!
//! ### Scopes
//!
//! A [`ScopeNode`] holds an ordered sequence of children and the concrete
//! types it is allowed to produce. The root of every mapping is a scope, as
//! is every parenthesized group and every function parameter.
//!
//! A scope alternates operands and operators:
//!
//! ```text
//! amount > 5
//! NOT (name IS NULL)
//! str:concat(name, 'x') == 'ab'
//! ```
//!
//! ### Coordinates
//!
//! A [`Coordinate`] addresses a slot inside a container: `item-N` for the
//! N-th child of a scope, `param-N` for the N-th parameter of a function.
//! Drill-down navigation is a path of coordinates from the root.
pub mod node;
pub mod operators;
pub mod signature;

pub use node::{
    AttributeNode, Coordinate, ExpressionNode, FunctionNode, LiteralNode, LiteralValue, NodeKind,
    OperatorNode, ScopeNode,
};
pub use operators::{OperatorDescriptor, OperatorTable};
