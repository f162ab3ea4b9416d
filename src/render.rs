//! Serializing expression trees for display.
//!
//! Two forms are produced:
//!
//! - **Markup** via [`render()`] - inline HTML where every function and
//!   scope inside the rendered node is wrapped in a span tagged with its
//!   coordinate (`item-N`, `param-N`), so a click can be mapped back to a
//!   drill-down target.
//! - **Plain text** via [`render_plain()`] - the expression as it would be
//!   written in a query, used for mapped-expression previews.
//!
//! Output is a pure function of the tree: the same tree and highlight always
//! render to the same bytes.
//!
//! # Examples
//!
//! ```
//! use stream_expr::ast::{AttributeNode, ExpressionNode, LiteralNode, OperatorNode, OperatorTable, ScopeNode};
//! use stream_expr::render::render;
//! use stream_expr::types::ConcreteType;
//!
//! let operators = OperatorTable::builtin();
//! let gt = operators.get("greater_than").unwrap();
//! let root: ExpressionNode = ScopeNode::new(vec![ConcreteType::Bool])
//!     .with(AttributeNode::new("amount", ConcreteType::Int))
//!     .with(OperatorNode::from(gt))
//!     .with(LiteralNode::parse(ConcreteType::Int, "5").unwrap())
//!     .into();
//!
//! assert_eq!(render(&root, None), "amount > 5");
//! ```

use crate::{
    ast::{Coordinate, ExpressionNode, FunctionNode, LiteralNode, LiteralValue, ScopeNode},
    types::GenericType,
};

/// Rendering of a node with nothing in it
pub const PLACEHOLDER: &str = "...";

pub struct ExpressionPrinter {
    markup: bool,
}

impl ExpressionPrinter {
    pub fn new(markup: bool) -> Self {
        ExpressionPrinter { markup }
    }

    pub fn print(&self, node: &ExpressionNode, highlight: Option<Coordinate>) -> String {
        let content = match node {
            ExpressionNode::Scope(scope) => self.print_scope_children(scope, highlight),
            ExpressionNode::Function(func) => self.print_function(func, highlight),
            other => self.print_terminal(other),
        };

        if content.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            content
        }
    }

    fn print_scope_children(&self, scope: &ScopeNode, highlight: Option<Coordinate>) -> String {
        let mut out = String::new();
        for (i, child) in scope.children.iter().enumerate() {
            let coordinate = Coordinate::Child(i);
            match child.as_ref() {
                ExpressionNode::Function(_) => {
                    let inner = self.print(child, None);
                    out.push_str(&self.wrap(coordinate, highlight, false, &inner));
                }
                ExpressionNode::Scope(inner_scope) => {
                    let inner = format!("({})", self.print(child, None));
                    out.push_str(&self.wrap(coordinate, highlight, !inner_scope.is_empty(), &inner));
                }
                ExpressionNode::Operator(op) => {
                    if self.markup {
                        out.push_str(&format!(" {} ", op.symbol));
                    } else {
                        if !out.is_empty() {
                            out.push(' ');
                        }
                        out.push_str(&op.symbol);
                        if i + 1 < scope.children.len() {
                            out.push(' ');
                        }
                    }
                }
                terminal => out.push_str(&self.print_terminal(terminal)),
            }
        }
        out
    }

    fn print_function(&self, func: &FunctionNode, highlight: Option<Coordinate>) -> String {
        let name = func.display_name.strip_suffix(')').unwrap_or(&func.display_name);
        let mut out = String::from(name);
        if !name.ends_with('(') {
            out.push('(');
        }

        let params: Vec<String> = func
            .parameters
            .iter()
            .enumerate()
            .map(|(i, param)| {
                let inner = self.print(param, None);
                let clearable = param.as_scope().is_some_and(|scope| !scope.is_empty());
                self.wrap(Coordinate::Param(i), highlight, clearable, &inner)
            })
            .collect();
        out.push_str(&params.join(", "));

        if self.markup && func.allows_variadic_tail {
            out.push_str(r#"<span class="add-param" title="Add parameter"></span>"#);
        }
        out.push(')');
        out
    }

    fn print_terminal(&self, node: &ExpressionNode) -> String {
        match node {
            ExpressionNode::Attribute(attr) if self.markup => escape_html(&attr.name),
            ExpressionNode::Attribute(attr) => attr.name.clone(),
            ExpressionNode::Literal(lit) => self.print_literal(lit),
            ExpressionNode::Operator(op) => op.symbol.clone(),
            ExpressionNode::Function(_) | ExpressionNode::Scope(_) => self.print(node, None),
        }
    }

    fn print_literal(&self, lit: &LiteralNode) -> String {
        match (&lit.value, lit.generic_type()) {
            (LiteralValue::Text(s), GenericType::Text) if self.markup => {
                format!("'{}'", escape_html(s))
            }
            (LiteralValue::Text(s), GenericType::Text) => format!("'{}'", s.replace('\'', "\\'")),
            (value, _) => value.to_string(),
        }
    }

    fn wrap(
        &self,
        coordinate: Coordinate,
        highlight: Option<Coordinate>,
        clearable: bool,
        inner: &str,
    ) -> String {
        if !self.markup {
            return inner.to_string();
        }

        let mut classes = coordinate.to_string();
        if highlight == Some(coordinate) {
            classes.push_str(" selected");
        }
        if clearable {
            classes.push_str(" ok-clear");
        }
        format!(r#"<span class="{}">{}</span>"#, classes, inner)
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

// Convenience functions

/// Render `node` as coordinate-tagged markup.
///
/// `highlight` marks the one direct child whose span gets the `selected`
/// class. Non-empty scopes are tagged `ok-clear` so the caller can offer to
/// empty them.
pub fn render(node: &ExpressionNode, highlight: Option<Coordinate>) -> String {
    ExpressionPrinter::new(true).print(node, highlight)
}

/// Render `node` as query text without markup.
pub fn render_plain(node: &ExpressionNode) -> String {
    ExpressionPrinter::new(false).print(node, None)
}
