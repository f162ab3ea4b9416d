// tests/render_tests.rs

use std::rc::Rc;

use pretty_assertions::assert_eq;
use stream_expr::ast::{
    AttributeNode, Coordinate, ExpressionNode, FunctionNode, LiteralNode, OperatorNode,
    OperatorTable, ScopeNode,
};
use stream_expr::catalog::{FunctionDescriptor, ReturnAttribute, SyntaxEntry};
use stream_expr::validate::IssueKind;
use stream_expr::{ConcreteType, issues, render, render_plain, validate};

fn function(namespace: &str, name: &str, returns: &str, syntax: &str) -> FunctionNode {
    let desc = FunctionDescriptor {
        name: name.to_string(),
        namespace: Some(namespace.to_string()),
        description: String::new(),
        return_attributes: vec![ReturnAttribute {
            types: vec![returns.to_string()],
            description: None,
        }],
        syntax: vec![SyntaxEntry {
            syntax: syntax.to_string(),
        }],
    };
    FunctionNode::from_descriptor(&desc, 0).unwrap()
}

fn length_of(arg: impl Into<ExpressionNode>) -> FunctionNode {
    let mut call = function("str", "length", "INT", "str:length(<STRING> input.string)");
    call.parameters[0] = Rc::new(
        ScopeNode::new(vec![ConcreteType::String])
            .with(arg)
            .into(),
    );
    call
}

fn operator(key: &str) -> OperatorNode {
    OperatorNode::from(OperatorTable::builtin().get(key).unwrap())
}

fn bool_scope() -> ScopeNode {
    ScopeNode::new(vec![ConcreteType::Bool])
}

fn amount() -> AttributeNode {
    AttributeNode::new("amount", ConcreteType::Long)
}

fn name() -> AttributeNode {
    AttributeNode::new("name", ConcreteType::String)
}

fn int(raw: &str) -> LiteralNode {
    LiteralNode::parse(ConcreteType::Int, raw).unwrap()
}

// ============================================================================
// Markup
// ============================================================================

#[test]
fn test_render_simple_comparison() {
    let root: ExpressionNode = bool_scope()
        .with(amount())
        .with(operator("greater_than"))
        .with(int("5"))
        .into();

    assert_eq!(render(&root, None), "amount > 5");
    assert_eq!(render_plain(&root), "amount > 5");
}

#[test]
fn test_render_empty_scope_placeholder() {
    let root: ExpressionNode = bool_scope().into();
    assert_eq!(render(&root, None), "...");
    assert_eq!(render_plain(&root), "...");
}

#[test]
fn test_render_function_spans() {
    let root: ExpressionNode = bool_scope()
        .with(length_of(name()))
        .with(operator("greater_than"))
        .with(int("3"))
        .into();

    assert_eq!(
        render(&root, None),
        r#"<span class="item-0">str:length(<span class="param-0 ok-clear">name</span>)</span> > 3"#
    );
    assert_eq!(render_plain(&root), "str:length(name) > 3");
}

#[test]
fn test_render_empty_parameter() {
    let call = function("str", "length", "INT", "str:length(<STRING> input.string)");
    let root: ExpressionNode = ScopeNode::new(vec![ConcreteType::Int]).with(call).into();

    assert_eq!(
        render(&root, None),
        r#"<span class="item-0">str:length(<span class="param-0">...</span>)</span>"#
    );
    assert_eq!(render_plain(&root), "str:length(...)");
}

#[test]
fn test_render_highlight() {
    let root: ExpressionNode = bool_scope()
        .with(length_of(name()))
        .with(operator("greater_than"))
        .with(int("3"))
        .into();

    let markup = render(&root, Some(Coordinate::Child(0)));
    assert!(markup.starts_with(r#"<span class="item-0 selected">"#));
    // highlight applies to direct children only
    assert!(!markup.contains(r#"param-0 selected"#));
}

#[test]
fn test_render_function_focus_highlights_parameter() {
    let node: ExpressionNode = length_of(name()).into();
    assert_eq!(
        render(&node, Some(Coordinate::Param(0))),
        r#"str:length(<span class="param-0 selected ok-clear">name</span>)"#
    );
}

#[test]
fn test_render_variadic_function() {
    let concat = function("str", "concat", "STRING", "str:concat(<STRING|INT> arg...)");
    let node: ExpressionNode = concat.into();

    assert_eq!(
        render(&node, None),
        r#"str:concat(<span class="add-param" title="Add parameter"></span>)"#
    );
    assert_eq!(render_plain(&node), "str:concat()");
}

#[test]
fn test_render_bracket_scope() {
    let inner = ScopeNode::new(vec![ConcreteType::Bool]).with(AttributeNode::new("active", ConcreteType::Bool));
    let root: ExpressionNode = bool_scope().with(operator("not")).with(inner).into();

    assert_eq!(render_plain(&root), "NOT (active)");
    assert!(render(&root, None).contains(r#"<span class="item-1 ok-clear">(active)</span>"#));
}

#[test]
fn test_render_empty_bracket_is_not_clearable() {
    let root: ExpressionNode = bool_scope().with(bool_scope()).into();
    assert_eq!(render(&root, None), r#"<span class="item-0">(...)</span>"#);
}

#[test]
fn test_render_terminal_operator() {
    let root: ExpressionNode = bool_scope().with(name()).with(operator("is_null")).into();
    assert_eq!(render_plain(&root), "name IS NULL");
}

#[test]
fn test_render_dangling_operator() {
    let root: ExpressionNode = bool_scope().with(amount()).with(operator("greater_than")).into();
    assert_eq!(render_plain(&root), "amount >");
}

#[test]
fn test_render_text_literal_quoting() {
    let text = LiteralNode::parse(ConcreteType::String, "it's <b>").unwrap();
    let root: ExpressionNode = bool_scope()
        .with(name())
        .with(operator("equal"))
        .with(text)
        .into();

    assert_eq!(render_plain(&root), r#"name == 'it\'s <b>'"#);
    assert_eq!(render(&root, None), "name == 'it&#39;s &lt;b&gt;'");
}

#[test]
fn test_render_attribute_name_escaping() {
    let odd = AttributeNode::new("a<b>&c", ConcreteType::Bool);
    let root: ExpressionNode = bool_scope().with(odd).into();

    assert_eq!(render(&root, None), "a&lt;b&gt;&amp;c");
    assert_eq!(render_plain(&root), "a<b>&c");
}

#[test]
fn test_render_is_deterministic() {
    let root: ExpressionNode = bool_scope()
        .with(length_of(name()))
        .with(operator("greater_than"))
        .with(int("3"))
        .into();

    let first = render(&root, Some(Coordinate::Child(0)));
    let second = render(&root.clone(), Some(Coordinate::Child(0)));
    assert_eq!(first, second);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_validate_complete_expression() {
    let root: ExpressionNode = bool_scope()
        .with(amount())
        .with(operator("greater_than"))
        .with(int("5"))
        .into();
    assert!(validate(&root));
}

#[test]
fn test_validate_empty_root() {
    let root: ExpressionNode = bool_scope().into();
    let found = issues(&root);

    assert_eq!(found.len(), 1);
    assert!(found[0].path.is_empty());
    assert_eq!(found[0].kind, IssueKind::EmptyScope);
    assert_eq!(found[0].to_string(), "root: empty expression");
}

#[test]
fn test_validate_dangling_operator() {
    let root: ExpressionNode = bool_scope().with(amount()).with(operator("greater_than")).into();
    let found = issues(&root);

    assert_eq!(
        found[0].kind,
        IssueKind::DanglingOperator {
            symbol: ">".to_string()
        }
    );
    assert!(!validate(&root));
}

#[test]
fn test_validate_terminal_operator_is_complete() {
    let root: ExpressionNode = bool_scope().with(name()).with(operator("is_null")).into();
    assert!(validate(&root));
}

#[test]
fn test_validate_reports_nested_path() {
    let call = function("str", "length", "INT", "str:length(<STRING> input.string)");
    let root: ExpressionNode = bool_scope()
        .with(amount())
        .with(operator("greater_than"))
        .with(call)
        .into();
    let found = issues(&root);

    assert_eq!(found.len(), 1);
    assert_eq!(
        found[0].path,
        vec![Coordinate::Child(2), Coordinate::Param(0)]
    );
    assert_eq!(found[0].to_string(), "item-2 > param-0: empty expression");
    assert_eq!(
        serde_json::to_value(&found[0]).unwrap(),
        serde_json::json!({ "path": [{ "child": 2 }, { "param": 0 }], "kind": "emptyScope" })
    );
}

#[test]
fn test_validate_collects_every_issue() {
    let root: ExpressionNode = bool_scope()
        .with(bool_scope())
        .with(operator("and"))
        .into();
    let found = issues(&root);

    assert_eq!(found.len(), 2);
    assert!(found[0].path.is_empty());
    assert_eq!(found[1].path, vec![Coordinate::Child(0)]);
}
