// tests/session_tests.rs

use pretty_assertions::assert_eq;
use stream_expr::session::Connection;
use stream_expr::{
    BuilderConfig, BuilderError, ConcreteType, Coordinate, ExpressionNode, FunctionMetadata,
    InputAttribute, MappingBoard, Selection, SlotId, render_plain,
};

const METADATA: &str = r#"{
    "extensions": {
        "str": {
            "functions": [
                {
                    "name": "length",
                    "description": "Length of a string",
                    "returnAttributes": [{ "type": ["INT"] }],
                    "syntax": [{ "syntax": "str:length(<STRING> input.string)" }]
                },
                {
                    "name": "concat",
                    "description": "Concatenates strings",
                    "returnAttributes": [{ "type": ["STRING"] }],
                    "syntax": [{ "syntax": "str:concat(<STRING|INT> arg...)" }]
                }
            ]
        }
    }
}"#;

fn board() -> MappingBoard {
    let inputs = vec![
        InputAttribute::new("amount", ConcreteType::Long),
        InputAttribute::new("name", ConcreteType::String),
        InputAttribute::new("active", ConcreteType::Bool),
    ];
    let outputs = vec![
        InputAttribute::new("total", ConcreteType::Long),
        InputAttribute::new("label", ConcreteType::String),
    ];
    let metadata = FunctionMetadata::from_json_str(METADATA).unwrap();
    MappingBoard::new(BuilderConfig::default(), &inputs, outputs, &metadata)
}

fn attribute(name: &str) -> Selection {
    Selection::Attribute(name.to_string())
}

fn operator(key: &str) -> Selection {
    Selection::Operator(key.to_string())
}

fn mapping_text(board: &MappingBoard, output: &str) -> Option<String> {
    board
        .mapping(output)
        .map(|scope| render_plain(&ExpressionNode::from(scope.clone())))
}

/// `total = amount + 5`
fn commit_total(board: &mut MappingBoard) {
    board.open(SlotId::Output("total".to_string())).unwrap();
    board.select(&attribute("amount")).unwrap();
    board.select(&operator("addition")).unwrap();
    board
        .select(&Selection::Literal {
            data_type: ConcreteType::Int,
            raw: "5".to_string(),
        })
        .unwrap();
    board.submit().unwrap();
}

// ============================================================================
// Sessions
// ============================================================================

#[test]
fn test_submit_commits_mapping() {
    let mut board = board();
    commit_total(&mut board);

    assert_eq!(board.active_slot(), None);
    assert_eq!(mapping_text(&board, "total").as_deref(), Some("amount + 5"));
    assert_eq!(
        board.mapping("total").unwrap().allowed_return_types,
        vec![ConcreteType::Long]
    );
}

#[test]
fn test_open_seeds_output_type() {
    let mut board = board();
    board.open(SlotId::Output("label".to_string())).unwrap();

    let candidates = board.candidates(None).unwrap();
    assert_eq!(candidates.value_types, vec![ConcreteType::String]);
    assert!(candidates.attributes.contains_key("name"));
    assert!(candidates.functions.contains_key("str:concat"));
    assert!(!candidates.attributes.contains_key("amount"));
}

#[test]
fn test_open_unknown_output() {
    let mut board = board();
    let err = board.open(SlotId::Output("missing".to_string())).unwrap_err();
    assert!(matches!(err, BuilderError::UnknownSlot(ref name) if name == "missing"));
}

#[test]
fn test_only_one_session_at_a_time() {
    let mut board = board();
    board.open(SlotId::Output("total".to_string())).unwrap();

    let err = board.open(SlotId::Filter).unwrap_err();
    assert!(matches!(err, BuilderError::SessionActive(ref slot) if slot == "total"));
}

#[test]
fn test_editing_requires_session() {
    let mut board = board();
    assert!(matches!(
        board.select(&attribute("amount")).unwrap_err(),
        BuilderError::NoActiveSession
    ));
    assert!(matches!(board.submit().unwrap_err(), BuilderError::NoActiveSession));
    assert!(matches!(board.cancel().unwrap_err(), BuilderError::NoActiveSession));
}

#[test]
fn test_submit_incomplete_keeps_session_open() {
    let mut board = board();
    board.open(SlotId::Output("total".to_string())).unwrap();
    board.select(&attribute("amount")).unwrap();
    board.select(&operator("addition")).unwrap();

    let err = board.submit().unwrap_err();
    match err {
        BuilderError::IncompleteExpression(found) => assert_eq!(found.len(), 1),
        other => panic!("Expected incomplete expression, got {:?}", other),
    }
    assert_eq!(
        board.active_slot(),
        Some(&SlotId::Output("total".to_string()))
    );
    assert!(board.mapping("total").is_none());
}

#[test]
fn test_cancel_reverts_to_committed() {
    let mut board = board();
    commit_total(&mut board);

    board.open(SlotId::Output("total".to_string())).unwrap();
    board.clear_expression().unwrap();
    board.select(&attribute("amount")).unwrap();
    board.cancel().unwrap();

    assert_eq!(board.active_slot(), None);
    assert_eq!(mapping_text(&board, "total").as_deref(), Some("amount + 5"));
}

#[test]
fn test_reopen_continues_from_committed() {
    let mut board = board();
    commit_total(&mut board);

    board.open(SlotId::Output("total".to_string())).unwrap();
    board.select(&operator("multiply")).unwrap();
    board.select(&attribute("amount")).unwrap();
    board.submit().unwrap();

    assert_eq!(
        mapping_text(&board, "total").as_deref(),
        Some("amount + 5 * amount")
    );
}

#[test]
fn test_select_rejects_illegal_token() {
    let mut board = board();
    board.open(SlotId::Filter).unwrap();

    let err = board.select(&operator("greater_than")).unwrap_err();
    assert!(matches!(err, BuilderError::NotACandidate(_)));
}

// ============================================================================
// Drill-down
// ============================================================================

#[test]
fn test_drill_into_function_parameter() {
    let mut board = board();
    board.open(SlotId::Filter).unwrap();
    board.select(&attribute("amount")).unwrap();
    board.select(&operator("greater_than")).unwrap();
    board
        .select(&Selection::Function {
            name: "str:length".to_string(),
            syntax: 0,
        })
        .unwrap();

    assert!(board.descend(Coordinate::Child(2)).unwrap());
    assert!(board.descend(Coordinate::Param(0)).unwrap());
    assert!(board.candidates(None).unwrap().attributes.contains_key("name"));
    board.select(&attribute("name")).unwrap();

    assert_eq!(
        board.render_levels().unwrap(),
        vec![
            r#"amount > <span class="item-2 selected">str:length(<span class="param-0">...</span>)</span>"#.to_string(),
            r#"str:length(<span class="param-0 selected">...</span>)"#.to_string(),
            "name".to_string(),
        ]
    );

    board.submit().unwrap();
    assert_eq!(
        board.filter_query().as_deref(),
        Some("amount > str:length(name)")
    );
}

#[test]
fn test_merge_up_then_clear_child() {
    let mut board = board();
    board.open(SlotId::Output("label".to_string())).unwrap();
    board
        .select(&Selection::Function {
            name: "str:concat".to_string(),
            syntax: 0,
        })
        .unwrap();
    board.descend(Coordinate::Child(0)).unwrap();
    board.add_parameter().unwrap();
    board.descend(Coordinate::Param(0)).unwrap();
    board.select(&attribute("name")).unwrap();
    assert!(board.merge_up().unwrap());

    assert_eq!(
        board.render_levels().unwrap()[1],
        r#"str:concat(<span class="param-0 ok-clear">name</span><span class="add-param" title="Add parameter"></span>)"#
    );

    board.clear_child(Coordinate::Param(0)).unwrap();
    let err = board.submit().unwrap_err();
    assert!(matches!(err, BuilderError::IncompleteExpression(_)));
}

// ============================================================================
// Filter and connections
// ============================================================================

#[test]
fn test_filter_query_reversed() {
    let mut board = board();
    assert_eq!(board.filter_query(), None);

    board.open(SlotId::Filter).unwrap();
    board.select(&attribute("active")).unwrap();
    board.submit().unwrap();
    assert_eq!(board.filter_query().as_deref(), Some("active"));

    board.set_filter_reversed(true);
    assert!(board.is_filter_reversed());
    assert_eq!(board.filter_query().as_deref(), Some("not (active)"));
}

#[test]
fn test_connections_follow_mappings() {
    let mut board = board();
    commit_total(&mut board);

    board.open(SlotId::Output("label".to_string())).unwrap();
    board
        .select(&Selection::Function {
            name: "str:concat".to_string(),
            syntax: 0,
        })
        .unwrap();
    board.descend(Coordinate::Child(0)).unwrap();
    board.add_parameter().unwrap();
    board.add_parameter().unwrap();
    board.descend(Coordinate::Param(0)).unwrap();
    board.select(&attribute("name")).unwrap();
    board.merge_up().unwrap();
    board.descend(Coordinate::Param(1)).unwrap();
    board.select(&attribute("name")).unwrap();
    board.submit().unwrap();

    assert_eq!(
        board.connections(),
        vec![
            Connection {
                input: "amount".to_string(),
                output: "total".to_string(),
            },
            Connection {
                input: "name".to_string(),
                output: "label".to_string(),
            },
        ]
    );

    assert!(board.clear_mapping("total"));
    assert!(!board.clear_mapping("total"));
    assert_eq!(board.connections().len(), 1);
}
