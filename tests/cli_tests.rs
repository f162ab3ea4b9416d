// tests/cli_tests.rs
#![cfg(feature = "cli")]

use pretty_assertions::assert_eq;
use stream_expr::cli::{
    self, CandidateOptions, CheckResult, CliError, DocCategory, RenderOptions,
};
use stream_expr::{CandidateCategory, CandidateFilter, Coordinate, OperatorTable};
use tracing::level_filters::LevelFilter;

const COMPLETE: &str = r#"{
    "nodeType": "scope",
    "allowedReturnTypes": ["bool"],
    "children": [
        { "nodeType": "attribute", "name": "name", "dataType": "string" },
        {
            "nodeType": "operator",
            "symbol": "IS NULL",
            "leftTypes": ["text"],
            "rightTypes": ["bool"],
            "returnTypes": ["bool"],
            "isTerminal": true
        }
    ]
}"#;

const WITH_EMPTY_PARAMETER: &str = r#"{
    "nodeType": "scope",
    "allowedReturnTypes": ["bool"],
    "children": [
        { "nodeType": "attribute", "name": "amount", "dataType": "long" },
        {
            "nodeType": "operator",
            "symbol": ">",
            "leftTypes": ["number"],
            "rightTypes": ["number"],
            "returnTypes": ["bool"],
            "isTerminal": false
        },
        {
            "nodeType": "function",
            "displayName": "str:length()",
            "returnTypes": ["int"],
            "signature": "str:length(<STRING> input.string)",
            "parameters": [
                { "nodeType": "scope", "allowedReturnTypes": ["string"], "children": [] }
            ],
            "allowsVariadicTail": false,
            "variadicTypes": []
        }
    ]
}"#;

const INPUTS: &str = r#"[
    { "name": "amount", "type": "LONG" },
    { "name": "name", "type": "STRING" },
    { "name": "active", "type": "BOOL" }
]"#;

const METADATA: &str = r#"{
    "extensions": {
        "str": {
            "functions": [
                {
                    "name": "upper",
                    "description": "Upper case",
                    "returnAttributes": [{ "type": ["STRING"] }],
                    "syntax": [{ "syntax": "str:upper(<STRING> input.string)" }]
                }
            ]
        }
    }
}"#;

// ============================================================================
// check / render
// ============================================================================

#[test]
fn test_check_complete() {
    match cli::execute_check(COMPLETE).unwrap() {
        CheckResult::Complete(text) => assert_eq!(text, "name IS NULL"),
        other => panic!("Expected complete expression, got {:?}", other),
    }
}

#[test]
fn test_check_incomplete() {
    match cli::execute_check(WITH_EMPTY_PARAMETER).unwrap() {
        CheckResult::Incomplete(found) => {
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].to_string(), "item-2 > param-0: empty expression");
        }
        other => panic!("Expected incomplete expression, got {:?}", other),
    }
}

#[test]
fn test_check_invalid_json() {
    let err = cli::execute_check(r#"{ "nodeType": "scope" "#).unwrap_err();
    assert!(matches!(err, CliError::Json(_)));
}

#[test]
fn test_render_markup_and_plain() {
    let markup = cli::execute_render(&RenderOptions {
        expression: WITH_EMPTY_PARAMETER.to_string(),
        highlight: Some(Coordinate::Child(2)),
        plain: false,
    })
    .unwrap();
    assert_eq!(
        markup,
        r#"amount > <span class="item-2 selected">str:length(<span class="param-0">...</span>)</span>"#
    );

    let plain = cli::execute_render(&RenderOptions {
        expression: WITH_EMPTY_PARAMETER.to_string(),
        plain: true,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(plain, "amount > str:length(...)");
}

// ============================================================================
// candidates
// ============================================================================

#[test]
fn test_candidates_at_path() {
    let options = CandidateOptions {
        expression: WITH_EMPTY_PARAMETER.to_string(),
        metadata: METADATA.to_string(),
        inputs: INPUTS.to_string(),
        path: vec![Coordinate::Child(2), Coordinate::Param(0)],
        ..Default::default()
    };
    let candidates = cli::execute_candidates(&options).unwrap();

    let attributes: Vec<&str> = candidates.attributes.keys().map(String::as_str).collect();
    assert_eq!(attributes, vec!["name"]);
    let functions: Vec<&str> = candidates.functions.keys().map(String::as_str).collect();
    assert_eq!(functions, vec!["str:upper"]);
}

#[test]
fn test_candidates_with_filter() {
    let options = CandidateOptions {
        expression: r#"{ "nodeType": "scope", "allowedReturnTypes": ["bool"], "children": [] }"#
            .to_string(),
        metadata: METADATA.to_string(),
        inputs: INPUTS.to_string(),
        filter: Some(CandidateFilter::new(CandidateCategory::Attribute, "AM")),
        ..Default::default()
    };
    let candidates = cli::execute_candidates(&options).unwrap();

    let attributes: Vec<&str> = candidates.attributes.keys().map(String::as_str).collect();
    assert_eq!(attributes, vec!["amount", "name"]);
}

#[test]
fn test_candidates_bad_path() {
    let options = CandidateOptions {
        expression: WITH_EMPTY_PARAMETER.to_string(),
        metadata: METADATA.to_string(),
        inputs: INPUTS.to_string(),
        path: vec![Coordinate::Child(0)],
        ..Default::default()
    };
    let err = cli::execute_candidates(&options).unwrap_err();
    assert!(matches!(err, CliError::Coordinate(ref coordinate) if coordinate == "item-0"));
}

#[test]
fn test_candidates_root_must_be_scope() {
    let options = CandidateOptions {
        expression: r#"{ "nodeType": "attribute", "name": "amount", "dataType": "long" }"#
            .to_string(),
        metadata: METADATA.to_string(),
        inputs: INPUTS.to_string(),
        ..Default::default()
    };
    assert!(matches!(
        cli::execute_candidates(&options).unwrap_err(),
        CliError::NotAScope(_)
    ));
}

// ============================================================================
// docs
// ============================================================================

#[test]
fn test_doc_category_aliases() {
    assert_eq!(DocCategory::parse("OPS"), Some(DocCategory::Operators));
    assert_eq!(DocCategory::parse("expr"), Some(DocCategory::Expressions));
    assert_eq!(DocCategory::parse("unknown"), None);
}

#[test]
fn test_operators_doc_lists_table() {
    let doc = cli::get_doc_category("operators", &OperatorTable::builtin()).unwrap();
    assert!(doc.contains("greater_than"));
    assert!(doc.contains("IS NULL"));
    assert!(doc.contains("may start a scope"));
}

#[test]
fn test_unknown_doc_category() {
    let err = cli::get_doc_category("nope", &OperatorTable::builtin()).unwrap_err();
    assert!(matches!(err, CliError::UnknownCategory(ref name) if name == "nope"));
}

#[test]
fn test_coordinate_argument_parsing() {
    assert_eq!("item-3".parse::<Coordinate>(), Ok(Coordinate::Child(3)));
    assert_eq!("param-0".parse::<Coordinate>(), Ok(Coordinate::Param(0)));
    assert!("slot-1".parse::<Coordinate>().is_err());
    assert!("item".parse::<Coordinate>().is_err());
}

// ============================================================================
// logging
// ============================================================================

#[test]
fn test_log_filter_honours_directives() {
    let filter = cli::log_filter(Some("debug"));
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

    let filter = cli::log_filter(Some("stream_expr=trace"));
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
}

#[test]
fn test_log_filter_defaults_to_warn() {
    assert_eq!(cli::log_filter(None).max_level_hint(), Some(LevelFilter::WARN));
    assert_eq!(
        cli::log_filter(Some("stream_expr=loud")).max_level_hint(),
        Some(LevelFilter::WARN)
    );
}
