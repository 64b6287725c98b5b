//! Tests for the parse pipeline: structure checks, error messages and assembled documents.
mod common;
use common::*;
use dify_dsl::prelude::*;
use serde_json::json;

#[test]
fn test_minimal_document_parses() {
    let app = DslParser::new()
        .parse(MINIMAL_YAML)
        .expect("Failed to parse minimal document");

    assert_eq!(app.name, "M");
    assert_eq!(app.mode, "workflow");
    assert_eq!(app.version, "0.2.0");
    assert_eq!(app.kind, "app");
    assert_eq!(app.workflow.graph.node_count(), 0);
    assert_eq!(app.workflow.graph.edge_count(), 0);

    // Defaults for everything the document leaves out
    assert_eq!(app.description, "");
    assert_eq!(app.icon, "🤖");
    assert_eq!(app.icon_background, "#FFEAD5");
    assert!(!app.use_icon_as_answer_icon);
    assert!(app.dependencies.is_null());
    assert!(app.model_config.is_none());
    assert!(app.workflow.features.is_empty());
}

#[test]
fn test_minimal_tree_parses() {
    let app = DslParser::new()
        .parse_value(&minimal_tree())
        .expect("Failed to parse minimal tree");
    assert_eq!(app.name, "M");
}

#[test]
fn test_json_text_parses() {
    let text = minimal_tree().to_string();
    let parser = DslParser::builder()
        .format(DslFormat::Json)
        .build()
        .expect("Failed to build parser");
    let app = parser.parse(&text).expect("Failed to parse JSON");
    assert_eq!(app.name, "M");
}

#[test]
fn test_syntax_error_is_wrapped() {
    let message = DslParser::new()
        .parse("app: [unclosed")
        .expect_err("broken YAML must fail")
        .to_string();
    assert!(
        message.starts_with("Failed to parse YAML: "),
        "unexpected message: {}",
        message
    );
}

#[test]
fn test_non_map_document_is_rejected() {
    let message = parse_error(&json!(["app"]));
    assert_eq!(message, "Parsed document must be a map, got sequence");
}

#[test]
fn test_missing_keys_reported_in_order() {
    let mut tree = minimal_tree();
    let root = tree.as_object_mut().unwrap();
    root.remove("version");
    root.remove("workflow");
    assert_eq!(parse_error(&tree), "Missing required key: version");

    let mut tree = minimal_tree();
    tree.as_object_mut().unwrap().remove("app");
    assert_eq!(parse_error(&tree), "Missing required key: app");
}

#[test]
fn test_null_key_counts_as_missing() {
    let mut tree = minimal_tree();
    tree["workflow"] = Value::Null;
    assert_eq!(parse_error(&tree), "Missing required key: workflow");
}

#[test]
fn test_invalid_kind() {
    let mut tree = minimal_tree();
    tree["kind"] = json!("plugin");
    assert_eq!(
        parse_error(&tree),
        "Invalid kind: expected 'app', got 'plugin'"
    );
}

#[test]
fn test_unsupported_version() {
    let mut tree = minimal_tree();
    tree["version"] = json!("9.9.9");
    assert_eq!(parse_error(&tree), "Unsupported version: 9.9.9");

    // A YAML float is not a version string
    tree["version"] = json!(0.2);
    assert_eq!(parse_error(&tree), "Unsupported version: 0.2");
}

#[test]
fn test_every_supported_version_parses() {
    for version in ["0.1.5", "0.2.0", "0.3.0"] {
        let mut tree = minimal_tree();
        tree["version"] = json!(version);
        let app = DslParser::new().parse_value(&tree).expect(version);
        assert_eq!(app.version, version);
    }
}

#[test]
fn test_missing_app_keys() {
    let mut tree = minimal_tree();
    tree["app"] = json!({"mode": "workflow"});
    assert_eq!(parse_error(&tree), "Missing required app key: name");

    tree["app"] = json!({"name": "M"});
    assert_eq!(parse_error(&tree), "Missing required app key: mode");
}

#[test]
fn test_unsupported_mode() {
    let mut tree = minimal_tree();
    tree["app"]["mode"] = json!("invalid_mode");
    assert!(parse_error(&tree).contains("Unsupported mode: invalid_mode"));
}

#[test]
fn test_non_map_sections() {
    let mut tree = minimal_tree();
    tree["app"] = json!("M");
    assert_eq!(
        parse_error(&tree),
        "Invalid app section: expected map, got string"
    );

    let mut tree = minimal_tree();
    tree["workflow"] = json!([1]);
    assert_eq!(
        parse_error(&tree),
        "Invalid workflow section: expected map, got sequence"
    );
}

#[test]
fn test_unknown_node_type_is_wrapped_with_node_id() {
    let tree = tree_with_graph(json!([node_tree("n1", "http-request", json!({}))]), json!([]));
    assert_eq!(
        parse_error(&tree),
        "Failed to parse node n1: Unsupported node type: http-request"
    );
}

#[test]
fn test_node_without_id_or_type() {
    let tree = tree_with_graph(json!([{"data": {}}]), json!([]));
    assert_eq!(
        parse_error(&tree),
        "Failed to parse node unknown: Unsupported node type: "
    );
}

#[test]
fn test_node_entries_that_are_not_maps_are_skipped() {
    let tree = tree_with_graph(
        json!([null, "not a node", 3, node_tree("start", "start", json!({}))]),
        json!([]),
    );
    let app = DslParser::new()
        .parse_value(&tree)
        .expect("non-map node entries should be skipped");
    let ids: Vec<&str> = app.workflow.graph.nodes().map(Node::id).collect();
    assert_eq!(ids, ["start"]);
}

#[test]
fn test_malformed_node_payload_is_wrapped() {
    let node = node_tree("llm1", "llm", json!({"prompt_template": "not a list"}));
    let message = parse_error(&tree_with_graph(json!([node]), json!([])));
    assert!(
        message.starts_with("Failed to parse node llm1: Invalid llm node data: "),
        "unexpected message: {}",
        message
    );
}

#[test]
fn test_non_map_edge_is_rejected() {
    let tree = tree_with_graph(json!([]), json!(["start-end"]));
    assert_eq!(
        parse_error(&tree),
        "Failed to parse edge: expected map, got string"
    );
}

#[test]
fn test_edge_without_target_is_wrapped() {
    let tree = tree_with_graph(json!([]), json!([{"id": "e1", "source": "start"}]));
    let message = parse_error(&tree);
    assert!(
        message.starts_with("Failed to parse edge e1: Invalid edge: "),
        "unexpected message: {}",
        message
    );
    assert!(message.contains("target"));
}

#[test]
fn test_edge_id_defaults_to_endpoints() {
    let tree = tree_with_graph(json!([]), json!([{"source": "a", "target": "b"}]));
    let app = DslParser::new().parse_value(&tree).unwrap();
    let edge = app.workflow.graph.edge("a-b").expect("edge a-b");
    assert_eq!(edge.edge_type, "custom");
    assert_eq!(edge.z_index, 0);
    assert!(!edge.selected);
}

#[test]
fn test_parse_does_not_validate_graph() {
    // Dangling edge and no start node, still a valid document
    let tree = tree_with_graph(
        json!([node_tree("llm1", "llm", json!({}))]),
        json!([{"id": "x", "source": "ghost", "target": "llm1"}]),
    );
    let app = DslParser::new().parse_value(&tree).expect("should parse");
    assert_eq!(app.workflow.graph.validate().len(), 3);
}

#[test]
fn test_chat_app_fixture() {
    let app = DslParser::new()
        .parse(CHAT_APP_YAML)
        .expect("Failed to parse chat app");

    assert_eq!(app.name, "Weather Bot");
    assert_eq!(app.mode, "advanced-chat");
    assert_eq!(app.version, "0.1.5");
    assert_eq!(app.icon, "☀️");
    assert_eq!(app.icon_background, "#E0F2FE");
    assert!(app.use_icon_as_answer_icon);
    assert!(app.dependencies.is_null(), "empty dependency list reads as none");

    let workflow = &app.workflow;
    assert_eq!(workflow.environment_variables.len(), 1);
    assert_eq!(workflow.environment_variables[0].var_type, "secret");
    assert_eq!(workflow.conversation_variables.len(), 1);
    assert_eq!(
        workflow.conversation_variables[0].extra.get("name"),
        Some(&json!("last_city"))
    );
    assert_eq!(
        workflow.feature("opening_statement"),
        Some(&json!("Ask me about the weather anywhere."))
    );

    let graph = &workflow.graph;
    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.edge_count(), 4);
    assert!(graph.validate().is_empty(), "{:?}", graph.validate());

    let types: Vec<&str> = graph.nodes().map(Node::node_type).collect();
    assert_eq!(types, ["start", "llm", "tool", "code", "answer"]);

    let edge = graph.edge("start-source-llm-target").unwrap();
    assert_eq!(edge.source_handle.as_deref(), Some("source"));
    assert_eq!(edge.data.get("targetType"), Some(&json!("llm")));
}

#[test]
fn test_variable_entries_that_are_not_maps_are_skipped() {
    let mut tree = minimal_tree();
    tree["workflow"]["environment_variables"] =
        json!(["junk", {"variable": "TOKEN", "label": "Token", "type": "secret"}]);
    let app = DslParser::new().parse_value(&tree).unwrap();
    assert_eq!(app.workflow.environment_variables.len(), 1);
    assert_eq!(app.workflow.environment_variables[0].variable, "TOKEN");
}

#[test]
fn test_parse_file_not_found() {
    let err = DslParser::new()
        .parse_file("does/not/exist.yml")
        .expect_err("missing file must fail");
    assert!(matches!(err, ParseError::FileNotFound(_)));
    assert_eq!(err.to_string(), "File not found: does/not/exist.yml");
}

#[test]
fn test_parse_file_uses_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.json");
    std::fs::write(&path, minimal_tree().to_string()).unwrap();

    let app = DslParser::new()
        .parse_file(&path)
        .expect("Failed to parse JSON file");
    assert_eq!(app.name, "M");
}
