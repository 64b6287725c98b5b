//! Tests for node type dispatch and runtime registration.
mod common;
use common::*;
use dify_dsl::prelude::*;
use serde_json::json;

#[test]
fn test_default_registry_types() {
    let registry = NodeRegistry::new();
    assert_eq!(
        registry.supported_types(),
        ["answer", "code", "end", "llm", "start", "tool"]
    );
    assert!(registry.is_type_supported("llm"));
    assert!(!registry.is_type_supported("if-else"));
    assert!(NodeRegistry::empty().supported_types().is_empty());
}

#[test]
fn test_dispatch_on_data_type() {
    let registry = NodeRegistry::new();
    let node = registry
        .create_from_tree(&node_tree("llm1", "llm", json!({})))
        .expect("Failed to dispatch llm node");
    assert!(node.as_llm().is_some());
    assert_eq!(node.id(), "llm1");
    assert_eq!(node.node_type(), "llm");
}

#[test]
fn test_unsupported_type() {
    let err = NodeRegistry::new()
        .create_from_tree(&node_tree("x", "iteration", json!({})))
        .expect_err("unknown type must fail");
    assert!(matches!(err, ParseError::UnsupportedNodeType(ref t) if t == "iteration"));
    assert_eq!(err.to_string(), "Unsupported node type: iteration");
}

#[test]
fn test_passthrough_parser_keeps_payload() {
    let mut registry = NodeRegistry::new();
    registry.register(Box::new(PassthroughParser::new("custom")));
    assert!(registry.is_type_supported("custom"));

    let node = registry
        .create_from_tree(&node_tree("c1", "custom", json!({"foo": [1, 2]})))
        .unwrap();
    let custom = node.as_custom().expect("custom node");
    assert_eq!(custom.node_type(), "custom");
    assert_eq!(custom.field("foo"), Some(&json!([1, 2])));
    assert_eq!(custom.base.title, "c1");
}

#[test]
fn test_register_node_type_rejects_mismatch() {
    let mut registry = NodeRegistry::new();
    let err = registry
        .register_node_type("if-else", Box::new(PassthroughParser::new("iteration")))
        .expect_err("mismatched type must be rejected");
    assert_eq!(
        err.to_string(),
        "Parser registered for node type 'if-else' produces 'iteration' nodes"
    );
    assert!(!registry.is_type_supported("if-else"));

    registry
        .register_node_type("if-else", Box::new(PassthroughParser::new("if-else")))
        .expect("matching type is accepted");
    assert!(registry.is_type_supported("if-else"));
}

#[test]
fn test_parser_producing_wrong_type_is_rejected() {
    let mut registry = NodeRegistry::new();
    registry.register(Box::new(FnNodeParser::new("note", |node: &Value| {
        Ok(CustomNode::from_tree("sticky", node).into())
    })));

    let err = registry
        .create_from_tree(&node_tree("n1", "note", json!({})))
        .expect_err("produced type differs");
    assert!(matches!(err, ParseError::InvalidNodeParser { .. }));
}

#[test]
fn test_fn_parser_builds_nodes_from_closure() {
    // Legacy "answer-v0" nodes get a fixed answer template
    let mut registry = NodeRegistry::new();
    registry.register(Box::new(FnNodeParser::new("answer-v0", |node: &Value| {
        let id = node["id"].as_str().unwrap_or_default();
        let mut custom = CustomNode::new(id, "answer-v0");
        custom.set_field("answer", "{{#sys.query#}}");
        Ok(custom.into())
    })));

    let node = registry
        .create_from_tree(&node_tree("legacy", "answer-v0", json!({})))
        .unwrap();
    assert_eq!(node.id(), "legacy");
    assert_eq!(
        node.as_custom().and_then(|c| c.field("answer")),
        Some(&json!("{{#sys.query#}}"))
    );
}

#[test]
fn test_builtin_type_can_be_overridden_and_unregistered() {
    let mut registry = NodeRegistry::new();
    registry.register(Box::new(PassthroughParser::new("llm")));
    let node = registry
        .create_from_tree(&node_tree("llm1", "llm", json!({"model": {"name": "x"}})))
        .unwrap();
    assert!(node.as_custom().is_some(), "passthrough replaces the built-in parser");

    assert!(registry.unregister("llm").is_some());
    assert!(!registry.is_type_supported("llm"));
}

#[test]
fn test_parser_builder_registers_types() {
    let parser = DslParser::builder()
        .with_node_parser(Box::new(PassthroughParser::new("if-else")))
        .build()
        .expect("Failed to build parser");
    let app = parser.parse(IF_ELSE_YAML).expect("Failed to parse if-else app");

    let branch = app.workflow.graph.node("branch").unwrap();
    assert_eq!(branch.node_type(), "if-else");
    assert_eq!(
        branch.as_custom().unwrap().field("logical_operator"),
        Some(&json!("and"))
    );
    assert!(app.workflow.graph.validate().is_empty());
}

#[test]
fn test_parser_builder_checks_explicit_type() {
    let err = DslParser::builder()
        .with_node_type("if-else", Box::new(PassthroughParser::new("question-classifier")))
        .build()
        .expect_err("mismatched registration");
    assert!(matches!(err, ParseError::InvalidNodeParser { .. }));
}

#[test]
fn test_without_registration_if_else_fails() {
    let message = DslParser::new()
        .parse(IF_ELSE_YAML)
        .expect_err("if-else is not built in")
        .to_string();
    assert_eq!(
        message,
        "Failed to parse node branch: Unsupported node type: if-else"
    );
}

#[test]
fn test_empty_registry_rejects_builtins() {
    let parser = DslParser::builder()
        .with_registry(NodeRegistry::empty())
        .build()
        .unwrap();
    let tree = tree_with_graph(json!([node_tree("start", "start", json!({}))]), json!([]));
    let message = parser.parse_value(&tree).unwrap_err().to_string();
    assert_eq!(
        message,
        "Failed to parse node start: Unsupported node type: start"
    );
}

#[test]
fn test_registry_mut_on_parser() {
    let mut parser = DslParser::new();
    parser
        .registry_mut()
        .register(Box::new(PassthroughParser::new("if-else")));
    assert!(parser.parse(IF_ELSE_YAML).is_ok());
}
