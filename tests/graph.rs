//! Tests for the graph container: indexing, cascading removal, queries and validation.
mod common;
use common::*;
use dify_dsl::prelude::*;

#[test]
fn test_add_node_replaces_same_id_in_place() {
    let mut graph = graph_of(&[("start", "start"), ("llm1", "llm"), ("end", "end")]);

    let mut replacement = LlmNode::new("llm1");
    replacement.set_title("Rewritten");
    graph.add_node(replacement);

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.node("llm1").unwrap().title(), "Rewritten");
    let ids: Vec<&str> = graph.nodes().map(Node::id).collect();
    assert_eq!(ids, ["start", "llm1", "end"], "position must be kept");
}

#[test]
fn test_add_edge_replaces_same_id() {
    let mut graph = graph_of(&[("a", "start"), ("b", "end"), ("c", "end")]);
    graph.add_edge(Edge::with_id("e1", "a", "b"));
    graph.add_edge(Edge::with_id("e1", "a", "c"));

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.edge("e1").unwrap().target, "c");
}

#[test]
fn test_connect_nodes_uses_default_edge_id() {
    let mut graph = graph_of(&[("start", "start"), ("end", "end")]);
    graph.connect_nodes("start", "end");

    let edge = graph.edge("start-end").expect("edge start-end");
    assert_eq!(edge.source, "start");
    assert_eq!(edge.target, "end");
    assert_eq!(edge.edge_type, "custom");
}

#[test]
fn test_remove_node_cascades_to_edges() {
    let mut graph = graph_of(&[("start", "start"), ("llm1", "llm"), ("end", "end")]);
    graph
        .connect_nodes("start", "llm1")
        .connect_nodes("llm1", "end")
        .connect_nodes("start", "end");

    let removed = graph.remove_node("llm1").expect("node should exist");
    assert_eq!(removed.node_type(), "llm");
    assert!(!graph.has_node("llm1"));
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.edge("start-end").is_some());

    assert!(graph.remove_node("llm1").is_none());
}

#[test]
fn test_remove_edge_keeps_nodes() {
    let mut graph = graph_of(&[("start", "start"), ("end", "end")]);
    graph.connect_nodes("start", "end");

    assert!(graph.remove_edge("start-end").is_some());
    assert!(graph.remove_edge("start-end").is_none());
    assert_eq!(graph.node_count(), 2);
}

#[test]
fn test_incoming_and_outgoing_edges() {
    let mut graph = graph_of(&[("start", "start"), ("a", "llm"), ("b", "llm"), ("end", "end")]);
    graph
        .connect_nodes("start", "a")
        .connect_nodes("start", "b")
        .connect_nodes("a", "end")
        .connect_nodes("b", "end");

    let outgoing: Vec<&str> = graph.outgoing_edges("start").map(|e| e.target.as_str()).collect();
    assert_eq!(outgoing, ["a", "b"]);

    let incoming: Vec<&str> = graph.incoming_edges("end").map(|e| e.source.as_str()).collect();
    assert_eq!(incoming, ["a", "b"]);

    assert_eq!(graph.incoming_edges("start").count(), 0);
    assert_eq!(graph.outgoing_edges("end").count(), 0);
}

#[test]
fn test_start_and_end_nodes() {
    let graph = graph_of(&[
        ("start", "start"),
        ("llm1", "llm"),
        ("reply", "answer"),
        ("end", "end"),
    ]);

    let starts: Vec<&str> = graph.start_nodes().map(Node::id).collect();
    assert_eq!(starts, ["start"]);

    let ends: Vec<&str> = graph.end_nodes().map(Node::id).collect();
    assert_eq!(ends, ["reply", "end"]);
}

#[test]
fn test_validate_well_formed_graph() {
    let mut graph = graph_of(&[("start", "start"), ("llm1", "llm"), ("end", "end")]);
    graph.connect_nodes("start", "llm1").connect_nodes("llm1", "end");
    assert!(graph.validate().is_empty());
}

#[test]
fn test_answer_node_satisfies_end_requirement() {
    let graph = graph_of(&[("start", "start"), ("reply", "answer")]);
    assert!(graph.validate().is_empty());
}

#[test]
fn test_validate_empty_graph() {
    let errors = Graph::new().validate();
    assert_eq!(
        errors,
        [
            "Graph must have at least one start node",
            "Graph must have at least one end or answer node",
        ]
    );
}

#[test]
fn test_validate_dangling_edges_in_order() {
    let mut graph = graph_of(&[("start", "start"), ("end", "end")]);
    graph.add_edge(Edge::with_id("e1", "start", "ghost"));
    graph.add_edge(Edge::with_id("e2", "nowhere", "void"));

    assert_eq!(
        graph.validate(),
        [
            "Edge e1 references non-existent target node ghost",
            "Edge e2 references non-existent source node nowhere",
            "Edge e2 references non-existent target node void",
        ]
    );
}

#[test]
fn test_custom_nodes_do_not_count_as_start_or_end() {
    let graph = graph_of(&[("branch", "if-else")]);
    assert_eq!(graph.validate().len(), 2);
    assert_eq!(graph.node("branch").unwrap().node_type(), "if-else");
}

#[test]
fn test_node_mut_edits_in_place() {
    let mut graph = graph_of(&[("llm1", "llm")]);
    graph
        .node_mut("llm1")
        .and_then(Node::as_llm_mut)
        .expect("llm node")
        .set_system_prompt("Be brief.");

    let llm = graph.node("llm1").and_then(Node::as_llm).unwrap();
    assert_eq!(llm.system_prompt(), Some("Be brief."));
}
