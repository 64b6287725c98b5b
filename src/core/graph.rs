use super::Edge;
use crate::error::{GenerateError, ParseError};
use crate::nodes::Node;
use crate::parser::NodeRegistry;
use crate::tree::{self, Tree, Value};
use indexmap::IndexMap;
use tracing::{trace, warn};

/// The nodes and edges of a workflow, each indexed by id.
///
/// Both indexes keep insertion order. Adding an entry whose id is already present replaces
/// the old one in place. Structural rules are only checked by [`Graph::validate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: IndexMap<String, Node>,
    edges: IndexMap<String, Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: impl Into<Node>) -> &mut Self {
        let node = node.into();
        self.nodes.insert(node.id().to_string(), node);
        self
    }

    pub fn add_edge(&mut self, edge: Edge) -> &mut Self {
        self.edges.insert(edge.id.clone(), edge);
        self
    }

    /// Removes a node together with every edge that starts or ends at it.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let removed = self.nodes.shift_remove(id)?;
        self.edges
            .retain(|_, edge| edge.source != id && edge.target != id);
        Some(removed)
    }

    pub fn remove_edge(&mut self, id: &str) -> Option<Edge> {
        self.edges.shift_remove(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Adds an edge with the default `"{source}-{target}"` id.
    pub fn connect_nodes(&mut self, source: &str, target: &str) -> &mut Self {
        self.add_edge(Edge::new(source, target))
    }

    pub fn incoming_edges<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges().filter(move |edge| edge.target == id)
    }

    pub fn outgoing_edges<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges().filter(move |edge| edge.source == id)
    }

    pub fn start_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes().filter(|node| node.node_type() == "start")
    }

    /// Nodes that finish a run: `end` in workflows, `answer` in chat apps.
    pub fn end_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes()
            .filter(|node| matches!(node.node_type(), "end" | "answer"))
    }

    /// Checks the graph's structure and returns one message per problem found.
    ///
    /// An empty list means the graph is well formed. Messages come in a fixed order: a missing
    /// start node, a missing end or answer node, then dangling edge endpoints in edge order.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.start_nodes().next().is_none() {
            errors.push("Graph must have at least one start node".to_string());
        }
        if self.end_nodes().next().is_none() {
            errors.push("Graph must have at least one end or answer node".to_string());
        }

        for edge in self.edges() {
            if !self.has_node(&edge.source) {
                errors.push(format!(
                    "Edge {} references non-existent source node {}",
                    edge.id, edge.source
                ));
            }
            if !self.has_node(&edge.target) {
                errors.push(format!(
                    "Edge {} references non-existent target node {}",
                    edge.id, edge.target
                ));
            }
        }

        errors
    }

    /// Builds a graph from `workflow.graph`, dispatching every node through `registry`.
    ///
    /// A missing or non-list `nodes` / `edges` key is read as empty, and node entries that
    /// are not maps are skipped. A failure inside one entry aborts the whole parse, wrapped
    /// with that entry's id.
    pub fn from_tree(graph: &Tree, registry: &NodeRegistry) -> Result<Self, ParseError> {
        let mut parsed = Graph::new();

        for entry in entries(graph, "nodes") {
            if !entry.is_object() {
                warn!(
                    kind = tree::kind_name(entry),
                    "skipping node entry that is not a map"
                );
                continue;
            }
            let node = registry.create_from_tree(entry).map_err(|e| ParseError::Node {
                id: entry_id(entry),
                source: Box::new(e),
            })?;
            trace!(id = node.id(), node_type = node.node_type(), "parsed node");
            parsed.add_node(node);
        }

        for entry in entries(graph, "edges") {
            if !entry.is_object() {
                return Err(ParseError::EdgeNotMap {
                    got: tree::kind_name(entry),
                });
            }
            let edge = Edge::from_tree(entry).map_err(|e| ParseError::Edge {
                id: entry_id(entry),
                source: Box::new(e),
            })?;
            parsed.add_edge(edge);
        }

        Ok(parsed)
    }

    pub fn to_tree(&self) -> Result<Value, GenerateError> {
        let nodes = self
            .nodes()
            .map(Node::to_tree)
            .collect::<Result<Vec<_>, _>>()?;
        let edges = self
            .edges()
            .map(Edge::to_tree)
            .collect::<Result<Vec<_>, _>>()?;

        let mut graph = Tree::new();
        graph.insert("nodes".into(), Value::Array(nodes));
        graph.insert("edges".into(), Value::Array(edges));
        Ok(Value::Object(graph))
    }
}

fn entries<'a>(map: &'a Tree, key: &str) -> &'a [Value] {
    map.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn entry_id(entry: &Value) -> String {
    entry
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}
