use crate::error::{GenerateError, ParseError};
use crate::tree::{self, Tree, Value};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EDGE_TYPE: &str = "custom";

fn default_edge_type() -> String {
    DEFAULT_EDGE_TYPE.to_string()
}

/// A directed connection between two node ids.
///
/// Neither endpoint is checked against the graph when the edge is built; dangling
/// references are reported by [`Graph::validate`](super::Graph::validate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default = "default_edge_type")]
    pub edge_type: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Tree::is_empty",
        deserialize_with = "tree::map_or_empty"
    )]
    pub data: Tree,
    #[serde(default, skip_serializing_if = "tree::is_zero")]
    pub z_index: i64,
}

impl Edge {
    /// Creates an edge whose id is `"{source}-{target}"`.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        let id = Self::default_id(&source, &target);
        Self::with_id(id, source, target)
    }

    pub fn with_id(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            edge_type: default_edge_type(),
            source: source.into(),
            target: target.into(),
            selected: false,
            source_handle: None,
            target_handle: None,
            data: Tree::new(),
            z_index: 0,
        }
    }

    pub fn default_id(source: &str, target: &str) -> String {
        format!("{}-{}", source, target)
    }

    pub fn with_handles(
        mut self,
        source_handle: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        self.source_handle = Some(source_handle.into());
        self.target_handle = Some(target_handle.into());
        self
    }

    pub fn with_data(mut self, data: Tree) -> Self {
        self.data = data;
        self
    }

    /// Builds an edge from one entry of `workflow.graph.edges`.
    ///
    /// `source` and `target` are required; a missing or empty `id` falls back to the
    /// default `"{source}-{target}"` scheme.
    pub fn from_tree(value: &Value) -> Result<Self, ParseError> {
        let mut edge = Edge::deserialize(value).map_err(|e| ParseError::invalid("edge", e))?;
        if edge.id.is_empty() {
            edge.id = Self::default_id(&edge.source, &edge.target);
        }
        Ok(edge)
    }

    pub fn to_tree(&self) -> Result<Value, GenerateError> {
        serde_json::to_value(self).map_err(|e| GenerateError::Tree(e.to_string()))
    }
}
