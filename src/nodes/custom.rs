use super::{DATA_HEADER_KEYS, NodeBase};
use crate::error::GenerateError;
use crate::tree::{self, Tree, Value};

/// A node of a type registered at runtime.
///
/// The payload is kept as an opaque map, so documents using node types this crate knows
/// nothing about (`if-else`, `iteration`, `http-request`...) survive a round trip once a
/// parser is registered for them.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomNode {
    pub base: NodeBase,
    node_type: String,
    /// Everything under `data` except the common header.
    pub fields: Tree,
}

impl CustomNode {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            base: NodeBase::new(id, ""),
            node_type: node_type.into(),
            fields: Tree::new(),
        }
    }

    /// Reads a node envelope, keeping its payload verbatim.
    pub fn from_tree(node_type: impl Into<String>, value: &Value) -> Self {
        let empty = Tree::new();
        let node = value.as_object().unwrap_or(&empty);
        let fields = tree::opt_map(node, "data")
            .unwrap_or(&empty)
            .iter()
            .filter(|(key, _)| !DATA_HEADER_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            base: NodeBase::from_tree(node, ""),
            node_type: node_type.into(),
            fields,
        }
    }

    pub fn base(&self) -> &NodeBase {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn to_tree(&self) -> Result<Value, GenerateError> {
        let mut data = self.base.data_header(&self.node_type);
        data.extend(
            self.fields
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        Ok(self.base.to_tree(data))
    }
}
