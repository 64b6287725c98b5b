use super::{NodeBase, node_variant};
use crate::core::Variable;
use crate::tree;
use serde::{Deserialize, Serialize};

/// Entry point of a workflow; declares the inputs a run is started with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartNode {
    #[serde(skip)]
    pub base: NodeBase,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "tree::seq_or_empty"
    )]
    pub variables: Vec<Variable>,
    #[serde(flatten)]
    pub extra: tree::Tree,
}

node_variant!(StartNode => Start, "start", "开始");

impl StartNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            base: NodeBase::new(id, <Self as super::NodeVariant>::DEFAULT_TITLE),
            variables: Vec::new(),
            extra: tree::Tree::new(),
        }
    }

    pub fn add_variable(&mut self, variable: Variable) -> &mut Self {
        self.variables.push(variable);
        self
    }

    /// Declares an input; the label falls back to the variable name.
    pub fn add_input(
        &mut self,
        name: &str,
        var_type: &str,
        required: bool,
        label: Option<&str>,
    ) -> &mut Self {
        let variable =
            Variable::new(name, label.unwrap_or(name), var_type).with_required(required);
        self.add_variable(variable)
    }
}
