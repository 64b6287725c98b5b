use super::{NodeBase, node_variant};
use crate::tree::{self, Tree};
use serde::{Deserialize, Serialize};

/// Binds a workflow output name to the path of the value it reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputBinding {
    pub variable: String,
    #[serde(default, deserialize_with = "tree::seq_or_empty")]
    pub value_selector: Vec<String>,
    #[serde(flatten)]
    pub extra: Tree,
}

impl OutputBinding {
    pub fn new(variable: impl Into<String>, value_selector: Vec<String>) -> Self {
        Self {
            variable: variable.into(),
            value_selector,
            extra: Tree::new(),
        }
    }
}

/// Terminal node of a `workflow`-mode app; collects the run's outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndNode {
    #[serde(skip)]
    pub base: NodeBase,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "tree::seq_or_empty"
    )]
    pub outputs: Vec<OutputBinding>,
    #[serde(flatten)]
    pub extra: Tree,
}

node_variant!(EndNode => End, "end", "结束");

impl EndNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            base: NodeBase::new(id, <Self as super::NodeVariant>::DEFAULT_TITLE),
            outputs: Vec::new(),
            extra: Tree::new(),
        }
    }

    pub fn add_output<S: Into<String>>(
        &mut self,
        variable: impl Into<String>,
        value_selector: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        let selector = value_selector.into_iter().map(Into::into).collect();
        self.outputs.push(OutputBinding::new(variable, selector));
        self
    }
}
