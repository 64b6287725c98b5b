use super::{NodeBase, node_variant};
use crate::tree::{self, Tree};
use serde::{Deserialize, Serialize};

/// Streams a reply back to the user in chat-style apps.
///
/// `answer` is an opaque template such as `"{{#llm.text#}}"`; placeholders are not checked
/// against declared variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerNode {
    #[serde(skip)]
    pub base: NodeBase,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub answer: String,
    #[serde(
        default,
        skip_serializing_if = "Tree::is_empty",
        deserialize_with = "tree::map_or_empty"
    )]
    pub variables: Tree,
    #[serde(flatten)]
    pub extra: Tree,
}

node_variant!(AnswerNode => Answer, "answer", "直接回复");

impl AnswerNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            base: NodeBase::new(id, <Self as super::NodeVariant>::DEFAULT_TITLE),
            answer: String::new(),
            variables: Tree::new(),
            extra: Tree::new(),
        }
    }

    pub fn set_answer(&mut self, answer: impl Into<String>) -> &mut Self {
        self.answer = answer.into();
        self
    }

    pub fn set_variables(&mut self, variables: Tree) -> &mut Self {
        self.variables = variables;
        self
    }
}
