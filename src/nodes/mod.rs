//! Workflow nodes.
//!
//! A [`Node`] is one of the six built-in variants or a [`CustomNode`] produced by a parser
//! registered at runtime. Every variant owns a [`NodeBase`] with the fields shared by all
//! nodes (id, title, layout) plus its own payload, which lives under the node's `data` map
//! in the document.
//!
//! ```text
//! - id: llm1
//!   type: custom          # UI shape tag, unrelated to dispatch
//!   position: {x: 0, y: 0}
//!   data:
//!     type: llm           # discriminator used by the registry
//!     title: LLM
//!     desc: ''
//!     selected: false
//!     model: {...}        # variant payload
//! ```

mod answer;
mod base;
mod code;
mod custom;
mod end;
mod llm;
mod start;
mod tool;

pub use answer::AnswerNode;
pub use base::{NodeBase, Position};
pub use code::{CodeNode, CodeOutput, CodeVariable};
pub use custom::CustomNode;
pub use end::{EndNode, OutputBinding};
pub use llm::{LlmNode, PromptMessage, PromptTemplate};
pub use start::StartNode;
pub use tool::{RetryConfig, ToolNode};

use crate::error::{GenerateError, ParseError};
use crate::tree::{self, Tree, Value};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Keys of a node's `data` map that belong to the common header rather than the payload.
pub(crate) const DATA_HEADER_KEYS: [&str; 4] = ["type", "title", "desc", "selected"];

/// The contract shared by the built-in node variants.
///
/// A variant's payload is a serde record: its field attributes define both the default used
/// when a key is absent and whether the field is written out. The common envelope is handled
/// here, so a variant only has to describe its own fields.
pub trait NodeVariant: Serialize + DeserializeOwned + Sized {
    /// Discriminator written to `data.type` and used for registry dispatch.
    const NODE_TYPE: &'static str;
    /// Title used when a document omits `data.title`.
    const DEFAULT_TITLE: &'static str;

    fn base(&self) -> &NodeBase;
    fn base_mut(&mut self) -> &mut NodeBase;

    /// Restores payload invariants after decoding.
    fn normalize(&mut self) {}

    fn node_type(&self) -> &str {
        Self::NODE_TYPE
    }

    fn id(&self) -> &str {
        &self.base().id
    }

    fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.base_mut().title = title.into();
        self
    }

    fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.base_mut().description = description.into();
        self
    }

    fn set_position(&mut self, x: f64, y: f64) -> &mut Self {
        self.base_mut().position = Position::new(x, y);
        self
    }

    fn from_tree(value: &Value) -> Result<Self, ParseError> {
        let empty = Tree::new();
        let node = value.as_object().unwrap_or(&empty);
        let base = NodeBase::from_tree(node, Self::DEFAULT_TITLE);
        let data = tree::opt_map(node, "data").unwrap_or(&empty);

        let payload: Tree = data
            .iter()
            .filter(|(key, _)| !DATA_HEADER_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let mut variant: Self = serde_json::from_value(Value::Object(payload))
            .map_err(|e| ParseError::invalid(format!("{} node data", Self::NODE_TYPE), e))?;
        *variant.base_mut() = base;
        variant.normalize();
        Ok(variant)
    }

    fn to_tree(&self) -> Result<Value, GenerateError> {
        let mut data = self.base().data_header(Self::NODE_TYPE);
        match serde_json::to_value(self).map_err(|e| GenerateError::Tree(e.to_string()))? {
            Value::Object(payload) => data.extend(payload),
            other => {
                return Err(GenerateError::Tree(format!(
                    "{} node payload must be a map, got {}",
                    Self::NODE_TYPE,
                    tree::kind_name(&other)
                )));
            }
        }
        Ok(self.base().to_tree(data))
    }
}

macro_rules! node_variant {
    ($ty:ident => $variant:ident, $node_type:expr, $default_title:expr $(, normalize = $normalize:path)?) => {
        impl $crate::nodes::NodeVariant for $ty {
            const NODE_TYPE: &'static str = $node_type;
            const DEFAULT_TITLE: &'static str = $default_title;

            fn base(&self) -> &$crate::nodes::NodeBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut $crate::nodes::NodeBase {
                &mut self.base
            }

            $(
                fn normalize(&mut self) {
                    $normalize(self)
                }
            )?
        }

        impl From<$ty> for $crate::nodes::Node {
            fn from(node: $ty) -> Self {
                $crate::nodes::Node::$variant(node)
            }
        }
    };
}
pub(crate) use node_variant;

impl From<CustomNode> for Node {
    fn from(node: CustomNode) -> Self {
        Node::Custom(node)
    }
}

/// One step of a workflow graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Start(StartNode),
    End(EndNode),
    Answer(AnswerNode),
    Llm(LlmNode),
    Tool(ToolNode),
    Code(CodeNode),
    Custom(CustomNode),
}

macro_rules! on_each {
    ($node:expr, $inner:ident => $body:expr) => {
        match $node {
            Node::Start($inner) => $body,
            Node::End($inner) => $body,
            Node::Answer($inner) => $body,
            Node::Llm($inner) => $body,
            Node::Tool($inner) => $body,
            Node::Code($inner) => $body,
            Node::Custom($inner) => $body,
        }
    };
}

macro_rules! variant_accessors {
    ($($variant:ident($ty:ty) => $as_ref:ident, $as_mut:ident;)*) => {
        $(
            pub fn $as_ref(&self) -> Option<&$ty> {
                match self {
                    Node::$variant(node) => Some(node),
                    _ => None,
                }
            }

            pub fn $as_mut(&mut self) -> Option<&mut $ty> {
                match self {
                    Node::$variant(node) => Some(node),
                    _ => None,
                }
            }
        )*
    };
}

impl Node {
    pub fn base(&self) -> &NodeBase {
        on_each!(self, node => node.base())
    }

    pub fn base_mut(&mut self) -> &mut NodeBase {
        on_each!(self, node => node.base_mut())
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn title(&self) -> &str {
        &self.base().title
    }

    pub fn description(&self) -> &str {
        &self.base().description
    }

    /// The semantic discriminator (`data.type`), e.g. `"llm"`.
    pub fn node_type(&self) -> &str {
        on_each!(self, node => node.node_type())
    }

    pub fn to_tree(&self) -> Result<Value, GenerateError> {
        on_each!(self, node => node.to_tree())
    }

    variant_accessors! {
        Start(StartNode) => as_start, as_start_mut;
        End(EndNode) => as_end, as_end_mut;
        Answer(AnswerNode) => as_answer, as_answer_mut;
        Llm(LlmNode) => as_llm, as_llm_mut;
        Tool(ToolNode) => as_tool, as_tool_mut;
        Code(CodeNode) => as_code, as_code_mut;
        Custom(CustomNode) => as_custom, as_custom_mut;
    }
}
