use crate::error::ParseError;
use crate::nodes::{
    AnswerNode, CodeNode, CustomNode, EndNode, LlmNode, Node, NodeVariant, StartNode, ToolNode,
};
use crate::tree::Value;
use ahash::AHashMap;
use itertools::Itertools;
use std::fmt;

/// Defines the contract for turning one node entry of a document into a [`Node`].
pub trait NodeParser: Send + Sync {
    /// The `data.type` this parser handles. Nodes it returns must report the same type.
    fn node_type(&self) -> &str;
    fn parse(&self, node: &Value) -> Result<Node, ParseError>;
}

/// Defines the built-in node parsers and the function that registers them.
macro_rules! define_node_parsers {
    ( $( ($struct_name:ident, $variant:ty) ),* $(,)? ) => {
        $(
            struct $struct_name;
            impl NodeParser for $struct_name {
                fn node_type(&self) -> &str { <$variant as NodeVariant>::NODE_TYPE }
                fn parse(&self, node: &Value) -> Result<Node, ParseError> {
                    <$variant as NodeVariant>::from_tree(node).map(Node::from)
                }
            }
        )*

        fn register_default_parsers(registry: &mut AHashMap<String, Box<dyn NodeParser>>) {
            $( registry.insert(<$variant as NodeVariant>::NODE_TYPE.to_string(), Box::new($struct_name)); )*
        }
    };
}

define_node_parsers! {
    (StartNodeParser, StartNode),
    (EndNodeParser, EndNode),
    (AnswerNodeParser, AnswerNode),
    (LlmNodeParser, LlmNode),
    (ToolNodeParser, ToolNode),
    (CodeNodeParser, CodeNode),
}

/// Keeps every node of one type as a [`CustomNode`], payload untouched.
///
/// Registering one of these is enough to make documents that use node types like
/// `if-else` or `http-request` parse and round-trip.
pub struct PassthroughParser {
    node_type: String,
}

impl PassthroughParser {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
        }
    }
}

impl NodeParser for PassthroughParser {
    fn node_type(&self) -> &str {
        &self.node_type
    }

    fn parse(&self, node: &Value) -> Result<Node, ParseError> {
        Ok(CustomNode::from_tree(self.node_type.as_str(), node).into())
    }
}

/// Adapts a closure into a [`NodeParser`].
pub struct FnNodeParser<F> {
    node_type: String,
    parse: F,
}

impl<F> FnNodeParser<F>
where
    F: Fn(&Value) -> Result<Node, ParseError> + Send + Sync,
{
    pub fn new(node_type: impl Into<String>, parse: F) -> Self {
        Self {
            node_type: node_type.into(),
            parse,
        }
    }
}

impl<F> NodeParser for FnNodeParser<F>
where
    F: Fn(&Value) -> Result<Node, ParseError> + Send + Sync,
{
    fn node_type(&self) -> &str {
        &self.node_type
    }

    fn parse(&self, node: &Value) -> Result<Node, ParseError> {
        (self.parse)(node)
    }
}

/// Maps `data.type` discriminators to the parser that builds that kind of node.
pub struct NodeRegistry {
    parsers: AHashMap<String, Box<dyn NodeParser>>,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("types", &self.supported_types())
            .finish()
    }
}

impl NodeRegistry {
    /// A registry with the six built-in node types.
    pub fn new() -> Self {
        let mut parsers: AHashMap<String, Box<dyn NodeParser>> = AHashMap::new();
        register_default_parsers(&mut parsers);
        Self { parsers }
    }

    /// A registry that knows no node types at all.
    pub fn empty() -> Self {
        Self {
            parsers: AHashMap::new(),
        }
    }

    /// Adds or replaces the parser for `node_type`.
    ///
    /// Fails when the parser declares a different type than the one it is registered under.
    pub fn register_node_type(
        &mut self,
        node_type: &str,
        parser: Box<dyn NodeParser>,
    ) -> Result<(), ParseError> {
        if parser.node_type() != node_type {
            return Err(ParseError::InvalidNodeParser {
                node_type: node_type.to_string(),
                produced: parser.node_type().to_string(),
            });
        }
        self.parsers.insert(node_type.to_string(), parser);
        Ok(())
    }

    /// Registers a parser under the type it declares.
    pub fn register(&mut self, parser: Box<dyn NodeParser>) {
        self.parsers.insert(parser.node_type().to_string(), parser);
    }

    pub fn unregister(&mut self, node_type: &str) -> Option<Box<dyn NodeParser>> {
        self.parsers.remove(node_type)
    }

    /// Builds a node from one entry of `workflow.graph.nodes`, dispatching on `data.type`.
    ///
    /// An absent or non-string discriminator is looked up as the empty string.
    pub fn create_from_tree(&self, node: &Value) -> Result<Node, ParseError> {
        let node_type = node
            .get("data")
            .and_then(|data| data.get("type"))
            .and_then(Value::as_str)
            .unwrap_or("");

        let parser = self
            .parsers
            .get(node_type)
            .ok_or_else(|| ParseError::UnsupportedNodeType(node_type.to_string()))?;

        let parsed = parser.parse(node)?;
        if parsed.node_type() != node_type {
            return Err(ParseError::InvalidNodeParser {
                node_type: node_type.to_string(),
                produced: parsed.node_type().to_string(),
            });
        }
        Ok(parsed)
    }

    /// Registered discriminators in alphabetical order.
    pub fn supported_types(&self) -> Vec<&str> {
        self.parsers.keys().map(String::as_str).sorted().collect()
    }

    pub fn is_type_supported(&self, node_type: &str) -> bool {
        self.parsers.contains_key(node_type)
    }
}
