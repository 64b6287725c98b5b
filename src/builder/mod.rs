//! A fluent way to assemble an [`App`] in code.
//!
//! Nodes added through the builder are chained: each one is connected to the node added
//! before it, so a linear pipeline needs no explicit edges.
//!
//! ```
//! use dify_dsl::builder::WorkflowBuilder;
//!
//! let app = WorkflowBuilder::new()
//!     .name("Summarizer")
//!     .start_node(|start| {
//!         start.add_input("text", "paragraph", true, None);
//!     })
//!     .llm_node(Some("llm1"), |llm| {
//!         llm.set_system_prompt("Summarize the input.");
//!     })
//!     .end_node(|end| {
//!         end.add_output("summary", ["llm1", "text"]);
//!     })
//!     .build();
//!
//! assert_eq!(app.workflow.graph.edge_count(), 2);
//! ```

use crate::core::{App, DEFAULT_ICON_BACKGROUND, DEFAULT_MODE, Graph, Variable};
use crate::nodes::{AnswerNode, CodeNode, EndNode, LlmNode, Node, StartNode, ToolNode};
use crate::tree::{Tree, Value};

pub const START_NODE_ID: &str = "start";
pub const END_NODE_ID: &str = "end";

/// Type used for builder-declared environment and conversation variables.
const DEFAULT_SCOPED_VARIABLE_TYPE: &str = "string";

pub struct WorkflowBuilder {
    app: App,
    graph: Graph,
    /// Id of the node the next added node gets connected to.
    last_node: Option<String>,
    generated_ids: usize,
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowBuilder {
    pub fn new() -> Self {
        Self {
            app: App::new("", DEFAULT_MODE),
            graph: Graph::new(),
            last_node: None,
            generated_ids: 0,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.app.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.app.description = description.into();
        self
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.app.mode = mode.into();
        self
    }

    /// Sets the icon; `background` falls back to the default color when `None`.
    pub fn icon(mut self, icon: impl Into<String>, background: Option<&str>) -> Self {
        self.app
            .set_icon(icon, background.unwrap_or(DEFAULT_ICON_BACKGROUND));
        self
    }

    pub fn environment_variable(
        mut self,
        name: &str,
        var_type: Option<&str>,
        default: Option<Value>,
    ) -> Self {
        let variable = scoped_variable(name, var_type, default);
        self.app.workflow.add_environment_variable(variable);
        self
    }

    pub fn conversation_variable(
        mut self,
        name: &str,
        var_type: Option<&str>,
        default: Option<Value>,
    ) -> Self {
        let variable = scoped_variable(name, var_type, default);
        self.app.workflow.add_conversation_variable(variable);
        self
    }

    /// Turns on the `file_upload` feature.
    pub fn enable_file_upload<S: Into<String>>(
        mut self,
        allowed_file_types: impl IntoIterator<Item = S>,
        number_limits: i64,
    ) -> Self {
        let types: Vec<Value> = allowed_file_types
            .into_iter()
            .map(|t| Value::String(t.into()))
            .collect();

        let mut file_upload = Tree::new();
        file_upload.insert("enabled".into(), true.into());
        file_upload.insert("allowed_file_types".into(), Value::Array(types));
        file_upload.insert("number_limits".into(), number_limits.into());
        self.app
            .workflow
            .set_feature("file_upload", Value::Object(file_upload));
        self
    }

    pub fn opening_statement(mut self, statement: impl Into<String>) -> Self {
        self.app
            .workflow
            .set_feature("opening_statement", statement.into());
        self
    }

    pub fn model_config(mut self, model_config: Option<Tree>) -> Self {
        self.app.model_config = model_config;
        self
    }

    pub fn dependency(mut self, name: impl Into<String>, dependency: Value) -> Self {
        self.app.add_dependency(name, dependency);
        self
    }

    /// Adds the `start` node. It becomes the head of the chain and is never connected to an
    /// earlier node.
    pub fn start_node(mut self, configure: impl FnOnce(&mut StartNode)) -> Self {
        let mut node = StartNode::new(START_NODE_ID);
        configure(&mut node);
        self.graph.add_node(node);
        self.last_node = Some(START_NODE_ID.to_string());
        self
    }

    pub fn llm_node(self, id: Option<&str>, configure: impl FnOnce(&mut LlmNode)) -> Self {
        self.chain_with(id, "llm", LlmNode::new, configure)
    }

    pub fn tool_node(self, id: Option<&str>, configure: impl FnOnce(&mut ToolNode)) -> Self {
        self.chain_with(id, "tool", ToolNode::new, configure)
    }

    pub fn code_node(self, id: Option<&str>, configure: impl FnOnce(&mut CodeNode)) -> Self {
        self.chain_with(id, "code", CodeNode::new, configure)
    }

    pub fn answer_node(self, id: Option<&str>, configure: impl FnOnce(&mut AnswerNode)) -> Self {
        self.chain_with(id, "answer", AnswerNode::new, configure)
    }

    pub fn end_node(self, configure: impl FnOnce(&mut EndNode)) -> Self {
        self.chain_with(Some(END_NODE_ID), "end", EndNode::new, configure)
    }

    /// Adds any node, including [`CustomNode`](crate::nodes::CustomNode)s, to the chain.
    pub fn custom_node(self, node: impl Into<Node>) -> Self {
        self.chain(node.into())
    }

    /// Adds an edge outside the chain, e.g. for branches.
    pub fn connect(mut self, source: &str, target: &str) -> Self {
        self.graph.connect_nodes(source, target);
        self
    }

    pub fn build(self) -> App {
        let mut app = self.app;
        app.workflow.graph = self.graph;
        app
    }

    fn chain_with<N>(
        mut self,
        id: Option<&str>,
        prefix: &str,
        create: impl FnOnce(String) -> N,
        configure: impl FnOnce(&mut N),
    ) -> Self
    where
        N: Into<Node>,
    {
        let id = match id {
            Some(id) => id.to_string(),
            None => self.next_id(prefix),
        };
        let mut node = create(id);
        configure(&mut node);
        self.chain(node.into())
    }

    fn chain(mut self, node: Node) -> Self {
        let id = node.id().to_string();
        self.graph.add_node(node);
        if let Some(previous) = &self.last_node {
            self.graph.connect_nodes(previous, &id);
        }
        self.last_node = Some(id);
        self
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.generated_ids += 1;
        format!("{}_{}", prefix, self.generated_ids)
    }
}

fn scoped_variable(name: &str, var_type: Option<&str>, default: Option<Value>) -> Variable {
    let variable = Variable::new(
        name,
        name,
        var_type.unwrap_or(DEFAULT_SCOPED_VARIABLE_TYPE),
    );
    match default {
        Some(value) => variable.with_default(value),
        None => variable,
    }
}
