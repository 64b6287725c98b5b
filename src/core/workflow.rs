use super::{Graph, Variable};
use crate::error::{GenerateError, ParseError};
use crate::parser::NodeRegistry;
use crate::tree::{self, Tree, Value};
use tracing::warn;

/// A graph plus the variables and feature flags that travel with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workflow {
    pub graph: Graph,
    pub environment_variables: Vec<Variable>,
    pub conversation_variables: Vec<Variable>,
    /// Free-form feature switches such as `file_upload` or `opening_statement`.
    pub features: Tree,
}

impl Workflow {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            ..Self::default()
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn set_graph(&mut self, graph: Graph) -> &mut Self {
        self.graph = graph;
        self
    }

    pub fn add_environment_variable(&mut self, variable: Variable) -> &mut Self {
        self.environment_variables.push(variable);
        self
    }

    pub fn add_conversation_variable(&mut self, variable: Variable) -> &mut Self {
        self.conversation_variables.push(variable);
        self
    }

    pub fn feature(&self, name: &str) -> Option<&Value> {
        self.features.get(name)
    }

    pub fn set_feature(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.features.insert(name.into(), value.into());
        self
    }

    pub fn remove_feature(&mut self, name: &str) -> Option<Value> {
        self.features.shift_remove(name)
    }

    pub fn from_tree(workflow: &Tree, registry: &NodeRegistry) -> Result<Self, ParseError> {
        let empty = Tree::new();
        let graph = tree::opt_map(workflow, "graph").unwrap_or(&empty);

        Ok(Self {
            graph: Graph::from_tree(graph, registry)?,
            environment_variables: variables(workflow, "environment_variables")?,
            conversation_variables: variables(workflow, "conversation_variables")?,
            features: tree::opt_map(workflow, "features")
                .cloned()
                .unwrap_or_default(),
        })
    }

    /// `graph` is always written; the other sections only when they have entries.
    pub fn to_tree(&self) -> Result<Value, GenerateError> {
        let mut workflow = Tree::new();
        workflow.insert("graph".into(), self.graph.to_tree()?);

        if !self.environment_variables.is_empty() {
            workflow.insert(
                "environment_variables".into(),
                variables_to_tree(&self.environment_variables)?,
            );
        }
        if !self.conversation_variables.is_empty() {
            workflow.insert(
                "conversation_variables".into(),
                variables_to_tree(&self.conversation_variables)?,
            );
        }
        if !self.features.is_empty() {
            workflow.insert("features".into(), Value::Object(self.features.clone()));
        }

        Ok(Value::Object(workflow))
    }
}

fn variables(workflow: &Tree, key: &str) -> Result<Vec<Variable>, ParseError> {
    let Some(entries) = workflow.get(key).and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let mut parsed = Vec::with_capacity(entries.len());
    for entry in entries {
        if !entry.is_object() {
            warn!(
                section = key,
                kind = tree::kind_name(entry),
                "skipping variable entry that is not a map"
            );
            continue;
        }
        parsed.push(Variable::from_tree(entry)?);
    }
    Ok(parsed)
}

fn variables_to_tree(variables: &[Variable]) -> Result<Value, GenerateError> {
    variables
        .iter()
        .map(Variable::to_tree)
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}
