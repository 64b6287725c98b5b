use super::{NodeBase, node_variant};
use crate::tree::{self, Tree, Value};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_CODE_LANGUAGE: &str = "python3";

/// Binds a script argument to an upstream value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeVariable {
    pub variable: String,
    #[serde(default, deserialize_with = "tree::seq_or_empty")]
    pub value_selector: Vec<String>,
    #[serde(flatten)]
    pub extra: Tree,
}

/// Declared type of one value returned by the script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeOutput {
    #[serde(rename = "type")]
    pub output_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Value>,
    #[serde(flatten)]
    pub extra: Tree,
}

/// Runs a Python or JavaScript snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeNode {
    #[serde(skip)]
    pub base: NodeBase,
    /// Always written, so an empty language survives a round trip; only an absent key
    /// falls back to `python3`.
    #[serde(default = "default_language")]
    pub code_language: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "tree::seq_or_empty"
    )]
    pub variables: Vec<CodeVariable>,
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "ordered_map_or_empty"
    )]
    pub outputs: IndexMap<String, CodeOutput>,
    #[serde(flatten)]
    pub extra: Tree,
}

node_variant!(CodeNode => Code, "code", "代码执行");

fn default_language() -> String {
    DEFAULT_CODE_LANGUAGE.to_string()
}

/// `outputs` may be exported as `[]` when there are none.
fn ordered_map_or_empty<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let map = tree::map_or_empty(deserializer)?;
    map.into_iter()
        .map(|(name, value)| {
            serde_json::from_value(value)
                .map(|parsed| (name.clone(), parsed))
                .map_err(|e| serde::de::Error::custom(format!("output {name}: {e}")))
        })
        .collect()
}

impl CodeNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            base: NodeBase::new(id, <Self as super::NodeVariant>::DEFAULT_TITLE),
            code_language: default_language(),
            code: String::new(),
            variables: Vec::new(),
            outputs: IndexMap::new(),
            extra: Tree::new(),
        }
    }

    pub fn set_code_language(&mut self, language: impl Into<String>) -> &mut Self {
        self.code_language = language.into();
        self
    }

    pub fn set_code(&mut self, code: impl Into<String>) -> &mut Self {
        self.code = code.into();
        self
    }

    pub fn add_variable<S: Into<String>>(
        &mut self,
        variable: impl Into<String>,
        value_selector: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        self.variables.push(CodeVariable {
            variable: variable.into(),
            value_selector: value_selector.into_iter().map(Into::into).collect(),
            extra: Tree::new(),
        });
        self
    }

    /// Declares an output; a second declaration with the same name replaces the first.
    pub fn add_output(
        &mut self,
        name: impl Into<String>,
        output_type: impl Into<String>,
        children: Option<Value>,
    ) -> &mut Self {
        self.outputs.insert(
            name.into(),
            CodeOutput {
                output_type: output_type.into(),
                children,
                extra: Tree::new(),
            },
        );
        self
    }
}
