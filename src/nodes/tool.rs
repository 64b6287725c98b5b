use super::{NodeBase, node_variant};
use crate::tree::{self, Tree, Value};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_RETRIES: i64 = 3;
pub const DEFAULT_RETRY_INTERVAL_MS: i64 = 1000;

/// Retry policy of a tool call. Written out whole whenever it is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default)]
    pub retry_enabled: bool,
    #[serde(default)]
    pub max_retries: i64,
    /// Milliseconds between attempts.
    #[serde(default)]
    pub retry_interval: i64,
    #[serde(flatten)]
    pub extra: Tree,
}

impl RetryConfig {
    pub fn enabled(max_retries: i64, retry_interval: i64) -> Self {
        Self {
            retry_enabled: true,
            max_retries,
            retry_interval,
            extra: Tree::new(),
        }
    }
}

/// Invokes a built-in, API or workflow tool from a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolNode {
    #[serde(skip)]
    pub base: NodeBase,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider_name: String,
    /// `builtin`, `api`, `workflow`...
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tool_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tool_label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tool_description: String,
    #[serde(
        default,
        skip_serializing_if = "Tree::is_empty",
        deserialize_with = "tree::map_or_empty"
    )]
    pub tool_parameters: Tree,
    // Older exports wrote this key in snake case.
    #[serde(
        default,
        rename = "paramSchemas",
        alias = "param_schemas",
        skip_serializing_if = "tree::is_empty_value",
        deserialize_with = "tree::empty_as_null"
    )]
    pub param_schemas: Value,
    #[serde(
        default,
        skip_serializing_if = "Tree::is_empty",
        deserialize_with = "tree::map_or_empty"
    )]
    pub tool_configurations: Tree,
    #[serde(default, skip_serializing_if = "tree::is_false")]
    pub is_team_authorization: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_config: Option<RetryConfig>,
    #[serde(flatten)]
    pub extra: Tree,
}

node_variant!(ToolNode => Tool, "tool", "工具");

impl ToolNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            base: NodeBase::new(id, <Self as super::NodeVariant>::DEFAULT_TITLE),
            provider_id: String::new(),
            provider_name: String::new(),
            provider_type: String::new(),
            tool_name: String::new(),
            tool_label: String::new(),
            tool_description: String::new(),
            tool_parameters: Tree::new(),
            param_schemas: Value::Null,
            tool_configurations: Tree::new(),
            is_team_authorization: false,
            retry_config: None,
            extra: Tree::new(),
        }
    }

    pub fn set_provider(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        provider_type: impl Into<String>,
    ) -> &mut Self {
        self.provider_id = id.into();
        self.provider_name = name.into();
        self.provider_type = provider_type.into();
        self
    }

    /// Sets the tool to call. An empty label is replaced by the tool name.
    pub fn set_tool(
        &mut self,
        name: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut Self {
        self.tool_name = name.into();
        self.tool_label = label.into();
        if self.tool_label.is_empty() {
            self.tool_label = self.tool_name.clone();
        }
        self.tool_description = description.into();
        self
    }

    pub fn set_parameters(&mut self, parameters: Tree) -> &mut Self {
        self.tool_parameters = parameters;
        self
    }

    /// Adds a literal parameter, stored as `{type: mixed, value}`.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let mut parameter = Tree::new();
        parameter.insert("type".into(), "mixed".into());
        parameter.insert("value".into(), value.into());
        self.tool_parameters
            .insert(name.into(), Value::Object(parameter));
        self
    }

    pub fn set_configurations(&mut self, configurations: Tree) -> &mut Self {
        self.tool_configurations = configurations;
        self
    }

    pub fn enable_retry(&mut self, max_retries: i64, retry_interval: i64) -> &mut Self {
        self.retry_config = Some(RetryConfig::enabled(max_retries, retry_interval));
        self
    }

    /// [`enable_retry`](Self::enable_retry) with 3 attempts one second apart.
    pub fn enable_default_retry(&mut self) -> &mut Self {
        self.enable_retry(DEFAULT_MAX_RETRIES, DEFAULT_RETRY_INTERVAL_MS)
    }

    pub fn disable_retry(&mut self) -> &mut Self {
        self.retry_config = None;
        self
    }
}
