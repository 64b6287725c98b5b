use crate::error::{GenerateError, ParseError};
use crate::tree::{self, Tree, Value};
use serde::{Deserialize, Serialize};

pub const DEFAULT_VARIABLE_TYPE: &str = "text-input";

fn default_variable_type() -> String {
    DEFAULT_VARIABLE_TYPE.to_string()
}

/// A typed parameter declaration: a start-node input, an environment variable or a
/// conversation variable.
///
/// `variable`, `label`, `type` and `required` are always written out; every other field is
/// written only when it carries a value. Keys this model does not know about are kept in
/// [`Variable::extra`] and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    #[serde(default)]
    pub variable: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default = "default_variable_type")]
    pub var_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    /// Select choices or any other option payload.
    #[serde(
        default,
        skip_serializing_if = "tree::is_empty_value",
        deserialize_with = "tree::empty_as_null"
    )]
    pub options: Value,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "tree::seq_or_empty"
    )]
    pub allowed_file_extensions: Vec<String>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "tree::seq_or_empty"
    )]
    pub allowed_file_types: Vec<String>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "tree::seq_or_empty"
    )]
    pub allowed_file_upload_methods: Vec<String>,
    #[serde(flatten)]
    pub extra: Tree,
}

impl Variable {
    pub fn new(
        variable: impl Into<String>,
        label: impl Into<String>,
        var_type: impl Into<String>,
    ) -> Self {
        Self {
            variable: variable.into(),
            label: label.into(),
            var_type: var_type.into(),
            required: false,
            description: None,
            default_value: None,
            max_length: None,
            options: Value::Null,
            allowed_file_extensions: Vec::new(),
            allowed_file_types: Vec::new(),
            allowed_file_upload_methods: Vec::new(),
            extra: Tree::new(),
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.default_value = (!value.is_null()).then_some(value);
        self
    }

    pub fn with_max_length(mut self, max_length: i64) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_options(mut self, options: impl Into<Value>) -> Self {
        self.options = options.into();
        self
    }

    /// Restricts a `file` / `file-list` input.
    pub fn with_file_constraints(
        mut self,
        extensions: Vec<String>,
        file_types: Vec<String>,
        upload_methods: Vec<String>,
    ) -> Self {
        self.allowed_file_extensions = extensions;
        self.allowed_file_types = file_types;
        self.allowed_file_upload_methods = upload_methods;
        self
    }

    pub fn from_tree(value: &Value) -> Result<Self, ParseError> {
        Variable::deserialize(value).map_err(|e| ParseError::invalid("variable", e))
    }

    pub fn to_tree(&self) -> Result<Value, GenerateError> {
        serde_json::to_value(self).map_err(|e| GenerateError::Tree(e.to_string()))
    }
}
