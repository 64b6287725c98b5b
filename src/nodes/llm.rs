use super::{NodeBase, node_variant};
use crate::tree::{self, Tree, Value};
use serde::{Deserialize, Deserializer, Serialize};

pub const ROLE_SYSTEM: &str = "system";
pub const ROLE_USER: &str = "user";

/// One entry of an LLM node's `prompt_template`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: Tree,
}

impl PromptMessage {
    pub fn new(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            text: text.into(),
            edition_type: None,
            id: None,
            extra: Tree::new(),
        }
    }
}

/// An LLM node's `prompt_template`.
///
/// Chat-mode models take a list of role-tagged messages. Completion-mode models take a
/// single map such as `{text: ...}`, which is kept as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PromptTemplate {
    Chat(Vec<PromptMessage>),
    Completion(Tree),
}

impl Default for PromptTemplate {
    fn default() -> Self {
        PromptTemplate::Chat(Vec::new())
    }
}

impl PromptTemplate {
    pub fn is_empty(&self) -> bool {
        match self {
            PromptTemplate::Chat(messages) => messages.is_empty(),
            PromptTemplate::Completion(map) => map.is_empty(),
        }
    }

    /// Chat messages; empty for a completion template.
    pub fn messages(&self) -> &[PromptMessage] {
        match self {
            PromptTemplate::Chat(messages) => messages,
            PromptTemplate::Completion(_) => &[],
        }
    }

    /// Edits the chat messages in place. A completion template is replaced by an empty
    /// message list first.
    pub fn edit_messages(&mut self, edit: impl FnOnce(&mut Vec<PromptMessage>)) {
        let mut messages = match std::mem::take(self) {
            PromptTemplate::Chat(messages) => messages,
            PromptTemplate::Completion(_) => Vec::new(),
        };
        edit(&mut messages);
        *self = PromptTemplate::Chat(messages);
    }

    pub fn completion(&self) -> Option<&Tree> {
        match self {
            PromptTemplate::Completion(map) => Some(map),
            PromptTemplate::Chat(_) => None,
        }
    }
}

/// `null`, `[]` and `{}` all read as an empty chat template.
fn prompt_template_or_empty<'de, D>(deserializer: D) -> Result<PromptTemplate, D::Error>
where
    D: Deserializer<'de>,
{
    let template = Option::<PromptTemplate>::deserialize(deserializer)?.unwrap_or_default();
    Ok(if template.is_empty() {
        PromptTemplate::default()
    } else {
        template
    })
}

/// Calls a language model with a prompt template.
///
/// `context`, `memory` and `vision` are kept as generic maps; `None` means the key is absent
/// from the document, which is different from an explicit `{enabled: false}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmNode {
    #[serde(skip)]
    pub base: NodeBase,
    /// `mode`, `name`, `provider` and optional `completion_params`.
    #[serde(
        default,
        skip_serializing_if = "Tree::is_empty",
        deserialize_with = "tree::map_or_empty"
    )]
    pub model: Tree,
    #[serde(
        default,
        skip_serializing_if = "PromptTemplate::is_empty",
        deserialize_with = "prompt_template_or_empty"
    )]
    pub prompt_template: PromptTemplate,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "tree::opt_map_or_empty"
    )]
    pub context: Option<Tree>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "tree::opt_map_or_empty"
    )]
    pub memory: Option<Tree>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "tree::opt_map_or_empty"
    )]
    pub vision: Option<Tree>,
    #[serde(
        default,
        skip_serializing_if = "Tree::is_empty",
        deserialize_with = "tree::map_or_empty"
    )]
    pub variables: Tree,
    #[serde(default, skip_serializing_if = "tree::is_false")]
    structured_output_enabled: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "tree::opt_map_or_empty"
    )]
    output_schema: Option<Tree>,
    #[serde(flatten)]
    pub extra: Tree,
}

node_variant!(LlmNode => Llm, "llm", "LLM", normalize = LlmNode::drop_disabled_schema);

impl LlmNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            base: NodeBase::new(id, <Self as super::NodeVariant>::DEFAULT_TITLE),
            model: Tree::new(),
            prompt_template: PromptTemplate::default(),
            context: None,
            memory: None,
            vision: None,
            variables: Tree::new(),
            structured_output_enabled: false,
            output_schema: None,
            extra: Tree::new(),
        }
    }

    /// An output schema is only meaningful while structured output is enabled.
    fn drop_disabled_schema(&mut self) {
        if !self.structured_output_enabled {
            self.output_schema = None;
        }
    }

    pub fn set_model(
        &mut self,
        name: &str,
        provider: &str,
        mode: &str,
        completion_params: Tree,
    ) -> &mut Self {
        let mut model = Tree::new();
        model.insert("mode".into(), mode.into());
        model.insert("name".into(), name.into());
        model.insert("provider".into(), provider.into());
        if !completion_params.is_empty() {
            model.insert("completion_params".into(), Value::Object(completion_params));
        }
        self.model = model;
        self
    }

    pub fn add_prompt_message(
        &mut self,
        role: &str,
        text: &str,
        edition_type: Option<&str>,
        id: Option<&str>,
    ) -> &mut Self {
        let mut message = PromptMessage::new(role, text);
        message.edition_type = edition_type.map(str::to_string);
        message.id = id.map(str::to_string);
        self.prompt_template.edit_messages(|messages| messages.push(message));
        self
    }

    /// Replaces every system message with a single one at the front.
    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) -> &mut Self {
        let message = PromptMessage::new(ROLE_SYSTEM, prompt);
        self.prompt_template.edit_messages(|messages| {
            messages.retain(|m| m.role != ROLE_SYSTEM);
            messages.insert(0, message);
        });
        self
    }

    /// Replaces every user message with a single one at the end.
    pub fn set_user_prompt(&mut self, prompt: impl Into<String>) -> &mut Self {
        let message = PromptMessage::new(ROLE_USER, prompt);
        self.prompt_template.edit_messages(|messages| {
            messages.retain(|m| m.role != ROLE_USER);
            messages.push(message);
        });
        self
    }

    /// Switches to a completion-mode template, `{text: prompt}`.
    pub fn set_completion_prompt(&mut self, prompt: impl Into<String>) -> &mut Self {
        let mut template = Tree::new();
        template.insert("text".into(), Value::String(prompt.into()));
        self.prompt_template = PromptTemplate::Completion(template);
        self
    }

    pub fn enable_context<S: Into<String>>(
        &mut self,
        variable_selector: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        let mut context = Tree::new();
        context.insert("enabled".into(), true.into());
        context.insert("variable_selector".into(), selector(variable_selector));
        self.context = Some(context);
        self
    }

    pub fn disable_context(&mut self) -> &mut Self {
        self.context = Some(disabled());
        self
    }

    pub fn enable_vision<S: Into<String>>(
        &mut self,
        variable_selector: impl IntoIterator<Item = S>,
        detail: &str,
    ) -> &mut Self {
        let mut configs = Tree::new();
        configs.insert("detail".into(), detail.into());
        configs.insert("variable_selector".into(), selector(variable_selector));

        let mut vision = Tree::new();
        vision.insert("enabled".into(), true.into());
        vision.insert("configs".into(), Value::Object(configs));
        self.vision = Some(vision);
        self
    }

    pub fn disable_vision(&mut self) -> &mut Self {
        self.vision = Some(disabled());
        self
    }

    pub fn set_memory(&mut self, memory: Tree) -> &mut Self {
        self.memory = Some(memory);
        self
    }

    pub fn set_variables(&mut self, variables: Tree) -> &mut Self {
        self.variables = variables;
        self
    }

    pub fn enable_structured_output(&mut self, schema: Tree) -> &mut Self {
        self.structured_output_enabled = true;
        self.output_schema = Some(schema);
        self
    }

    pub fn disable_structured_output(&mut self) -> &mut Self {
        self.structured_output_enabled = false;
        self.output_schema = None;
        self
    }

    pub fn is_structured_output_enabled(&self) -> bool {
        self.structured_output_enabled
    }

    pub fn output_schema(&self) -> Option<&Tree> {
        self.output_schema.as_ref()
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.prompt_template
            .messages()
            .iter()
            .find(|m| m.role == ROLE_SYSTEM)
            .map(|m| m.text.as_str())
    }
}

fn selector<S: Into<String>>(parts: impl IntoIterator<Item = S>) -> Value {
    Value::Array(parts.into_iter().map(|p| Value::String(p.into())).collect())
}

fn disabled() -> Tree {
    let mut map = Tree::new();
    map.insert("enabled".into(), false.into());
    map
}
