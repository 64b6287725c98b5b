use super::Workflow;
use crate::error::{GenerateError, ParseError};
use crate::parser::NodeRegistry;
use crate::tree::{self, Tree, Value};

pub const SUPPORTED_VERSIONS: [&str; 3] = ["0.1.5", "0.2.0", "0.3.0"];
pub const SUPPORTED_MODES: [&str; 4] = ["workflow", "chat", "advanced-chat", "agent-chat"];

pub const DEFAULT_KIND: &str = "app";
pub const DEFAULT_VERSION: &str = "0.2.0";
pub const DEFAULT_MODE: &str = "workflow";
pub const DEFAULT_ICON: &str = "🤖";
pub const DEFAULT_ICON_BACKGROUND: &str = "#FFEAD5";

/// One complete DSL document: app metadata plus its workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct App {
    pub name: String,
    pub description: String,
    /// One of [`SUPPORTED_MODES`].
    pub mode: String,
    pub workflow: Workflow,
    pub kind: String,
    /// One of [`SUPPORTED_VERSIONS`].
    pub version: String,
    pub icon: String,
    pub icon_background: String,
    pub use_icon_as_answer_icon: bool,
    /// Usually a map keyed by dependency name; plugin exports write a list instead, which is
    /// kept as is.
    pub dependencies: Value,
    pub model_config: Option<Tree>,
}

impl App {
    pub fn new(name: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            mode: mode.into(),
            workflow: Workflow::default(),
            kind: DEFAULT_KIND.to_string(),
            version: DEFAULT_VERSION.to_string(),
            icon: DEFAULT_ICON.to_string(),
            icon_background: DEFAULT_ICON_BACKGROUND.to_string(),
            use_icon_as_answer_icon: false,
            dependencies: Value::Null,
            model_config: None,
        }
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn workflow_mut(&mut self) -> &mut Workflow {
        &mut self.workflow
    }

    pub fn set_workflow(&mut self, workflow: Workflow) -> &mut Self {
        self.workflow = workflow;
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    pub fn set_icon(
        &mut self,
        icon: impl Into<String>,
        background: impl Into<String>,
    ) -> &mut Self {
        self.icon = icon.into();
        self.icon_background = background.into();
        self
    }

    pub fn set_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.version = version.into();
        self
    }

    pub fn set_model_config(&mut self, model_config: Option<Tree>) -> &mut Self {
        self.model_config = model_config;
        self
    }

    /// Adds or replaces a named dependency.
    ///
    /// A dependency list is turned into a map keyed by position first, so existing entries
    /// are kept.
    pub fn add_dependency(&mut self, name: impl Into<String>, dependency: Value) -> &mut Self {
        let mut map: Tree = match std::mem::take(&mut self.dependencies) {
            Value::Object(map) => map,
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
            _ => Tree::new(),
        };
        map.insert(name.into(), dependency);
        self.dependencies = Value::Object(map);
        self
    }

    pub fn dependency(&self, name: &str) -> Option<&Value> {
        self.dependencies.as_object().and_then(|map| map.get(name))
    }

    pub fn is_supported_version(version: &str) -> bool {
        SUPPORTED_VERSIONS.contains(&version)
    }

    pub fn is_supported_mode(mode: &str) -> bool {
        SUPPORTED_MODES.contains(&mode)
    }

    /// Assembles an app from a document whose top-level structure was already checked.
    ///
    /// Fields not covered by that check fall back to their defaults when absent or of the
    /// wrong kind.
    pub(crate) fn from_tree(root: &Tree, registry: &NodeRegistry) -> Result<Self, ParseError> {
        let empty = Tree::new();
        let app = tree::opt_map(root, "app").unwrap_or(&empty);
        let workflow = tree::opt_map(root, "workflow").unwrap_or(&empty);

        let dependencies = match root.get("dependencies") {
            Some(value @ (Value::Object(_) | Value::Array(_))) if !tree::is_empty_value(value) => {
                value.clone()
            }
            _ => Value::Null,
        };

        Ok(Self {
            name: tree::str_or(app, "name", ""),
            description: tree::str_or(app, "description", ""),
            mode: tree::str_or(app, "mode", DEFAULT_MODE),
            workflow: Workflow::from_tree(workflow, registry)?,
            kind: tree::str_or(root, "kind", DEFAULT_KIND),
            version: tree::str_or(root, "version", DEFAULT_VERSION),
            icon: tree::str_or(app, "icon", DEFAULT_ICON),
            icon_background: tree::str_or(app, "icon_background", DEFAULT_ICON_BACKGROUND),
            use_icon_as_answer_icon: tree::bool_or(app, "use_icon_as_answer_icon", false),
            dependencies,
            model_config: tree::opt_map(root, "model_config").cloned(),
        })
    }

    pub fn to_tree(&self) -> Result<Value, GenerateError> {
        let mut app = Tree::new();
        app.insert("name".into(), self.name.clone().into());
        app.insert("description".into(), self.description.clone().into());
        app.insert("icon".into(), self.icon.clone().into());
        app.insert("icon_background".into(), self.icon_background.clone().into());
        app.insert("mode".into(), self.mode.clone().into());
        app.insert(
            "use_icon_as_answer_icon".into(),
            self.use_icon_as_answer_icon.into(),
        );

        let mut root = Tree::new();
        root.insert("app".into(), Value::Object(app));
        root.insert("kind".into(), self.kind.clone().into());
        root.insert("version".into(), self.version.clone().into());
        root.insert("workflow".into(), self.workflow.to_tree()?);

        if !tree::is_empty_value(&self.dependencies) {
            root.insert("dependencies".into(), self.dependencies.clone());
        }
        if let Some(model_config) = &self.model_config {
            root.insert("model_config".into(), Value::Object(model_config.clone()));
        }

        Ok(Value::Object(root))
    }
}
