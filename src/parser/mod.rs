//! Turning DSL text into an [`App`].
//!
//! Parsing runs in fixed stages and stops at the first failure:
//!
//! 1. decode the text into a generic tree ([`DslFormat::parse_tree`]);
//! 2. check the top-level structure: required keys, `kind`, `version`, `app.name`/`app.mode`;
//! 3. dispatch every node through the [`NodeRegistry`], then read the edges;
//! 4. assemble the workflow and the app, defaulting everything else.
//!
//! Graph rules (a start node exists, edges point at real nodes...) are not checked here.
//! Call [`Graph::validate`](crate::core::Graph::validate) for that.

mod format;
mod registry;

pub use format::DslFormat;
pub use registry::{FnNodeParser, NodeParser, NodeRegistry, PassthroughParser};

use crate::core::{App, SUPPORTED_MODES, SUPPORTED_VERSIONS};
use crate::error::ParseError;
use crate::tree::{self, Tree, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Top-level keys every document must carry, in the order they are checked.
const REQUIRED_KEYS: [&str; 4] = ["app", "kind", "version", "workflow"];
const REQUIRED_APP_KEYS: [&str; 2] = ["name", "mode"];

static NULL: Value = Value::Null;

/// Parses DSL documents.
///
/// ```
/// use dify_dsl::parser::DslParser;
///
/// let app = DslParser::new()
///     .parse(
///         r#"
/// app: {name: M, mode: workflow}
/// kind: app
/// version: 0.2.0
/// workflow: {graph: {nodes: [], edges: []}}
/// "#,
///     )
///     .unwrap();
/// assert_eq!(app.name, "M");
/// ```
#[derive(Debug, Default)]
pub struct DslParser {
    /// `None` means "YAML for text, by extension for files".
    format: Option<DslFormat>,
    registry: NodeRegistry,
}

pub struct DslParserBuilder {
    format: Option<DslFormat>,
    registry: NodeRegistry,
    pending: Vec<(String, Box<dyn NodeParser>)>,
}

impl DslParserBuilder {
    pub fn new() -> Self {
        Self {
            format: None,
            registry: NodeRegistry::new(),
            pending: Vec::new(),
        }
    }

    /// Forces one input format instead of detecting it.
    pub fn format(mut self, format: DslFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Replaces the whole registry, built-in types included.
    pub fn with_registry(mut self, registry: NodeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Registers a parser under the node type it declares.
    pub fn with_node_parser(mut self, parser: Box<dyn NodeParser>) -> Self {
        self.registry.register(parser);
        self
    }

    /// Registers a parser under an explicit node type; checked when the parser is built.
    pub fn with_node_type(mut self, node_type: &str, parser: Box<dyn NodeParser>) -> Self {
        self.pending.push((node_type.to_string(), parser));
        self
    }

    pub fn build(self) -> Result<DslParser, ParseError> {
        let mut registry = self.registry;
        for (node_type, parser) in self.pending {
            registry.register_node_type(&node_type, parser)?;
        }
        Ok(DslParser {
            format: self.format,
            registry,
        })
    }
}

impl Default for DslParserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DslParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> DslParserBuilder {
        DslParserBuilder::new()
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut NodeRegistry {
        &mut self.registry
    }

    /// Parses document text. YAML is assumed unless another format was configured.
    pub fn parse(&self, text: &str) -> Result<App, ParseError> {
        let format = self.format.unwrap_or_default();
        let root = format.parse_tree(text)?;
        let app = self.parse_value(&root)?;
        debug!(
            %format,
            name = %app.name,
            nodes = app.workflow.graph.node_count(),
            edges = app.workflow.graph.edge_count(),
            "parsed document"
        );
        Ok(app)
    }

    /// Reads and parses a document file; the format follows the file extension unless one
    /// was configured.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<App, ParseError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ParseError::FileNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| ParseError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let format = self.format.unwrap_or_else(|| DslFormat::from_path(path));
        let root = format.parse_tree(&text)?;
        let app = self.parse_value(&root)?;
        debug!(
            path = %path.display(),
            %format,
            nodes = app.workflow.graph.node_count(),
            edges = app.workflow.graph.edge_count(),
            "parsed document file"
        );
        Ok(app)
    }

    /// Builds an app from an already decoded tree.
    pub fn parse_value(&self, root: &Value) -> Result<App, ParseError> {
        let root = root.as_object().ok_or(ParseError::NotAMap {
            got: tree::kind_name(root),
        })?;
        validate_structure(root)?;
        App::from_tree(root, &self.registry)
    }
}

fn validate_structure(root: &Tree) -> Result<(), ParseError> {
    if let Some(missing) = REQUIRED_KEYS
        .into_iter()
        .find(|key| !tree::is_present(root, key))
    {
        return Err(ParseError::MissingKey(missing));
    }

    let kind = field(root, "kind");
    if kind.as_str() != Some("app") {
        return Err(ParseError::InvalidKind(tree::render(kind)));
    }

    let version = field(root, "version");
    if !version
        .as_str()
        .is_some_and(|v| SUPPORTED_VERSIONS.contains(&v))
    {
        return Err(ParseError::UnsupportedVersion(tree::render(version)));
    }

    let app = section(root, "app")?;
    if let Some(missing) = REQUIRED_APP_KEYS
        .into_iter()
        .find(|key| !tree::is_present(app, key))
    {
        return Err(ParseError::MissingAppKey(missing));
    }
    let mode = field(app, "mode");
    if !mode.as_str().is_some_and(|m| SUPPORTED_MODES.contains(&m)) {
        return Err(ParseError::UnsupportedMode(tree::render(mode)));
    }

    section(root, "workflow")?;
    Ok(())
}

fn section<'a>(root: &'a Tree, key: &'static str) -> Result<&'a Tree, ParseError> {
    let value = field(root, key);
    value.as_object().ok_or(ParseError::InvalidSection {
        section: key,
        got: tree::kind_name(value),
    })
}

fn field<'a>(map: &'a Tree, key: &str) -> &'a Value {
    map.get(key).unwrap_or(&NULL)
}
