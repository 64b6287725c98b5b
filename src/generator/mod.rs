//! Turning an [`App`] back into DSL text.
//!
//! Output is deterministic: map keys are written in a fixed order and optional fields are
//! left out when empty, so generating the same app twice yields identical bytes and the
//! result parses back into an equal app.

use crate::core::App;
use crate::error::GenerateError;
use crate::parser::DslFormat;
use crate::tree::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// How the emitted text is laid out. Every style parses back to the same tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputStyle {
    /// Block YAML with multi-line strings as literal blocks, or indented JSON.
    #[default]
    Pretty,
    /// A single line: flow-style YAML or minified JSON.
    Compact,
}

/// Serializes apps to text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DslGenerator {
    format: DslFormat,
    style: OutputStyle,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DslGeneratorBuilder {
    format: DslFormat,
    style: OutputStyle,
}

impl DslGeneratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(mut self, format: DslFormat) -> Self {
        self.format = format;
        self
    }

    pub fn style(mut self, style: OutputStyle) -> Self {
        self.style = style;
        self
    }

    pub fn build(self) -> DslGenerator {
        DslGenerator {
            format: self.format,
            style: self.style,
        }
    }
}

impl DslGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> DslGeneratorBuilder {
        DslGeneratorBuilder::new()
    }

    pub fn format(&self) -> DslFormat {
        self.format
    }

    pub fn style(&self) -> OutputStyle {
        self.style
    }

    /// The generic tree the text is emitted from.
    pub fn to_tree(&self, app: &App) -> Result<Value, GenerateError> {
        app.to_tree()
    }

    pub fn generate(&self, app: &App) -> Result<String, GenerateError> {
        self.emit(app, self.style)
    }

    /// Like [`generate`](Self::generate), always in [`OutputStyle::Pretty`].
    pub fn generate_pretty(&self, app: &App) -> Result<String, GenerateError> {
        self.emit(app, OutputStyle::Pretty)
    }

    /// Writes the generated text to `path`, creating missing parent directories.
    pub fn generate_to_file(&self, app: &App, path: impl AsRef<Path>) -> Result<(), GenerateError> {
        let path = path.as_ref();
        let text = self.generate(app)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)?;
        debug!(path = %path.display(), format = %self.format, "wrote document file");
        Ok(())
    }

    fn emit(&self, app: &App, style: OutputStyle) -> Result<String, GenerateError> {
        let tree = app.to_tree()?;
        let text = emit_tree(&tree, self.format, style)?;
        debug!(
            format = %self.format,
            ?style,
            nodes = app.workflow.graph.node_count(),
            edges = app.workflow.graph.edge_count(),
            bytes = text.len(),
            "generated document"
        );
        Ok(text)
    }
}

/// Encodes a generic tree as text.
///
/// Compact YAML is written as a JSON line, which every YAML parser reads as flow style.
pub fn emit_tree(
    tree: &Value,
    format: DslFormat,
    style: OutputStyle,
) -> Result<String, GenerateError> {
    let encoded = match (format, style) {
        (DslFormat::Yaml, OutputStyle::Pretty) => {
            serde_yaml::to_string(tree).map_err(|e| e.to_string())
        }
        (DslFormat::Json, OutputStyle::Pretty) => {
            serde_json::to_string_pretty(tree).map_err(|e| e.to_string())
        }
        (_, OutputStyle::Compact) => serde_json::to_string(tree).map_err(|e| e.to_string()),
    };
    encoded.map_err(|reason| GenerateError::Encode { format, reason })
}
