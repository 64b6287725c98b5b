use crate::parser::DslFormat;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while turning DSL text (or an already parsed tree) into an [`App`].
///
/// Every variant carries a stable message so callers can match on the rendered text.
///
/// [`App`]: crate::core::App
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to parse {format}: {reason}")]
    Syntax { format: DslFormat, reason: String },

    #[error("Parsed document must be a map, got {got}")]
    NotAMap { got: &'static str },

    #[error("Missing required key: {0}")]
    MissingKey(&'static str),

    #[error("Invalid kind: expected 'app', got '{0}'")]
    InvalidKind(String),

    #[error("Unsupported version: {0}")]
    UnsupportedVersion(String),

    #[error("Invalid {section} section: expected map, got {got}")]
    InvalidSection {
        section: &'static str,
        got: &'static str,
    },

    #[error("Missing required app key: {0}")]
    MissingAppKey(&'static str),

    #[error("Unsupported mode: {0}")]
    UnsupportedMode(String),

    #[error("Unsupported node type: {0}")]
    UnsupportedNodeType(String),

    #[error("Parser registered for node type '{node_type}' produces '{produced}' nodes")]
    InvalidNodeParser { node_type: String, produced: String },

    #[error("Invalid {context}: {reason}")]
    InvalidField { context: String, reason: String },

    #[error("Failed to parse node {id}: {source}")]
    Node {
        id: String,
        #[source]
        source: Box<ParseError>,
    },

    #[error("Failed to parse edge: expected map, got {got}")]
    EdgeNotMap { got: &'static str },

    #[error("Failed to parse edge {id}: {source}")]
    Edge {
        id: String,
        #[source]
        source: Box<ParseError>,
    },

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read file: {}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// Wraps a serde error raised while decoding one typed record.
    pub(crate) fn invalid(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ParseError::InvalidField {
            context: context.into(),
            reason: err.to_string(),
        }
    }
}

/// Errors that can occur while emitting an [`App`](crate::core::App) as text.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Failed to build document tree: {0}")]
    Tree(String),

    #[error("Failed to encode {format}: {reason}")]
    Encode { format: DslFormat, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
