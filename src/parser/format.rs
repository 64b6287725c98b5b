use crate::error::ParseError;
use crate::tree::Value;
use std::fmt;
use std::path::Path;

/// Text encodings a DSL document can be stored in.
///
/// Dify itself exports YAML. JSON is accepted too since it maps onto the same tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DslFormat {
    #[default]
    Yaml,
    Json,
}

impl DslFormat {
    /// `.json` files are JSON, everything else is read as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DslFormat::Json,
            _ => DslFormat::Yaml,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DslFormat::Yaml => "yml",
            DslFormat::Json => "json",
        }
    }

    /// Decodes text into the generic tree.
    pub fn parse_tree(self, text: &str) -> Result<Value, ParseError> {
        let parsed = match self {
            DslFormat::Yaml => serde_yaml::from_str::<Value>(text).map_err(|e| e.to_string()),
            DslFormat::Json => serde_json::from_str::<Value>(text).map_err(|e| e.to_string()),
        };
        parsed.map_err(|reason| ParseError::Syntax {
            format: self,
            reason,
        })
    }
}

impl fmt::Display for DslFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DslFormat::Yaml => write!(f, "YAML"),
            DslFormat::Json => write!(f, "JSON"),
        }
    }
}
