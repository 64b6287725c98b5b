//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the dify-dsl crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use dify_dsl::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let app = DslParser::new().parse_file("path/to/workflow.yml")?;
//! for problem in app.workflow.graph.validate() {
//!     println!("{}", problem);
//! }
//! DslGenerator::builder()
//!     .format(DslFormat::Json)
//!     .build()
//!     .generate_to_file(&app, "path/to/workflow.json")?;
//! # Ok(())
//! # }
//! ```

// Document model
pub use crate::core::{App, Edge, Graph, Variable, Workflow};

// Nodes
pub use crate::nodes::{
    AnswerNode, CodeNode, CustomNode, EndNode, LlmNode, Node, NodeBase, NodeVariant, Position,
    PromptTemplate, StartNode, ToolNode,
};

// Parsing and generation
pub use crate::builder::WorkflowBuilder;
pub use crate::generator::{DslGenerator, OutputStyle};
pub use crate::parser::{
    DslFormat, DslParser, FnNodeParser, NodeParser, NodeRegistry, PassthroughParser,
};

// Error types
pub use crate::error::{GenerateError, ParseError};

// Generic tree
pub use crate::tree::{Tree, Value};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
