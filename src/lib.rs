//! # dify-dsl - Workflow DSL Object Model and Serializer
//!
//! **dify-dsl** reads, builds and writes the workflow documents exported by Dify: AI
//! application pipelines described as a graph of typed nodes (start, LLM, tool, code,
//! answer, end) connected by edges, plus variable declarations and feature flags.
//!
//! The crate only *describes* workflows. Nothing here runs a node or calls a model.
//!
//! ## Core Workflow
//!
//! 1.  **Parse**: [`DslParser`](parser::DslParser) turns YAML or JSON text into an
//!     [`App`](core::App). The document's structure is checked on the way in, and every
//!     node is built by the parser registered for its `data.type`.
//! 2.  **Inspect or edit**: the [`Graph`](core::Graph) indexes nodes and edges by id and
//!     answers structural queries. [`Graph::validate`](core::Graph::validate) reports
//!     missing start/end nodes and dangling edges.
//! 3.  **Build**: [`WorkflowBuilder`](builder::WorkflowBuilder) assembles a new app in code,
//!     chaining each added node to the previous one.
//! 4.  **Generate**: [`DslGenerator`](generator::DslGenerator) writes the app back out.
//!     Optional fields are only written when set, so parse → generate → parse is lossless.
//!
//! ## Quick Start
//!
//! ```rust
//! use dify_dsl::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let app = WorkflowBuilder::new()
//!         .name("Translator")
//!         .start_node(|start| {
//!             start.add_input("text", "paragraph", true, Some("Text"));
//!         })
//!         .llm_node(Some("llm1"), |llm| {
//!             llm.set_model("gpt-4o", "openai", "chat", Tree::new())
//!                 .set_system_prompt("Translate to French.")
//!                 .set_user_prompt("{{#start.text#}}");
//!         })
//!         .end_node(|end| {
//!             end.add_output("translation", ["llm1", "text"]);
//!         })
//!         .build();
//!
//!     assert!(app.workflow.graph.validate().is_empty());
//!
//!     let text = DslGenerator::new().generate(&app)?;
//!     let parsed = DslParser::new().parse(&text)?;
//!     assert_eq!(parsed, app);
//!     Ok(())
//! }
//! ```
//!
//! ## Custom node types
//!
//! Dify knows many more node types than the six modelled here. Register a
//! [`NodeParser`](parser::NodeParser) for each one a document uses, or a
//! [`PassthroughParser`](parser::PassthroughParser) to keep its payload as is:
//!
//! ```rust
//! use dify_dsl::prelude::*;
//!
//! # fn main() -> std::result::Result<(), ParseError> {
//! let parser = DslParser::builder()
//!     .with_node_parser(Box::new(PassthroughParser::new("if-else")))
//!     .build()?;
//! assert!(parser.registry().is_type_supported("if-else"));
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod error;
pub mod generator;
pub mod nodes;
pub mod parser;
pub mod prelude;
pub mod tree;
