//! The document model: [`App`] owns a [`Workflow`], which owns a [`Graph`] of nodes and
//! [`Edge`]s plus its [`Variable`] declarations.

mod app;
mod edge;
mod graph;
mod variable;
mod workflow;

pub use app::{
    App, DEFAULT_ICON, DEFAULT_ICON_BACKGROUND, DEFAULT_KIND, DEFAULT_MODE, DEFAULT_VERSION,
    SUPPORTED_MODES, SUPPORTED_VERSIONS,
};
pub use edge::{DEFAULT_EDGE_TYPE, Edge};
pub use graph::Graph;
pub use variable::{DEFAULT_VARIABLE_TYPE, Variable};
pub use workflow::Workflow;
