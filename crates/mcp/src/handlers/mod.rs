//! Tool handlers: validate, call the orchestration server, shape the reply.
//!
//! Handlers log every outcome and return failures unchanged.

pub mod args;
pub mod template;
pub mod validation;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

use serde::Serialize;

pub use template::TemplateToolHandler;
pub use workflow::WorkflowToolHandler;

/// Reply for the delete tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub success: bool,
    pub message: String,
}

impl DeleteOutcome {
    fn deleted(resource_label: &str, name: &str, namespace: &str) -> Self {
        Self {
            success: true,
            message: format!("{resource_label} '{name}' deleted successfully from namespace '{namespace}'"),
        }
    }
}
