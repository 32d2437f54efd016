//! Shared resource models and the error taxonomy for Argonaut.
//!
//! The models mirror the subset of the Argo Workflows REST objects that the
//! tool layer reads or writes. They are request/response snapshots only; the
//! orchestration server owns every resource's lifecycle.

pub mod error;
pub mod resource;
pub mod template;
pub mod workflow;

pub use error::{ErrorKind, ErrorResponse, JsonRpcError, ToolError};
pub use resource::{API_VERSION, DEFAULT_NAMESPACE, ObjectMeta, ResourceList};
pub use template::WorkflowTemplate;
pub use workflow::{
    Arguments, NodeStatus, Parameter, ParsePhaseError, TemplateRef, Workflow, WorkflowPhase, WorkflowSpec, WorkflowStatus,
};
