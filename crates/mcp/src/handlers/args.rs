//! Typed argument shapes for each tool.
//!
//! These structs are the decode target for raw tool-call arguments and the
//! source of the published input schemas. Decoding only checks structure;
//! semantic rules live in [`crate::handlers::validation`].

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Arguments for `create_workflow_template`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreateTemplateArgs {
    /// Template name. Lower-case DNS label.
    #[schemars(description = "Template name. Lower-case alphanumerics and '-', starting and ending with an alphanumeric.")]
    pub name: String,
    #[schemars(description = "Namespace (optional, defaults to the server's configured namespace, usually \"argo\").")]
    pub namespace: Option<String>,
    /// Opaque template spec, forwarded untouched.
    #[schemars(
        with = "Map<String, Value>",
        description = "Argo WorkflowTemplate spec as a JSON object, for example {\"entrypoint\": \"main\", \"templates\": [...]}."
    )]
    pub spec: Value,
}

/// Arguments for `get_workflow_template` and `delete_workflow_template`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TemplateArgs {
    #[schemars(description = "Template name.")]
    pub name: String,
    #[schemars(description = "Namespace (optional, defaults to the server's configured namespace, usually \"argo\").")]
    pub namespace: Option<String>,
}

/// Arguments for `list_workflow_templates`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTemplatesArgs {
    #[schemars(description = "Namespace to list (optional, defaults to the server's configured namespace).")]
    pub namespace: Option<String>,
}

/// Arguments for `submit_workflow`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubmitWorkflowArgs {
    #[schemars(description = "Name of the WorkflowTemplate to run.")]
    pub template_name: String,
    #[schemars(description = "Namespace (optional, defaults to the server's configured namespace, usually \"argo\").")]
    pub namespace: Option<String>,
    /// Kept as raw JSON so a non-string value is reported by key.
    #[schemars(
        with = "Option<IndexMap<String, String>>",
        description = "Workflow parameters as a string-to-string object (optional)."
    )]
    pub parameters: Option<Value>,
    #[schemars(description = "Workflow name to request (optional). Defaults to '<template_name>-<epoch millis>'.")]
    pub generate_name: Option<String>,
}

/// Arguments for `get_workflow_status` and `delete_workflow`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WorkflowArgs {
    #[schemars(description = "Workflow name.")]
    pub name: String,
    #[schemars(description = "Namespace (optional, defaults to the server's configured namespace, usually \"argo\").")]
    pub namespace: Option<String>,
}

/// Arguments for `list_workflows`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ListWorkflowsArgs {
    #[schemars(description = "Namespace to list (optional, defaults to the server's configured namespace).")]
    pub namespace: Option<String>,
    #[schemars(description = "Phase filter (optional): Pending, Running, Succeeded, Failed, Error, Skipped, or Omitted.")]
    pub phase: Option<String>,
}
