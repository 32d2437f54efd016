//! Workflow template resource.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resource::{API_VERSION, ObjectMeta};

/// A reusable workflow definition stored by the orchestration server.
///
/// `spec` is owned by the caller and passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTemplate {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: Value,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    "WorkflowTemplate".to_string()
}

impl WorkflowTemplate {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, spec: Value) -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            metadata: ObjectMeta::named(name, namespace),
            spec,
        }
    }
}
