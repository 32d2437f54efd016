//! Workflow instance resource and its execution status.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::resource::{API_VERSION, ObjectMeta};

/// Lifecycle state of a workflow instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Error,
    Skipped,
    Omitted,
}

impl WorkflowPhase {
    pub const ALL: [WorkflowPhase; 7] = [
        WorkflowPhase::Pending,
        WorkflowPhase::Running,
        WorkflowPhase::Succeeded,
        WorkflowPhase::Failed,
        WorkflowPhase::Error,
        WorkflowPhase::Skipped,
        WorkflowPhase::Omitted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowPhase::Pending => "Pending",
            WorkflowPhase::Running => "Running",
            WorkflowPhase::Succeeded => "Succeeded",
            WorkflowPhase::Failed => "Failed",
            WorkflowPhase::Error => "Error",
            WorkflowPhase::Skipped => "Skipped",
            WorkflowPhase::Omitted => "Omitted",
        }
    }

    /// Comma-separated list of every valid phase, for error messages.
    pub fn valid_values() -> String {
        Self::ALL.iter().map(WorkflowPhase::as_str).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowPhase {
    type Err = ParsePhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| ParsePhaseError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePhaseError(pub String);

impl fmt::Display for ParsePhaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid phase '{}'; expected one of: {}", self.0, WorkflowPhase::valid_values())
    }
}

impl Error for ParsePhaseError {}

/// A running or completed execution created from a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: WorkflowSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkflowStatus>,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    "Workflow".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_template_ref: Option<TemplateRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Arguments>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,
    /// Remaining spec fields, kept so a round trip does not drop them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRef {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStatus {
    /// Absent when the server has not assigned a phase yet, or reports one
    /// outside [`WorkflowPhase`].
    #[serde(default, deserialize_with = "deserialize_lenient_phase")]
    pub phase: Option<WorkflowPhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Keyed by internal node id. Order carries no meaning.
    #[serde(default)]
    pub nodes: IndexMap<String, NodeStatus>,
}

fn deserialize_lenient_phase<'de, D>(deserializer: D) -> Result<Option<WorkflowPhase>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|phase| phase.parse().ok()))
}

/// One step of a workflow's execution graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatus {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub phase: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
}

impl NodeStatus {
    /// Display name when present, else the node name.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|display_name| !display_name.is_empty())
            .unwrap_or(&self.name)
    }
}

impl Workflow {
    /// Build a submission that references `template_name`.
    ///
    /// Parameters keep the iteration order of the supplied map.
    pub fn from_template(
        template_name: &str,
        metadata: ObjectMeta,
        parameters: Option<&IndexMap<String, String>>,
    ) -> Self {
        let arguments = parameters.map(|parameters| Arguments {
            parameters: parameters
                .iter()
                .map(|(name, value)| Parameter {
                    name: name.clone(),
                    value: Some(value.clone()),
                })
                .collect(),
        });
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            metadata,
            spec: WorkflowSpec {
                workflow_template_ref: Some(TemplateRef {
                    name: template_name.to_string(),
                }),
                arguments,
                ..Default::default()
            },
            status: None,
        }
    }

    pub fn phase(&self) -> Option<WorkflowPhase> {
        self.status.as_ref().and_then(|status| status.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn phase_parses_only_known_values() {
        assert_eq!("Running".parse::<WorkflowPhase>(), Ok(WorkflowPhase::Running));
        let err = "running".parse::<WorkflowPhase>().unwrap_err();
        assert!(err.to_string().contains("Pending, Running, Succeeded, Failed, Error, Skipped, Omitted"));
    }

    #[test]
    fn upstream_workflow_decodes_status_and_nodes() {
        let workflow: Workflow = serde_json::from_value(json!({
            "metadata": { "name": "hello-abc", "namespace": "argo", "creationTimestamp": "2024-05-01T10:00:00Z" },
            "spec": { "workflowTemplateRef": { "name": "hello" }, "serviceAccountName": "runner" },
            "status": {
                "phase": "Running",
                "progress": "1/2",
                "startedAt": "2024-05-01T10:00:01Z",
                "nodes": {
                    "hello-abc-1": { "id": "hello-abc-1", "name": "hello-abc[0].a", "displayName": "a", "type": "Pod", "phase": "Succeeded" },
                    "hello-abc-2": { "id": "hello-abc-2", "name": "b", "phase": "Running", "message": "waiting" }
                }
            }
        }))
        .unwrap();

        assert_eq!(workflow.phase(), Some(WorkflowPhase::Running));
        let status = workflow.status.as_ref().unwrap();
        assert_eq!(status.nodes.len(), 2);
        assert_eq!(status.nodes["hello-abc-1"].label(), "a");
        assert_eq!(status.nodes["hello-abc-2"].label(), "b");
        assert_eq!(workflow.spec.extra["serviceAccountName"], "runner");
    }

    #[test]
    fn unknown_or_empty_phase_is_absent() {
        let empty: WorkflowStatus = serde_json::from_value(json!({ "phase": "" })).unwrap();
        assert_eq!(empty.phase, None);
        let unknown: WorkflowStatus = serde_json::from_value(json!({ "phase": "Terminating" })).unwrap();
        assert_eq!(unknown.phase, None);
    }

    #[test]
    fn submission_flattens_parameters_into_arguments() {
        let mut parameters = IndexMap::new();
        parameters.insert("a".to_string(), "1".to_string());
        parameters.insert("b".to_string(), "2".to_string());
        let workflow = Workflow::from_template("hello", ObjectMeta::named("hello-1", "argo"), Some(&parameters));
        let encoded = serde_json::to_value(&workflow).unwrap();
        assert_eq!(encoded["spec"]["workflowTemplateRef"]["name"], "hello");
        assert_eq!(
            encoded["spec"]["arguments"]["parameters"],
            json!([{ "name": "a", "value": "1" }, { "name": "b", "value": "2" }])
        );
        assert!(encoded.get("status").is_none());
    }

    #[test]
    fn submission_without_parameters_omits_arguments() {
        let workflow = Workflow::from_template("hello", ObjectMeta::named("hello-1", "argo"), None);
        let encoded = serde_json::to_value(&workflow).unwrap();
        assert!(encoded["spec"].get("arguments").is_none());
    }
}
