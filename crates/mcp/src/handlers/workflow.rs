//! Workflow instance tool handler.

use std::sync::Arc;

use argonaut_api::ArgoApi;
use argonaut_types::{NodeStatus, ToolError, Workflow, WorkflowPhase};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

use crate::handlers::DeleteOutcome;
use crate::handlers::args::{ListWorkflowsArgs, SubmitWorkflowArgs, WorkflowArgs};
use crate::handlers::template::log_failure;
use crate::handlers::validation::{validate_list_workflows_args, validate_submit_args, validate_workflow_args};

/// Phase reported when the server has not assigned one.
const UNKNOWN_PHASE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmittedWorkflow {
    pub name: String,
    pub namespace: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowStatusReport {
    pub name: String,
    pub namespace: String,
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub nodes: Vec<NodeSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    pub name: String,
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowSummary {
    pub name: String,
    pub namespace: String,
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowList {
    pub workflows: Vec<WorkflowSummary>,
}

/// Handles `submit_workflow`, `get_workflow_status`, `list_workflows`, and
/// `delete_workflow`.
#[derive(Clone)]
pub struct WorkflowToolHandler {
    client: Arc<dyn ArgoApi>,
}

impl WorkflowToolHandler {
    pub fn new(client: Arc<dyn ArgoApi>) -> Self {
        Self { client }
    }

    pub async fn submit(&self, args: SubmitWorkflowArgs) -> Result<SubmittedWorkflow, ToolError> {
        let parameters = validate_submit_args(&args)?;
        let namespace = self.namespace_or_default(args.namespace.as_deref());
        info!(operation = "submit_workflow", template_name = %args.template_name, %namespace, "submitting workflow");

        let submitted = self
            .client
            .submit_workflow(&args.template_name, &namespace, parameters.as_ref(), args.generate_name.as_deref())
            .await;
        match submitted {
            Ok(workflow) => {
                let status = workflow.phase().unwrap_or(WorkflowPhase::Pending).to_string();
                info!(
                    operation = "submit_workflow",
                    name = %workflow.metadata.name,
                    namespace = %workflow.metadata.namespace,
                    phase = %status,
                    "submitted workflow"
                );
                let created_at = workflow
                    .metadata
                    .creation_timestamp
                    .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
                Ok(SubmittedWorkflow {
                    name: workflow.metadata.name,
                    namespace: workflow.metadata.namespace,
                    status,
                    created_at,
                })
            }
            Err(failure) => Err(log_failure("submit_workflow", Some(&args.template_name), &namespace, failure)),
        }
    }

    pub async fn get_status(&self, args: WorkflowArgs) -> Result<WorkflowStatusReport, ToolError> {
        info!(operation = "get_workflow_status", name = %args.name, "fetching workflow status");
        validate_workflow_args(&args)?;
        let namespace = self.namespace_or_default(args.namespace.as_deref());

        match self.client.get_workflow(&args.name, &namespace).await {
            Ok(workflow) => {
                let report = status_report(workflow);
                info!(
                    operation = "get_workflow_status",
                    name = %report.name,
                    namespace = %report.namespace,
                    phase = %report.phase,
                    "fetched workflow status"
                );
                Ok(report)
            }
            Err(failure) => Err(log_failure("get_workflow_status", Some(&args.name), &namespace, failure)),
        }
    }

    pub async fn list(&self, args: ListWorkflowsArgs) -> Result<WorkflowList, ToolError> {
        let phase = validate_list_workflows_args(&args)?;
        let namespace = self.namespace_or_default(args.namespace.as_deref());
        let phase_filter = phase.map(|phase| phase.as_str()).unwrap_or("all");
        info!(operation = "list_workflows", %namespace, phase = phase_filter, "listing workflows");

        match self.client.list_workflows(Some(&namespace), phase).await {
            Ok(workflows) => {
                info!(operation = "list_workflows", %namespace, phase = phase_filter, count = workflows.len(), "listed workflows");
                Ok(WorkflowList {
                    workflows: workflows.into_iter().map(summarize).collect(),
                })
            }
            Err(failure) => Err(log_failure("list_workflows", None, &namespace, failure)),
        }
    }

    pub async fn delete(&self, args: WorkflowArgs) -> Result<DeleteOutcome, ToolError> {
        info!(operation = "delete_workflow", name = %args.name, "deleting workflow");
        validate_workflow_args(&args)?;
        let namespace = self.namespace_or_default(args.namespace.as_deref());

        match self.client.delete_workflow(&args.name, &namespace).await {
            Ok(()) => {
                info!(operation = "delete_workflow", name = %args.name, %namespace, "deleted workflow");
                Ok(DeleteOutcome::deleted("Workflow", &args.name, &namespace))
            }
            Err(failure) => Err(log_failure("delete_workflow", Some(&args.name), &namespace, failure)),
        }
    }

    fn namespace_or_default(&self, namespace: Option<&str>) -> String {
        namespace.unwrap_or(self.client.default_namespace()).to_string()
    }
}

fn phase_label(workflow: &Workflow) -> String {
    workflow
        .phase()
        .map(|phase| phase.to_string())
        .unwrap_or_else(|| UNKNOWN_PHASE.to_string())
}

fn status_report(workflow: Workflow) -> WorkflowStatusReport {
    let phase = phase_label(&workflow);
    let status = workflow.status.unwrap_or_default();
    WorkflowStatusReport {
        name: workflow.metadata.name,
        namespace: workflow.metadata.namespace,
        phase,
        progress: status.progress,
        started_at: status.started_at,
        finished_at: status.finished_at,
        message: status.message,
        nodes: status.nodes.values().map(summarize_node).collect(),
    }
}

fn summarize_node(node: &NodeStatus) -> NodeSummary {
    NodeSummary {
        name: node.label().to_string(),
        phase: node.phase.clone(),
        message: node.message.clone(),
    }
}

fn summarize(workflow: Workflow) -> WorkflowSummary {
    let phase = phase_label(&workflow);
    let status = workflow.status.unwrap_or_default();
    WorkflowSummary {
        name: workflow.metadata.name,
        namespace: workflow.metadata.namespace,
        phase,
        progress: status.progress,
        created_at: workflow.metadata.creation_timestamp.unwrap_or_default(),
        finished_at: status.finished_at,
    }
}
