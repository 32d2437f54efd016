//! Workflow template tool handler.

use std::sync::Arc;

use argonaut_api::ArgoApi;
use argonaut_types::{ToolError, WorkflowTemplate};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::handlers::DeleteOutcome;
use crate::handlers::args::{CreateTemplateArgs, ListTemplatesArgs, TemplateArgs};
use crate::handlers::validation::{validate_create_template_args, validate_list_templates_args, validate_template_args};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedTemplate {
    pub name: String,
    pub namespace: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateDetail {
    pub name: String,
    pub namespace: String,
    pub spec: Value,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateSummary {
    pub name: String,
    pub namespace: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateList {
    pub templates: Vec<TemplateSummary>,
}

/// Handles the `*_workflow_template` tools.
#[derive(Clone)]
pub struct TemplateToolHandler {
    client: Arc<dyn ArgoApi>,
}

impl TemplateToolHandler {
    pub fn new(client: Arc<dyn ArgoApi>) -> Self {
        Self { client }
    }

    pub async fn create(&self, args: CreateTemplateArgs) -> Result<CreatedTemplate, ToolError> {
        info!(operation = "create_workflow_template", name = %args.name, "creating workflow template");
        validate_create_template_args(&args)?;
        let namespace = self.namespace_or_default(args.namespace.as_deref());

        match self.client.create_workflow_template(&args.name, &namespace, args.spec).await {
            Ok(template) => {
                info!(
                    operation = "create_workflow_template",
                    name = %template.metadata.name,
                    namespace = %template.metadata.namespace,
                    "created workflow template"
                );
                let created_at = template
                    .metadata
                    .creation_timestamp
                    .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
                Ok(CreatedTemplate {
                    name: template.metadata.name,
                    namespace: template.metadata.namespace,
                    created_at,
                })
            }
            Err(failure) => Err(log_failure("create_workflow_template", Some(&args.name), &namespace, failure)),
        }
    }

    pub async fn get(&self, args: TemplateArgs) -> Result<TemplateDetail, ToolError> {
        info!(operation = "get_workflow_template", name = %args.name, "fetching workflow template");
        validate_template_args(&args)?;
        let namespace = self.namespace_or_default(args.namespace.as_deref());

        match self.client.get_workflow_template(&args.name, &namespace).await {
            Ok(template) => {
                info!(
                    operation = "get_workflow_template",
                    name = %template.metadata.name,
                    namespace = %template.metadata.namespace,
                    "fetched workflow template"
                );
                Ok(TemplateDetail {
                    created_at: template.metadata.creation_timestamp.unwrap_or_default(),
                    name: template.metadata.name,
                    namespace: template.metadata.namespace,
                    spec: template.spec,
                })
            }
            Err(failure) => Err(log_failure("get_workflow_template", Some(&args.name), &namespace, failure)),
        }
    }

    pub async fn list(&self, args: ListTemplatesArgs) -> Result<TemplateList, ToolError> {
        validate_list_templates_args(&args)?;
        let namespace = self.namespace_or_default(args.namespace.as_deref());
        info!(operation = "list_workflow_templates", %namespace, "listing workflow templates");

        match self.client.list_workflow_templates(Some(&namespace)).await {
            Ok(templates) => {
                info!(operation = "list_workflow_templates", %namespace, count = templates.len(), "listed workflow templates");
                Ok(TemplateList {
                    templates: templates.into_iter().map(summarize).collect(),
                })
            }
            Err(failure) => Err(log_failure("list_workflow_templates", None, &namespace, failure)),
        }
    }

    pub async fn delete(&self, args: TemplateArgs) -> Result<DeleteOutcome, ToolError> {
        info!(operation = "delete_workflow_template", name = %args.name, "deleting workflow template");
        validate_template_args(&args)?;
        let namespace = self.namespace_or_default(args.namespace.as_deref());

        match self.client.delete_workflow_template(&args.name, &namespace).await {
            Ok(()) => {
                info!(operation = "delete_workflow_template", name = %args.name, %namespace, "deleted workflow template");
                Ok(DeleteOutcome::deleted("Workflow Template", &args.name, &namespace))
            }
            Err(failure) => Err(log_failure("delete_workflow_template", Some(&args.name), &namespace, failure)),
        }
    }

    fn namespace_or_default(&self, namespace: Option<&str>) -> String {
        namespace.unwrap_or(self.client.default_namespace()).to_string()
    }
}

fn summarize(template: WorkflowTemplate) -> TemplateSummary {
    TemplateSummary {
        created_at: template.metadata.creation_timestamp.unwrap_or_default(),
        name: template.metadata.name,
        namespace: template.metadata.namespace,
    }
}

/// Log a failed operation and hand the error back unchanged.
pub(crate) fn log_failure(operation: &'static str, name: Option<&str>, namespace: &str, failure: ToolError) -> ToolError {
    error!(
        operation,
        name = name.unwrap_or_default(),
        namespace,
        error = %failure,
        error_type = %failure.kind(),
        "tool operation failed"
    );
    failure
}
