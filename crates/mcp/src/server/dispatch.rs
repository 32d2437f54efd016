//! Tool-call routing: decode by name, run the handler, render the reply.

use std::sync::Arc;

use argonaut_api::ArgoApi;
use argonaut_types::{ErrorKind, ToolError};
use rmcp::model::{CallToolResult, Content, JsonObject};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error, info};

use crate::handlers::args::{CreateTemplateArgs, ListTemplatesArgs, ListWorkflowsArgs, SubmitWorkflowArgs, TemplateArgs, WorkflowArgs};
use crate::handlers::{TemplateToolHandler, WorkflowToolHandler};
use crate::server::catalog::ToolName;

/// A tool invocation decoded into its typed arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    CreateWorkflowTemplate(CreateTemplateArgs),
    GetWorkflowTemplate(TemplateArgs),
    ListWorkflowTemplates(ListTemplatesArgs),
    DeleteWorkflowTemplate(TemplateArgs),
    SubmitWorkflow(SubmitWorkflowArgs),
    GetWorkflowStatus(WorkflowArgs),
    ListWorkflows(ListWorkflowsArgs),
    DeleteWorkflow(WorkflowArgs),
}

impl ToolCall {
    /// Decode a raw invocation.
    ///
    /// Unknown names and structurally malformed arguments both fail with
    /// `InvalidInput`; missing arguments decode as an empty object.
    pub fn decode(name: &str, arguments: Option<JsonObject>) -> Result<Self, ToolError> {
        let tool = ToolName::from_name(name).ok_or_else(|| {
            ToolError::new(
                ErrorKind::InvalidInput,
                format!("Unknown tool: {name}"),
                Some(json!({ "tool_name": name })),
            )
        })?;
        let arguments = arguments.unwrap_or_default();
        reject_explicit_nulls(tool, &arguments)?;
        let arguments = Value::Object(arguments);

        Ok(match tool {
            ToolName::CreateWorkflowTemplate => ToolCall::CreateWorkflowTemplate(decode_args(tool, arguments)?),
            ToolName::GetWorkflowTemplate => ToolCall::GetWorkflowTemplate(decode_args(tool, arguments)?),
            ToolName::ListWorkflowTemplates => ToolCall::ListWorkflowTemplates(decode_args(tool, arguments)?),
            ToolName::DeleteWorkflowTemplate => ToolCall::DeleteWorkflowTemplate(decode_args(tool, arguments)?),
            ToolName::SubmitWorkflow => ToolCall::SubmitWorkflow(decode_args(tool, arguments)?),
            ToolName::GetWorkflowStatus => ToolCall::GetWorkflowStatus(decode_args(tool, arguments)?),
            ToolName::ListWorkflows => ToolCall::ListWorkflows(decode_args(tool, arguments)?),
            ToolName::DeleteWorkflow => ToolCall::DeleteWorkflow(decode_args(tool, arguments)?),
        })
    }

    pub fn tool_name(&self) -> ToolName {
        match self {
            ToolCall::CreateWorkflowTemplate(_) => ToolName::CreateWorkflowTemplate,
            ToolCall::GetWorkflowTemplate(_) => ToolName::GetWorkflowTemplate,
            ToolCall::ListWorkflowTemplates(_) => ToolName::ListWorkflowTemplates,
            ToolCall::DeleteWorkflowTemplate(_) => ToolName::DeleteWorkflowTemplate,
            ToolCall::SubmitWorkflow(_) => ToolName::SubmitWorkflow,
            ToolCall::GetWorkflowStatus(_) => ToolName::GetWorkflowStatus,
            ToolCall::ListWorkflows(_) => ToolName::ListWorkflows,
            ToolCall::DeleteWorkflow(_) => ToolName::DeleteWorkflow,
        }
    }
}

/// An argument that is present must carry a value; `null` is not "omitted".
fn reject_explicit_nulls(tool: ToolName, arguments: &JsonObject) -> Result<(), ToolError> {
    let Some(field) = tool
        .argument_fields()
        .iter()
        .find(|field| arguments.get(**field).is_some_and(Value::is_null))
    else {
        return Ok(());
    };
    let reason = match *field {
        "spec" | "parameters" => format!("{field} must be an object"),
        _ => format!("{field} must be a non-empty string"),
    };
    Err(ToolError::invalid_input(field, reason))
}

fn decode_args<T: DeserializeOwned>(tool: ToolName, arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|decode_error| {
        ToolError::new(
            ErrorKind::InvalidInput,
            format!("Invalid arguments for tool '{tool}': {decode_error}"),
            Some(json!({ "tool_name": tool.as_str(), "reason": decode_error.to_string() })),
        )
    })
}

/// Routes tool calls to the template and workflow handlers.
#[derive(Clone)]
pub struct ToolDispatcher {
    templates: TemplateToolHandler,
    workflows: WorkflowToolHandler,
}

impl ToolDispatcher {
    pub fn new(client: Arc<dyn ArgoApi>) -> Self {
        Self {
            templates: TemplateToolHandler::new(Arc::clone(&client)),
            workflows: WorkflowToolHandler::new(client),
        }
    }

    /// Run a decoded call and return its reply as JSON.
    pub async fn dispatch(&self, call: ToolCall) -> Result<Value, ToolError> {
        match call {
            ToolCall::CreateWorkflowTemplate(args) => to_payload(self.templates.create(args).await?),
            ToolCall::GetWorkflowTemplate(args) => to_payload(self.templates.get(args).await?),
            ToolCall::ListWorkflowTemplates(args) => to_payload(self.templates.list(args).await?),
            ToolCall::DeleteWorkflowTemplate(args) => to_payload(self.templates.delete(args).await?),
            ToolCall::SubmitWorkflow(args) => to_payload(self.workflows.submit(args).await?),
            ToolCall::GetWorkflowStatus(args) => to_payload(self.workflows.get_status(args).await?),
            ToolCall::ListWorkflows(args) => to_payload(self.workflows.list(args).await?),
            ToolCall::DeleteWorkflow(args) => to_payload(self.workflows.delete(args).await?),
        }
    }

    /// Handle one raw tool call end to end.
    ///
    /// Success yields a single pretty-printed JSON text block. Failure yields
    /// the `{error_type, message, details?}` envelope with the error flag set.
    pub async fn handle_tool_call(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        debug!(tool_name = name, ?arguments, "routing tool call");

        let outcome = match ToolCall::decode(name, arguments) {
            Ok(call) => self.dispatch(call).await,
            Err(decode_error) => Err(decode_error),
        };

        match outcome {
            Ok(payload) => {
                info!(tool_name = name, "tool call succeeded");
                CallToolResult::success(vec![Content::text(render(&payload))])
            }
            Err(failure) => {
                error!(tool_name = name, error = %failure, error_type = %failure.kind(), "tool call failed");
                CallToolResult::error(vec![Content::text(render(&failure.to_response()))])
            }
        }
    }
}

fn to_payload<T: Serialize>(reply: T) -> Result<Value, ToolError> {
    serde_json::to_value(reply)
        .map_err(|encode_error| ToolError::internal_error("Failed to encode tool response", Some(&encode_error.to_string())))
}

fn render<T: Serialize>(payload: &T) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|encode_error| {
        json!({ "error_type": ErrorKind::InternalError, "message": encode_error.to_string() }).to_string()
    })
}
