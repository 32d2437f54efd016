use std::sync::Arc;

use argonaut_api::ArgoApi;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, ErrorData as McpError, Implementation, ListToolsResult, PaginatedRequestParams,
    ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::{RoleServer, ServerHandler, service::RequestContext};
use tracing::debug;

use crate::server::catalog::tool_catalog;
use crate::server::dispatch::ToolDispatcher;

/// Protocol-facing handler shared by every transport.
#[derive(Clone)]
pub struct ArgonautMcpCore {
    dispatcher: ToolDispatcher,
    tools: Arc<Vec<Tool>>,
}

impl ArgonautMcpCore {
    /// Create a core backed by `client`.
    pub fn new(client: Arc<dyn ArgoApi>) -> Self {
        Self {
            dispatcher: ToolDispatcher::new(client),
            tools: Arc::new(tool_catalog()),
        }
    }

    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }
}

impl ServerHandler for ArgonautMcpCore {
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        debug!(count = self.tools.len(), "listing tools");
        std::future::ready(Ok(ListToolsResult::with_all_items(self.tools.as_ref().clone())))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move { Ok(self.dispatcher.handle_tool_call(&request.name, request.arguments).await) }
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "argonaut".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Argo Workflows MCP".to_string()),
                ..Default::default()
            },
            instructions: Some(
                "Manage Argo Workflows resources.\nTEMPLATES: create_workflow_template, get_workflow_template, list_workflow_templates, delete_workflow_template.\nWORKFLOWS: submit_workflow runs a template; poll get_workflow_status for phase and node progress; list_workflows accepts a phase filter; delete_workflow removes a run.\nNAMESPACE: optional on every tool; defaults to the server's configured namespace.\nERRORS: failed calls return {error_type, message, details?} with isError set.".to_string(),
            ),
        }
    }
}
