//! Model Context Protocol (MCP) front end for Argo Workflows.
//!
//! This crate turns named tool calls into Argo Server operations:
//!
//! - [`handlers`] validate arguments, call the [`argonaut_api::ArgoApi`]
//!   client, and shape compact replies
//! - [`server`] decodes tool calls, routes them, renders results and error
//!   envelopes, and hosts the protocol over stdio or streamable HTTP

pub mod handlers;
pub mod server;

pub use handlers::{DeleteOutcome, TemplateToolHandler, WorkflowToolHandler};
pub use server::{
    ArgonautMcpCore, McpHttpServer, RunningMcpHttpServer, ToolCall, ToolDispatcher, ToolName, resolve_bind_address, serve_stdio,
    tool_catalog,
};
