mod catalog;
mod core;
mod dispatch;
mod http;
mod stdio;

pub use catalog::{ToolName, tool_catalog};
pub use core::ArgonautMcpCore;
pub use dispatch::{ToolCall, ToolDispatcher};
pub use http::{McpHttpServer, RunningMcpHttpServer, resolve_bind_address};
pub use stdio::serve_stdio;
