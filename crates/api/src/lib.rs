//! Argo Server API client.
//!
//! This crate provides a lightweight client for the Argo Workflows server REST
//! API. It focuses on:
//!
//! - Constructing an HTTP client with the configured credential, TLS mode, and
//!   request timeout
//! - One method per resource operation on workflow templates and workflows
//! - Mapping transport and HTTP failures into the shared [`ToolError`] taxonomy
//!
//! The primary entry point is [`ArgoClient`]. Create an instance via
//! [`ArgoClient::new`], confirm reachability with [`ArgoClient::initialize`],
//! and share it behind the [`ArgoApi`] trait.
//!
//! # Example
//!
//! ```ignore
//! use argonaut_api::{ArgoApi, ArgoClient, ArgoClientConfig};
//!
//! async fn run() -> anyhow::Result<()> {
//!     let client = ArgoClient::new(ArgoClientConfig::new("https://localhost:2746"))?;
//!     client.initialize().await?;
//!     let templates = client.list_workflow_templates(None).await?;
//!     println!("{} templates", templates.len());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod errors;

pub use client::ArgoClient;
pub use config::{ArgoClientConfig, DEFAULT_REQUEST_TIMEOUT};
pub use errors::{ResourceTarget, map_status_error, map_transport_error};

use argonaut_types::{ToolError, Workflow, WorkflowPhase, WorkflowTemplate};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

/// Resource operations against the orchestration server.
///
/// Every call is a fresh upstream round trip; nothing is cached.
#[async_trait]
pub trait ArgoApi: Send + Sync {
    /// Namespace applied when a caller omits one.
    fn default_namespace(&self) -> &str;

    async fn create_workflow_template(&self, name: &str, namespace: &str, spec: Value) -> Result<WorkflowTemplate, ToolError>;

    async fn get_workflow_template(&self, name: &str, namespace: &str) -> Result<WorkflowTemplate, ToolError>;

    /// Lists templates in `namespace`, or in the default namespace when `None`.
    async fn list_workflow_templates(&self, namespace: Option<&str>) -> Result<Vec<WorkflowTemplate>, ToolError>;

    async fn delete_workflow_template(&self, name: &str, namespace: &str) -> Result<(), ToolError>;

    /// Submit a workflow referencing `template_name`.
    ///
    /// The workflow is named `generate_name` when given, otherwise
    /// `{template_name}-{epoch millis}`.
    async fn submit_workflow(
        &self,
        template_name: &str,
        namespace: &str,
        parameters: Option<&IndexMap<String, String>>,
        generate_name: Option<&str>,
    ) -> Result<Workflow, ToolError>;

    async fn get_workflow(&self, name: &str, namespace: &str) -> Result<Workflow, ToolError>;

    async fn list_workflows(&self, namespace: Option<&str>, phase: Option<WorkflowPhase>) -> Result<Vec<Workflow>, ToolError>;

    async fn delete_workflow(&self, name: &str, namespace: &str) -> Result<(), ToolError>;
}
