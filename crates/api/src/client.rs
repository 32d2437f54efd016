use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use argonaut_types::{ErrorKind, ObjectMeta, ResourceList, ToolError, Workflow, WorkflowPhase, WorkflowStatus, WorkflowTemplate};
use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, Method, RequestBuilder, Response, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::ArgoApi;
use crate::config::{ArgoClientConfig, normalize_base_url};
use crate::errors::{ResourceTarget, map_status_error, map_transport_error};

const TEMPLATE_RESOURCE: &str = "WorkflowTemplate";
const WORKFLOW_RESOURCE: &str = "Workflow";
/// Label the server stamps with a workflow's current phase.
const PHASE_LABEL: &str = "workflows.argoproj.io/phase";

/// Characters escaped when a name or namespace becomes a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

#[derive(Serialize)]
struct CreateTemplateBody<'a> {
    template: &'a WorkflowTemplate,
}

#[derive(Serialize)]
struct SubmitWorkflowBody<'a> {
    workflow: &'a Workflow,
}

/// Thin wrapper around a configured `reqwest::Client` for Argo Server access.
///
/// The client pre-configures the bearer credential, TLS mode, and timeout,
/// and builds requests against a validated base URL. Configuration is
/// immutable after construction.
#[derive(Debug, Clone)]
pub struct ArgoClient {
    base_url: String,
    http: Client,
    default_namespace: String,
    timeout: Duration,
    user_agent: String,
}

impl ArgoClient {
    /// Construct an [`ArgoClient`] from `config`.
    ///
    /// Fails when the base URL is not an absolute http(s) URL or the token
    /// cannot be carried in a header.
    pub fn new(config: ArgoClientConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;

        let mut default_headers = header::HeaderMap::new();
        if let Some(token) = config.token.as_deref() {
            let mut authorization =
                header::HeaderValue::from_str(&format!("Bearer {token}")).context("Argo token is not a valid header value")?;
            authorization.set_sensitive(true);
            default_headers.insert(header::AUTHORIZATION, authorization);
        }
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        if config.insecure {
            warn!("TLS certificate verification is disabled for the Argo Server connection");
        }

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .context("build http client")?;

        Ok(Self {
            base_url,
            http,
            default_namespace: config.namespace,
            timeout: config.timeout,
            user_agent: format!("argonaut/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Confirm the server is reachable by listing templates in the default
    /// namespace.
    ///
    /// A 404 counts as success (the namespace is simply empty). Any other
    /// failure is reported as a `ConnectionError`.
    pub async fn initialize(&self) -> Result<(), ToolError> {
        info!(base_url = %self.base_url, default_namespace = %self.default_namespace, "initializing Argo Server client");

        match self.list_workflow_templates(None).await {
            Ok(_) => {
                info!("connected to Argo Server");
                Ok(())
            }
            Err(probe_error) if probe_error.kind() == ErrorKind::NotFound => {
                info!("connected to Argo Server (namespace may be empty)");
                Ok(())
            }
            Err(probe_error) => {
                error!(error = %probe_error, error_type = %probe_error.kind(), "unable to reach Argo Server");
                if probe_error.kind() == ErrorKind::ConnectionError {
                    return Err(probe_error);
                }
                let mut connection_error =
                    ToolError::connection_error(probe_error.message()).with_detail("error_type", probe_error.kind().as_str());
                if let Some(details) = probe_error.details() {
                    connection_error = connection_error.with_detail("cause", details.clone());
                }
                Err(connection_error)
            }
        }
    }

    /// Build a `reqwest::RequestBuilder` for a method and API-relative path.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }

    async fn send(&self, builder: RequestBuilder, target: &ResourceTarget<'_>) -> Result<Response, ToolError> {
        let response = builder.send().await.map_err(|error| {
            let mapped = map_transport_error(&error, target, self.timeout);
            debug!(target = %target.describe(), error = %mapped, "Argo Server request failed without a response");
            mapped
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let mapped = map_status_error(status.as_u16(), &body, target);
        debug!(target = %target.describe(), status = status.as_u16(), error = %mapped, "Argo Server rejected request");
        Err(mapped)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder, target: &ResourceTarget<'_>) -> Result<T, ToolError> {
        let response = self.send(builder, target).await?;
        response.json::<T>().await.map_err(|error| {
            if error.is_timeout() {
                return map_transport_error(&error, target, self.timeout);
            }
            ToolError::internal_error(
                format!("Failed to decode Argo Server response to {}", target.describe()),
                Some(&error.to_string()),
            )
        })
    }

    fn resolve_namespace<'a>(&'a self, namespace: Option<&'a str>) -> &'a str {
        namespace.unwrap_or(&self.default_namespace)
    }
}

#[async_trait]
impl ArgoApi for ArgoClient {
    fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    async fn create_workflow_template(&self, name: &str, namespace: &str, spec: Value) -> Result<WorkflowTemplate, ToolError> {
        let target = ResourceTarget::item("create", TEMPLATE_RESOURCE, name, namespace);
        let template = WorkflowTemplate::new(name, namespace, spec);
        let builder = self
            .request(Method::POST, &templates_path(namespace))
            .json(&CreateTemplateBody { template: &template });
        self.send_json(builder, &target).await
    }

    async fn get_workflow_template(&self, name: &str, namespace: &str) -> Result<WorkflowTemplate, ToolError> {
        let target = ResourceTarget::item("get", TEMPLATE_RESOURCE, name, namespace);
        let builder = self.request(Method::GET, &template_path(namespace, name));
        self.send_json(builder, &target).await
    }

    async fn list_workflow_templates(&self, namespace: Option<&str>) -> Result<Vec<WorkflowTemplate>, ToolError> {
        let namespace = self.resolve_namespace(namespace);
        let target = ResourceTarget::collection("list", TEMPLATE_RESOURCE, namespace);
        let builder = self.request(Method::GET, &templates_path(namespace));
        let list: ResourceList<WorkflowTemplate> = self.send_json(builder, &target).await?;
        Ok(list.into_items())
    }

    async fn delete_workflow_template(&self, name: &str, namespace: &str) -> Result<(), ToolError> {
        let target = ResourceTarget::item("delete", TEMPLATE_RESOURCE, name, namespace);
        let builder = self.request(Method::DELETE, &template_path(namespace, name));
        self.send(builder, &target).await.map(|_| ())
    }

    async fn submit_workflow(
        &self,
        template_name: &str,
        namespace: &str,
        parameters: Option<&IndexMap<String, String>>,
        generate_name: Option<&str>,
    ) -> Result<Workflow, ToolError> {
        let workflow_name = match generate_name {
            Some(generate_name) => generate_name.to_string(),
            None => format!("{template_name}-{}", Utc::now().timestamp_millis()),
        };
        let target = ResourceTarget::item("submit", WORKFLOW_RESOURCE, &workflow_name, namespace);

        let mut metadata = ObjectMeta::named(workflow_name.as_str(), namespace);
        metadata.generate_name = generate_name.map(str::to_string);
        let workflow = Workflow::from_template(template_name, metadata, parameters);

        let builder = self
            .request(Method::POST, &workflows_path(namespace))
            .json(&SubmitWorkflowBody { workflow: &workflow });
        let mut created: Workflow = self.send_json(builder, &target).await?;

        let status = created.status.get_or_insert_with(WorkflowStatus::default);
        status.phase.get_or_insert(WorkflowPhase::Pending);
        Ok(created)
    }

    async fn get_workflow(&self, name: &str, namespace: &str) -> Result<Workflow, ToolError> {
        let target = ResourceTarget::item("get", WORKFLOW_RESOURCE, name, namespace);
        let builder = self.request(Method::GET, &workflow_path(namespace, name));
        self.send_json(builder, &target).await
    }

    async fn list_workflows(&self, namespace: Option<&str>, phase: Option<WorkflowPhase>) -> Result<Vec<Workflow>, ToolError> {
        let namespace = self.resolve_namespace(namespace);
        let target = ResourceTarget::collection("list", WORKFLOW_RESOURCE, namespace);
        let mut builder = self.request(Method::GET, &workflows_path(namespace));
        if let Some(phase) = phase {
            let label_selector = format!("{PHASE_LABEL}={phase}");
            builder = builder.query(&[("phase", phase.as_str()), ("listOptions.labelSelector", label_selector.as_str())]);
        }
        let list: ResourceList<Workflow> = self.send_json(builder, &target).await?;
        Ok(list.into_items())
    }

    async fn delete_workflow(&self, name: &str, namespace: &str) -> Result<(), ToolError> {
        let target = ResourceTarget::item("delete", WORKFLOW_RESOURCE, name, namespace);
        let builder = self.request(Method::DELETE, &workflow_path(namespace, name));
        self.send(builder, &target).await.map(|_| ())
    }
}

fn segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

fn templates_path(namespace: &str) -> String {
    format!("/api/v1/workflow-templates/{}", segment(namespace))
}

fn template_path(namespace: &str, name: &str) -> String {
    format!("/api/v1/workflow-templates/{}/{}", segment(namespace), segment(name))
}

fn workflows_path(namespace: &str) -> String {
    format!("/api/v1/workflows/{}", segment(namespace))
}

fn workflow_path(namespace: &str, name: &str) -> String {
    format!("/api/v1/workflows/{}/{}", segment(namespace), segment(name))
}
