//! Translation of transport and HTTP failures into [`ToolError`]s.

use std::time::Duration;

use argonaut_types::{ErrorKind, ToolError};
use serde_json::{Value, json};

/// The resource a request was addressed to, carried into error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceTarget<'a> {
    pub action: &'static str,
    pub resource: &'static str,
    /// `None` for collection requests.
    pub name: Option<&'a str>,
    pub namespace: &'a str,
}

impl<'a> ResourceTarget<'a> {
    pub fn item(action: &'static str, resource: &'static str, name: &'a str, namespace: &'a str) -> Self {
        Self {
            action,
            resource,
            name: Some(name),
            namespace,
        }
    }

    pub fn collection(action: &'static str, resource: &'static str, namespace: &'a str) -> Self {
        Self {
            action,
            resource,
            name: None,
            namespace,
        }
    }

    /// Human phrase such as `get WorkflowTemplate 'hello' in namespace 'argo'`.
    pub fn describe(&self) -> String {
        match self.name {
            Some(name) => format!("{} {} '{}' in namespace '{}'", self.action, self.resource, name, self.namespace),
            None => format!("{} {} in namespace '{}'", self.action, self.resource, self.namespace),
        }
    }
}

/// Map a non-success HTTP status into the error taxonomy.
///
/// The upstream body's `message` field (or the raw body) is attached as
/// `upstream_message`.
pub fn map_status_error(status: u16, body: &str, target: &ResourceTarget<'_>) -> ToolError {
    let upstream_message = upstream_message(status, body);

    let error = match status {
        404 => match target.name {
            Some(name) => ToolError::not_found(target.resource, name, target.namespace),
            None => ToolError::new(
                ErrorKind::NotFound,
                format!("{} collection not found in namespace '{}'", target.resource, target.namespace),
                Some(json!({ "resource": target.resource, "namespace": target.namespace })),
            ),
        },
        409 => ToolError::already_exists(target.resource, target.name.unwrap_or("unknown"), target.namespace),
        400 => ToolError::validation_error("Invalid request", vec![upstream_message.clone()]),
        401 | 403 => ToolError::authorization_error(&target.describe(), vec![upstream_message.clone()]),
        500..=599 => ToolError::internal_error("Argo Server error", Some(&upstream_message)),
        other => ToolError::internal_error(format!("HTTP {other} error"), Some(&upstream_message)),
    };

    error
        .with_detail("status", status)
        .with_detail("upstream_message", upstream_message)
}

/// Map a failure that produced no HTTP response.
pub fn map_transport_error(error: &reqwest::Error, target: &ResourceTarget<'_>, timeout: Duration) -> ToolError {
    let text = error.to_string();
    let mapped = if error.is_timeout() {
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        ToolError::timeout_error(&target.describe(), timeout_ms)
    } else {
        ToolError::connection_error(text.clone())
    };
    mapped.with_detail("upstream_message", text)
}

fn upstream_message(status: u16, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_string));
    if let Some(message) = from_json.filter(|message| !message.is_empty()) {
        return message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        trimmed.to_string()
    }
}
