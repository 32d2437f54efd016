//! Error taxonomy shared by the client, the tool handlers, and the dispatch layer.
//!
//! Every failure surfaced to a tool caller is a [`ToolError`] carrying exactly one
//! [`ErrorKind`]. The kind decides the stable `error_type` string and the JSON-RPC
//! code used when the error is embedded in a protocol envelope.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

/// Closed set of error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    InvalidInput,
    ValidationError,
    ConnectionError,
    AuthorizationError,
    AuthenticationError,
    InternalError,
    TimeoutError,
    NetworkError,
}

impl ErrorKind {
    /// All kinds, in declaration order.
    pub const ALL: [ErrorKind; 10] = [
        ErrorKind::NotFound,
        ErrorKind::AlreadyExists,
        ErrorKind::InvalidInput,
        ErrorKind::ValidationError,
        ErrorKind::ConnectionError,
        ErrorKind::AuthorizationError,
        ErrorKind::AuthenticationError,
        ErrorKind::InternalError,
        ErrorKind::TimeoutError,
        ErrorKind::NetworkError,
    ];

    /// Stable `error_type` string reported to callers.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::AlreadyExists => "AlreadyExists",
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::ValidationError => "ValidationError",
            ErrorKind::ConnectionError => "ConnectionError",
            ErrorKind::AuthorizationError => "AuthorizationError",
            ErrorKind::AuthenticationError => "AuthenticationError",
            ErrorKind::InternalError => "InternalError",
            ErrorKind::TimeoutError => "TimeoutError",
            ErrorKind::NetworkError => "NetworkError",
        }
    }

    /// JSON-RPC error code for this kind.
    pub fn code(&self) -> i32 {
        match self {
            ErrorKind::NotFound => -32001,
            ErrorKind::AlreadyExists => -32002,
            ErrorKind::InvalidInput => -32003,
            ErrorKind::ValidationError => -32004,
            ErrorKind::ConnectionError => -32005,
            ErrorKind::AuthorizationError => -32006,
            ErrorKind::AuthenticationError => -32007,
            ErrorKind::TimeoutError => -32008,
            ErrorKind::NetworkError => -32009,
            ErrorKind::InternalError => -32000,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error returned by every tool operation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ToolError {
    kind: ErrorKind,
    message: String,
    details: Option<Value>,
}

/// Caller-facing error envelope: `{error_type, message, details?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_type: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// JSON-RPC shaped error: `{code, message, data}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    pub data: Value,
}

impl ToolError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            kind,
            message: message.into(),
            details,
        }
    }

    /// Resource `name` is absent from `namespace`.
    pub fn not_found(resource: &str, name: &str, namespace: &str) -> Self {
        Self::new(
            ErrorKind::NotFound,
            format!("{resource} '{name}' not found in namespace '{namespace}'"),
            Some(json!({ "resource": resource, "name": name, "namespace": namespace })),
        )
    }

    /// Resource `name` already exists in `namespace`.
    pub fn already_exists(resource: &str, name: &str, namespace: &str) -> Self {
        Self::new(
            ErrorKind::AlreadyExists,
            format!("{resource} '{name}' already exists in namespace '{namespace}'"),
            Some(json!({ "resource": resource, "name": name, "namespace": namespace })),
        )
    }

    /// A single argument field failed validation.
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::new(
            ErrorKind::InvalidInput,
            format!("Invalid input for field '{field}': {reason}"),
            Some(json!({ "field": field, "reason": reason })),
        )
    }

    /// The upstream rejected the request content.
    pub fn validation_error(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self::new(ErrorKind::ValidationError, message, Some(json!({ "errors": errors })))
    }

    pub fn connection_error(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::ConnectionError,
            format!("Failed to connect to Argo Server: {}", message.into()),
            None,
        )
    }

    pub fn authorization_error(action: &str, required_permissions: Vec<String>) -> Self {
        Self::new(
            ErrorKind::AuthorizationError,
            format!("Insufficient permissions to {action}"),
            Some(json!({ "required_permissions": required_permissions })),
        )
    }

    pub fn authentication_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthenticationError, message, None)
    }

    pub fn timeout_error(operation: &str, timeout_ms: u64) -> Self {
        Self::new(
            ErrorKind::TimeoutError,
            format!("{operation} timed out after {timeout_ms}ms"),
            Some(json!({ "operation": operation, "timeout_ms": timeout_ms })),
        )
    }

    pub fn network_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkError, message, None)
    }

    /// Unexpected failure, optionally wrapping the text of the underlying cause.
    pub fn internal_error(message: impl Into<String>, cause: Option<&str>) -> Self {
        let details = cause.map(|cause| json!({ "original_error": cause }));
        Self::new(ErrorKind::InternalError, message, details)
    }

    /// Attach one extra diagnostic field to `details`.
    ///
    /// Non-object details are preserved under a `value` key.
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        let mut fields = match self.details.take() {
            Some(Value::Object(fields)) => fields,
            Some(other) => {
                let mut fields = Map::new();
                fields.insert("value".to_string(), other);
                fields
            }
            None => Map::new(),
        };
        fields.insert(key.to_string(), value.into());
        self.details = Some(Value::Object(fields));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Caller-facing envelope.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error_type: self.kind,
            message: self.message.clone(),
            details: self.details.clone(),
        }
    }

    /// JSON-RPC form with the kind's numeric code.
    pub fn to_json_rpc(&self) -> JsonRpcError {
        JsonRpcError {
            code: self.kind.code(),
            message: self.message.clone(),
            data: json!({
                "error_type": self.kind,
                "details": self.details,
            }),
        }
    }
}
