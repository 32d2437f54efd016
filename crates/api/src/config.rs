//! Connection settings for the Argo Server client.

use std::fmt;
use std::time::Duration;

use anyhow::{Result, anyhow};
use argonaut_types::DEFAULT_NAMESPACE;
use url::Url;

/// Upper bound applied to every upstream request unless overridden.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable configuration consumed by [`crate::ArgoClient::new`].
#[derive(Clone)]
pub struct ArgoClientConfig {
    /// Argo Server base URL, for example `https://argo-server.argo:2746`.
    pub base_url: String,
    /// Bearer credential forwarded on every request.
    pub token: Option<String>,
    /// Skip TLS certificate verification. Development only.
    pub insecure: bool,
    /// Namespace used when an operation does not name one.
    pub namespace: String,
    pub timeout: Duration,
}

impl ArgoClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            insecure: false,
            namespace: DEFAULT_NAMESPACE.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|token| !token.trim().is_empty());
        self
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for ArgoClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgoClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("insecure", &self.insecure)
            .field("namespace", &self.namespace)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Validate the base URL and return it without a trailing slash.
///
/// Rules:
/// - must parse as an absolute URL
/// - scheme must be `http` or `https`
/// - must include a host
pub(crate) fn normalize_base_url(base: &str) -> Result<String> {
    let parsed = Url::parse(base).map_err(|error| anyhow!("invalid Argo Server URL '{}': {}", base, error))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(anyhow!(
            "Argo Server URL must use http or https; got '{}://'",
            parsed.scheme()
        ));
    }
    if parsed.host_str().is_none() {
        return Err(anyhow!("Argo Server URL must include a host"));
    }

    Ok(base.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert_eq!(normalize_base_url("https://argo.example.com/").unwrap(), "https://argo.example.com");
        assert_eq!(normalize_base_url("http://localhost:2746").unwrap(), "http://localhost:2746");
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(normalize_base_url("ftp://argo.example.com").is_err());
        assert!(normalize_base_url("argo.example.com").is_err());
    }

    #[test]
    fn debug_output_redacts_token() {
        let config = ArgoClientConfig::new("https://argo").with_token(Some("s3cr3t".into()));
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cr3t"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn blank_token_is_dropped() {
        assert!(ArgoClientConfig::new("https://argo").with_token(Some("  ".into())).token.is_none());
    }
}
