use std::time::Duration;

use argonaut_api::ArgoClientConfig;
use argonaut_types::DEFAULT_NAMESPACE;
use clap::{Parser, ValueEnum};

/// MCP tool server for Argo Workflows.
#[derive(Parser, Debug)]
#[command(name = "argonaut", version, about)]
pub struct Args {
    /// Argo Server base URL, for example https://argo-server.argo:2746
    #[arg(long, env = "ARGO_SERVER")]
    pub argo_server: String,

    /// Bearer token forwarded to the Argo Server
    #[arg(long, env = "ARGO_TOKEN", hide_env_values = true)]
    pub argo_token: Option<String>,

    /// Skip TLS certificate verification (development only)
    #[arg(long, env = "ARGO_INSECURE")]
    pub argo_insecure: bool,

    /// Namespace used when a tool call omits one
    #[arg(long, env = "ARGO_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Upper bound for each Argo Server request, in seconds
    #[arg(long, env = "ARGO_REQUEST_TIMEOUT", default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout: u64,

    /// Protocol transport
    #[arg(long, env = "ARGONAUT_TRANSPORT", value_enum, default_value_t = Transport::Stdio)]
    pub transport: Transport,

    /// Bind address for the streamable HTTP transport
    #[arg(long, env = "ARGONAUT_BIND", default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// Serve /health and /ready on this port
    #[arg(long, env = "ARGONAUT_HEALTH_PORT")]
    pub health_port: Option<u16>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    Stdio,
    Http,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Args {
    pub fn client_config(&self) -> ArgoClientConfig {
        ArgoClientConfig::new(self.argo_server.clone())
            .with_token(self.argo_token.clone())
            .with_insecure(self.argo_insecure)
            .with_namespace(self.namespace.clone())
            .with_timeout(Duration::from_secs(self.request_timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn flags_build_client_config() {
        let args = Args::try_parse_from([
            "argonaut",
            "--argo-server",
            "https://argo.example.com",
            "--argo-token",
            "abc",
            "--argo-insecure",
            "--namespace",
            "team-a",
            "--request-timeout",
            "5",
            "--transport",
            "http",
        ])
        .unwrap();

        assert_eq!(args.transport, Transport::Http);
        let config = args.client_config();
        assert_eq!(config.base_url, "https://argo.example.com");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert!(config.insecure);
        assert_eq!(config.namespace, "team-a");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let parsed = Args::try_parse_from(["argonaut", "--argo-server", "http://argo", "--request-timeout", "0"]);
        assert!(parsed.is_err());
    }
}
