//! Startup options: command line flags with environment overrides.
//!
//! Every flag has a corresponding `HASURA_*` environment variable and the
//! environment wins over the flag, so a deployment platform can override
//! whatever is baked into a container entrypoint.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "ndc-connector", disable_version_flag = true)]
struct Cli {
    /// Configuration directory
    #[arg(long, value_name = "DIR")]
    configuration: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Service token secret
    #[arg(long)]
    service_token_secret: Option<String>,

    /// Log level
    #[arg(long)]
    log_level: Option<String>,

    /// Pretty print logs
    #[arg(long)]
    pretty_print_logs: bool,
}

/// Resolved server options.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub configuration: PathBuf,
    pub host: String,
    pub port: u16,
    pub service_token_secret: Option<String>,
    pub log_level: String,
    pub pretty_print_logs: bool,
}

impl ServerOptions {
    /// Parse the process command line and environment.
    pub fn from_args() -> anyhow::Result<Self> {
        Self::resolve(Cli::parse(), |name| std::env::var(name).ok())
    }

    fn resolve(cli: Cli, env: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let configuration = env("HASURA_CONFIGURATION_DIRECTORY")
            .map(PathBuf::from)
            .or(cli.configuration)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Configuration directory not specified. Provide the \
                     HASURA_CONFIGURATION_DIRECTORY environment variable or \
                     the --configuration argument."
                )
            })?;

        let host = env("HASURA_CONNECTOR_HOST")
            .or(cli.host)
            .unwrap_or_else(|| "localhost".to_string());

        // An unparsable port in the environment falls back to the flag.
        let port = env("HASURA_CONNECTOR_PORT")
            .and_then(|p| p.parse().ok())
            .or(cli.port)
            .unwrap_or(8080);

        // An empty secret means no secret is configured.
        let service_token_secret = env("HASURA_SERVICE_TOKEN_SECRET")
            .or(cli.service_token_secret)
            .filter(|s| !s.is_empty());

        let log_level = env("HASURA_LOG_LEVEL")
            .or(cli.log_level)
            .unwrap_or_else(|| "info".to_string());

        let pretty_print_logs = env("HASURA_PRETTY_PRINT_LOGS")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(cli.pretty_print_logs);

        Ok(ServerOptions {
            configuration,
            host,
            port,
            service_token_secret,
            log_level,
            pretty_print_logs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("ndc-connector").chain(args.iter().copied()))
    }

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn resolve(args: &[&str], env_pairs: &[(&str, &str)]) -> anyhow::Result<ServerOptions> {
        let env = env_of(env_pairs);
        ServerOptions::resolve(cli(args), |name| env.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_configuration_is_given() {
        let options = resolve(&["--configuration", "/etc/connector"], &[]).unwrap();
        assert_eq!(options.configuration, PathBuf::from("/etc/connector"));
        assert_eq!(options.host, "localhost");
        assert_eq!(options.port, 8080);
        assert_eq!(options.service_token_secret, None);
        assert_eq!(options.log_level, "info");
        assert!(!options.pretty_print_logs);
    }

    #[test]
    fn missing_configuration_fails_fast() {
        assert!(resolve(&[], &[]).is_err());
    }

    #[test]
    fn environment_wins_over_flags() {
        let options = resolve(
            &["--configuration", "/from/flag", "--port", "9000"],
            &[
                ("HASURA_CONFIGURATION_DIRECTORY", "/from/env"),
                ("HASURA_CONNECTOR_PORT", "7777"),
                ("HASURA_CONNECTOR_HOST", "0.0.0.0"),
            ],
        )
        .unwrap();
        assert_eq!(options.configuration, PathBuf::from("/from/env"));
        assert_eq!(options.port, 7777);
        assert_eq!(options.host, "0.0.0.0");
    }

    #[test]
    fn unparsable_port_in_environment_falls_back_to_flag() {
        let options = resolve(
            &["--configuration", "/c", "--port", "9000"],
            &[("HASURA_CONNECTOR_PORT", "not-a-port")],
        )
        .unwrap();
        assert_eq!(options.port, 9000);
    }

    #[test]
    fn empty_secret_means_unset() {
        let options = resolve(
            &["--configuration", "/c", "--service-token-secret", "s3cret"],
            &[("HASURA_SERVICE_TOKEN_SECRET", "")],
        )
        .unwrap();
        assert_eq!(options.service_token_secret, None);
    }

    #[test]
    fn pretty_print_env_is_parsed_as_boolean() {
        let options = resolve(
            &["--configuration", "/c"],
            &[("HASURA_PRETTY_PRINT_LOGS", "TRUE")],
        )
        .unwrap();
        assert!(options.pretty_print_logs);

        let options = resolve(
            &["--configuration", "/c", "--pretty-print-logs"],
            &[("HASURA_PRETTY_PRINT_LOGS", "false")],
        )
        .unwrap();
        assert!(!options.pretty_print_logs);
    }
}
