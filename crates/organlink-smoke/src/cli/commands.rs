//! CLI command definitions for the smoke runner

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::output::{render_json, ConsoleReporter, OutputFormat};
use super::ExitCode;
use crate::config::{ConfigOverrides, SmokeConfig};
use crate::contracts::*;
use crate::engine::{RunReporter, SilentReporter, SmokeRunner};
use crate::error::SmokeError;

/// OrganLink smoke runner
///
/// Checks that a running OrganLink API is healthy and that its
/// reference-data endpoints answer.
#[derive(Parser, Debug)]
#[command(name = "organlink-smoke")]
#[command(about = "Smoke tests for the OrganLink hospital management API", long_about = None)]
#[command(version)]
pub struct SmokeCli {
    /// Output verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: SmokeCommands,
}

/// Connection settings shared by all commands
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// API base URL [default: http://localhost:8080/api/v1]
    #[arg(long, env = "ORGANLINK_BASE_URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in milliseconds [default: 10000]
    #[arg(long, env = "ORGANLINK_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Tenant identifier sent as X-Tenant-ID
    #[arg(long, env = "ORGANLINK_TENANT_ID")]
    pub tenant: Option<String>,

    /// Configuration file (JSON, YAML or TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl ConnectionArgs {
    /// Merge file, flags and defaults into a validated config
    pub fn resolve(&self) -> Result<SmokeConfig, SmokeError> {
        let base = match &self.config {
            Some(path) => SmokeConfig::from_file(path)?,
            None => SmokeConfig::default(),
        };

        base.with_overrides(ConfigOverrides {
            base_url: self.base_url.clone(),
            timeout_ms: self.timeout_ms,
            tenant_id: self.tenant.clone(),
        })
        .validate()
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum SmokeCommands {
    /// Run the full smoke test
    ///
    /// Checks health first; the reference-data endpoints are only probed
    /// when the API reports status UP.
    Run {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "pretty")]
        format: OutputFormat,

        /// Exit non-zero when any reference probe fails
        #[arg(long)]
        strict: bool,
    },

    /// Check API health only
    Health {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },

    /// Send a single request and show the response
    Request {
        /// HTTP method (GET, POST, PUT, DELETE)
        method: HttpMethod,

        /// Path relative to the base URL, e.g. /hospitals
        path: String,

        /// JSON body for POST and PUT
        #[arg(short, long)]
        data: Option<String>,

        #[command(flatten)]
        connection: ConnectionArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },
}

fn reporter_for(format: OutputFormat) -> Box<dyn RunReporter> {
    match format {
        OutputFormat::Pretty => Box::new(ConsoleReporter::stdout()),
        OutputFormat::Json => Box::new(SilentReporter),
    }
}

/// Execute the run command
pub async fn execute_run(
    connection: ConnectionArgs,
    format: OutputFormat,
    strict: bool,
) -> Result<ExitCode, SmokeError> {
    let config = connection.resolve()?;
    let runner = SmokeRunner::from_config(&config)?;

    let mut reporter = reporter_for(format);
    let report = runner.run(reporter.as_mut()).await;

    if format == OutputFormat::Json {
        render_json(&report)?;
    }

    Ok(ExitCode::from_run_report(&report, strict))
}

/// Execute the health command
pub async fn execute_health(
    connection: ConnectionArgs,
    format: OutputFormat,
) -> Result<ExitCode, SmokeError> {
    let config = connection.resolve()?;
    let runner = SmokeRunner::from_config(&config)?;

    let mut reporter = reporter_for(format);
    let report = runner.check_health(reporter.as_mut()).await;

    if format == OutputFormat::Json {
        render_json(&report)?;
    }

    Ok(if report.healthy {
        ExitCode::Success
    } else {
        ExitCode::HealthCheckFailed
    })
}

/// Execute the request command
pub async fn execute_request(
    method: HttpMethod,
    path: String,
    data: Option<String>,
    connection: ConnectionArgs,
    format: OutputFormat,
) -> Result<ExitCode, SmokeError> {
    let request = build_request(method, path, data)?;
    let config = connection.resolve()?;
    let runner = SmokeRunner::from_config(&config)?;

    let mut reporter = reporter_for(format);
    let step = runner.send(&request, reporter.as_mut()).await;

    if format == OutputFormat::Json {
        render_json(&step)?;
    }

    Ok(if step.success {
        ExitCode::Success
    } else {
        ExitCode::RequestFailed
    })
}

/// Build a descriptor from CLI input, parsing the body as JSON
pub fn build_request(
    method: HttpMethod,
    path: String,
    data: Option<String>,
) -> Result<RequestDescriptor, SmokeError> {
    let mut request = RequestDescriptor::new(method, path);

    if let Some(data) = data {
        if !method.sends_body() {
            return Err(SmokeError::invalid_input(format!(
                "{} requests do not carry a body",
                method
            )));
        }
        let body = serde_json::from_str(&data)
            .map_err(|e| SmokeError::invalid_input(format!("--data is not valid JSON: {}", e)))?;
        request = request.with_body(body);
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        SmokeCli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_flags() {
        let cli = SmokeCli::try_parse_from([
            "organlink-smoke",
            "run",
            "--base-url",
            "http://staging:8080/api/v1",
            "--format",
            "json",
            "--strict",
        ])
        .unwrap();

        match cli.command {
            SmokeCommands::Run {
                connection,
                format,
                strict,
            } => {
                assert_eq!(
                    connection.base_url.as_deref(),
                    Some("http://staging:8080/api/v1")
                );
                assert_eq!(format, OutputFormat::Json);
                assert!(strict);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_request_command() {
        let cli = SmokeCli::try_parse_from([
            "organlink-smoke",
            "-v",
            "request",
            "post",
            "/hospitals",
            "--data",
            r#"{"name":"City General"}"#,
            "--tenant",
            "mumbai-01",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            SmokeCommands::Request {
                method,
                path,
                data,
                connection,
                ..
            } => {
                assert_eq!(method, HttpMethod::Post);
                assert_eq!(path, "/hospitals");
                assert!(data.is_some());
                assert_eq!(connection.tenant.as_deref(), Some("mumbai-01"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_build_request_validates_body() {
        let request = build_request(
            HttpMethod::Put,
            "/organ-types/1".to_string(),
            Some(r#"{"active":true}"#.to_string()),
        )
        .unwrap();
        assert_eq!(request.body, Some(serde_json::json!({"active": true})));

        assert!(build_request(
            HttpMethod::Get,
            "/hospitals".to_string(),
            Some("{}".to_string())
        )
        .is_err());

        assert!(build_request(
            HttpMethod::Post,
            "/hospitals".to_string(),
            Some("{not json".to_string())
        )
        .is_err());
    }

    #[test]
    fn test_resolve_rejects_invalid_base_url() {
        let args = ConnectionArgs {
            base_url: Some("localhost".to_string()),
            ..Default::default()
        };
        assert!(matches!(args.resolve(), Err(SmokeError::ConfigError(_))));
    }
}
