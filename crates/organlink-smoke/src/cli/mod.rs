//! CLI module for the smoke runner
//!
//! Command definitions live in `commands`, console and JSON rendering in
//! `output`.

pub mod commands;
pub mod output;

pub use commands::{ConnectionArgs, SmokeCli, SmokeCommands};
pub use output::{ConsoleReporter, OutputFormat};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::contracts::RunReport;
use crate::error::SmokeError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Run completed
    Success = 0,
    /// Health check failed and the run was aborted
    HealthCheckFailed = 1,
    /// A reference probe (with `--strict`) or an ad-hoc request failed
    RequestFailed = 2,
    /// Invalid input, arguments or configuration
    InvalidInput = 3,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Determine exit code from a finished run
    pub fn from_run_report(report: &RunReport, strict: bool) -> Self {
        if !report.healthy {
            ExitCode::HealthCheckFailed
        } else if strict && report.failed_probe_count() > 0 {
            ExitCode::RequestFailed
        } else {
            ExitCode::Success
        }
    }
}

/// Build the log filter.
///
/// `-v` flags take precedence; without them `RUST_LOG` directives apply, and
/// with neither the level is `warn`.
pub fn log_filter(verbose: u8, rust_log: Option<&str>) -> EnvFilter {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let builder = EnvFilter::builder().with_default_directive(level.into());

    match rust_log {
        Some(directives) if verbose == 0 && !directives.trim().is_empty() => {
            builder.parse_lossy(directives)
        }
        _ => builder.parse_lossy(""),
    }
}

/// Run the CLI with the given arguments and return the exit code
pub async fn run(cli: SmokeCli) -> Result<ExitCode, SmokeError> {
    match cli.command {
        SmokeCommands::Run {
            connection,
            format,
            strict,
        } => commands::execute_run(connection, format, strict).await,
        SmokeCommands::Health { connection, format } => {
            commands::execute_health(connection, format).await
        }
        SmokeCommands::Request {
            method,
            path,
            data,
            connection,
            format,
        } => commands::execute_request(method, path, data, connection, format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    fn reference_step(name: &str, success: bool) -> StepReport {
        let request = RequestDescriptor::get(format!("/{}", name));
        let outcome = ResponseOutcome::from_response(
            if success { 200 } else { 500 },
            "[]".to_string(),
            1,
        );
        StepReport::responded(name, StepKind::ReferenceProbe, &request, &outcome)
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn captured_logs(filter: EnvFilter, emit: impl FnOnce()) -> String {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, emit);

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_rust_log_is_honoured_without_verbose_flags() {
        let logs = captured_logs(log_filter(0, Some("debug")), || {
            tracing::debug!("debug event from RUST_LOG");
        });
        assert!(logs.contains("debug event from RUST_LOG"));
    }

    #[test]
    fn test_default_filter_is_warn() {
        let logs = captured_logs(log_filter(0, None), || {
            tracing::info!("info event");
            tracing::warn!("warn event");
        });
        assert!(!logs.contains("info event"));
        assert!(logs.contains("warn event"));

        let blank = captured_logs(log_filter(0, Some("  ")), || {
            tracing::info!("info event");
        });
        assert!(!blank.contains("info event"));
    }

    #[test]
    fn test_verbose_flag_raises_level() {
        let logs = captured_logs(log_filter(2, Some("error")), || {
            tracing::debug!("debug event from -vv");
        });
        assert!(logs.contains("debug event from -vv"));

        let info = captured_logs(log_filter(1, None), || {
            tracing::info!("info event from -v");
            tracing::debug!("debug event from -v");
        });
        assert!(info.contains("info event from -v"));
        assert!(!info.contains("debug event from -v"));
    }

    #[test]
    fn test_exit_code_conversion() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::HealthCheckFailed), 1);
        assert_eq!(i32::from(ExitCode::RequestFailed), 2);
        assert_eq!(i32::from(ExitCode::InvalidInput), 3);
        assert_eq!(i32::from(ExitCode::InternalError), 10);
    }

    #[test]
    fn test_exit_code_from_run_report() {
        let mut report = RunReport::new("http://localhost:8080/api/v1");
        assert_eq!(
            ExitCode::from_run_report(&report, false),
            ExitCode::HealthCheckFailed
        );

        report.healthy = true;
        report.record(reference_step("hospitals", false));
        assert_eq!(ExitCode::from_run_report(&report, false), ExitCode::Success);
        assert_eq!(
            ExitCode::from_run_report(&report, true),
            ExitCode::RequestFailed
        );
    }
}
