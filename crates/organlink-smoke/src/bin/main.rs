//! OrganLink smoke runner CLI
//!
//! # Usage
//!
//! ```bash
//! # Full smoke test against a local API
//! organlink-smoke run
//!
//! # Against staging, machine-readable, failing on any probe error
//! organlink-smoke run --base-url http://staging:8080/api/v1 --format json --strict
//!
//! # Ad-hoc call scoped to a tenant
//! organlink-smoke request GET /hospitals --tenant mumbai-01
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Health check failed, run aborted
//! - 2: Probe failed under `--strict`, or ad-hoc request failed
//! - 3: Invalid input or configuration
//! - 10: Internal error

use clap::Parser;
use organlink_smoke::cli::log_filter;
use organlink_smoke::{run_cli, SmokeCli};

#[tokio::main]
async fn main() {
    let cli = SmokeCli::parse();
    let rust_log = std::env::var("RUST_LOG").ok();

    // Logs go to stderr; stdout is the run transcript
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let exit_code = run_cli(cli).await;
    std::process::exit(exit_code.into());
}
