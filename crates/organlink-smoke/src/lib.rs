//! OrganLink Smoke Runner
//!
//! Smoke tests a running OrganLink hospital management API: a health check
//! gates a fixed sequence of reference-data lookups, and every request is
//! rendered as it completes.
//!
//! ## Architecture
//!
//! 1. **Contracts** (`contracts/`): request descriptors, tagged response
//!    outcomes and the run report.
//!
//! 2. **Client** (`client/`): the HTTP request executor. Returns explicit
//!    results and leaves presentation to callers.
//!
//! 3. **Engine** (`engine/`): health check, reference probes and the run
//!    orchestrator, reporting progress through [`engine::RunReporter`].
//!
//! 4. **CLI** (`cli/`): command definitions, console and JSON output.
//!
//! ## Example
//!
//! ```rust,no_run
//! use organlink_smoke::config::SmokeConfig;
//! use organlink_smoke::engine::{SilentReporter, SmokeRunner};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SmokeConfig::default().validate()?;
//! let runner = SmokeRunner::from_config(&config)?;
//! let report = runner.run(&mut SilentReporter).await;
//! println!("healthy: {}", report.healthy);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;

#[path = "../contracts/mod.rs"]
pub mod contracts;

pub use cli::{ExitCode, SmokeCli};
pub use contracts::*;
pub use error::SmokeError;

/// Run the CLI and map errors to exit codes
pub async fn run_cli(cli: SmokeCli) -> ExitCode {
    match cli::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_user_error() {
                ExitCode::InvalidInput
            } else {
                ExitCode::InternalError
            }
        }
    }
}
