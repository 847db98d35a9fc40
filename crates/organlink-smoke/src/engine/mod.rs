//! Smoke run engine
//!
//! Sequences the health check and the reference-data probes against one
//! API, recording each executed request in a [`RunReport`].

mod steps;

pub use steps::{is_healthy, ReferenceEndpoint, HEALTHY_STATUS, HEALTH_PATH, REFERENCE_ENDPOINTS};

use crate::client::{ApiClient, ClientError};
use crate::config::SmokeConfig;
use crate::contracts::*;

/// Receives run progress for presentation.
///
/// Every method defaults to a no-op so implementations only handle what they
/// render.
pub trait RunReporter: Send {
    fn run_started(&mut self, _base_url: &str) {}

    fn section(&mut self, _title: &str) {}

    fn step(&mut self, _number: usize, _description: &str) {}

    fn request_finished(
        &mut self,
        _request: &RequestDescriptor,
        _result: &Result<ResponseOutcome, ClientError>,
    ) {
    }

    fn health_verdict(&mut self, _healthy: bool) {}

    fn run_aborted(&mut self, _report: &RunReport) {}

    fn summary(&mut self, _report: &RunReport) {}
}

/// Reporter that renders nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl RunReporter for SilentReporter {}

/// Smoke test runner
pub struct SmokeRunner {
    client: ApiClient,
    tenant_id: Option<String>,
}

impl SmokeRunner {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            tenant_id: None,
        }
    }

    /// Build a runner and its client from validated configuration
    pub fn from_config(config: &SmokeConfig) -> Result<Self, ClientError> {
        let client = ApiClient::new(config)?;
        Ok(Self {
            client,
            tenant_id: config.tenant_id.clone(),
        })
    }

    /// Send `X-Tenant-ID` on every request of the run
    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Full run: health check, then reference probes and summary when healthy
    pub async fn run(&self, reporter: &mut dyn RunReporter) -> RunReport {
        let mut report = self.check(reporter).await;
        if report.was_aborted() {
            return report.finish();
        }

        let probes =
            steps::run_reference_probes(&self.client, self.tenant_id.as_deref(), reporter).await;
        for step in probes {
            report.record(step);
        }
        report.transition(RunState::EndpointsProbed);

        tracing::info!(
            run_id = %report.run_id,
            probes = report.probes().count(),
            failed = report.failed_probe_count(),
            "reference probes finished"
        );

        reporter.summary(&report);
        report.transition(RunState::SummaryPrinted);
        report.transition(RunState::Done);

        report.finish()
    }

    /// Health check only; ends in `HealthConfirmed` or `Aborted`
    pub async fn check_health(&self, reporter: &mut dyn RunReporter) -> RunReport {
        let mut report = self.check(reporter).await;
        if report.healthy {
            report.transition(RunState::HealthConfirmed);
        }
        report.finish()
    }

    /// Execute one ad-hoc request outside the smoke flow
    pub async fn send(
        &self,
        request: &RequestDescriptor,
        reporter: &mut dyn RunReporter,
    ) -> StepReport {
        let request = match (&request.tenant_id, &self.tenant_id) {
            (None, Some(tenant)) => request.clone().with_tenant(tenant.clone()),
            _ => request.clone(),
        };
        let (step, _) =
            steps::execute_step(&self.client, "request", StepKind::AdHoc, &request, reporter)
                .await;
        step
    }

    async fn check(&self, reporter: &mut dyn RunReporter) -> RunReport {
        let mut report = RunReport::new(self.client.base_url());
        reporter.run_started(self.client.base_url());

        tracing::info!(
            run_id = %report.run_id,
            base_url = %self.client.base_url(),
            "starting smoke run"
        );

        report.transition(RunState::HealthCheck);
        let (step, healthy) =
            steps::run_health_check(&self.client, self.tenant_id.as_deref(), reporter).await;
        report.record(step);
        report.healthy = healthy;

        if !healthy {
            tracing::warn!(run_id = %report.run_id, "health check failed, aborting run");
            report.transition(RunState::Aborted);
            reporter.run_aborted(&report);
        }

        report
    }
}
