//! Smoke steps
//!
//! The health check gates the run; reference probes each run independently.

use crate::client::{ApiClient, ClientError};
use crate::contracts::*;
use crate::engine::RunReporter;

pub const HEALTH_PATH: &str = "/actuator/health";

/// Health endpoint value signalling readiness
pub const HEALTHY_STATUS: &str = "UP";

/// Read-only catalog endpoint probed after a healthy check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceEndpoint {
    pub name: &'static str,
    pub description: &'static str,
    pub path: &'static str,
}

/// Probed in this order
pub const REFERENCE_ENDPOINTS: [ReferenceEndpoint; 4] = [
    ReferenceEndpoint {
        name: "countries",
        description: "Testing Countries Endpoint",
        path: "/locations/countries",
    },
    ReferenceEndpoint {
        name: "states",
        description: "Testing States Endpoint",
        path: "/locations/states",
    },
    ReferenceEndpoint {
        name: "hospitals",
        description: "Testing Hospitals Endpoint",
        path: "/hospitals",
    },
    ReferenceEndpoint {
        name: "organ-types",
        description: "Testing Organ Types Endpoint",
        path: "/organ-types",
    },
];

/// Healthy iff a non-error response carried `"status": "UP"`
pub fn is_healthy(result: &Result<ResponseOutcome, ClientError>) -> bool {
    match result {
        Ok(outcome) => outcome
            .payload()
            .and_then(|body| body.field_str("status"))
            .map_or(false, |status| status == HEALTHY_STATUS),
        Err(_) => false,
    }
}

/// Execute one request, report it and build its step report
pub(crate) async fn execute_step(
    client: &ApiClient,
    name: &str,
    kind: StepKind,
    request: &RequestDescriptor,
    reporter: &mut dyn RunReporter,
) -> (StepReport, Result<ResponseOutcome, ClientError>) {
    let result = client.execute(request).await;
    reporter.request_finished(request, &result);

    let step = match &result {
        Ok(outcome) => StepReport::responded(name, kind, request, outcome),
        Err(e) => {
            tracing::warn!(step = name, path = %request.path, error = %e, "request failed");
            StepReport::unreachable(name, kind, request, e.to_string())
        }
    };

    (step, result)
}

/// Run the health check; returns the step report and the verdict
pub(crate) async fn run_health_check(
    client: &ApiClient,
    tenant_id: Option<&str>,
    reporter: &mut dyn RunReporter,
) -> (StepReport, bool) {
    reporter.section("SYSTEM HEALTH CHECK");
    reporter.step(1, "Testing Application Health");

    let request = RequestDescriptor::get(HEALTH_PATH).with_optional_tenant(tenant_id);
    let (step, result) =
        execute_step(client, "health", StepKind::HealthCheck, &request, reporter).await;

    let healthy = is_healthy(&result);
    reporter.health_verdict(healthy);

    let step = if healthy || !step.success {
        step
    } else {
        let reported = match &result {
            Ok(outcome) => outcome
                .payload()
                .and_then(|body| body.field_str("status"))
                .map(|s| format!("health status is '{}'", s))
                .unwrap_or_else(|| "health response has no status field".to_string()),
            Err(_) => "health check failed".to_string(),
        };
        step.with_success(false, reported)
    };

    (step, healthy)
}

/// Probe every reference endpoint; failures never stop the sequence
pub(crate) async fn run_reference_probes(
    client: &ApiClient,
    tenant_id: Option<&str>,
    reporter: &mut dyn RunReporter,
) -> Vec<StepReport> {
    reporter.section("BASIC API ENDPOINT TESTING");

    let mut steps = Vec::with_capacity(REFERENCE_ENDPOINTS.len());
    for (index, endpoint) in REFERENCE_ENDPOINTS.iter().enumerate() {
        reporter.step(index + 1, endpoint.description);

        let request = RequestDescriptor::get(endpoint.path).with_optional_tenant(tenant_id);
        let (step, _) = execute_step(
            client,
            endpoint.name,
            StepKind::ReferenceProbe,
            &request,
            reporter,
        )
        .await;
        steps.push(step);
    }
    steps
}
