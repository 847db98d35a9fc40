//! Smoke Runner Contracts
//!
//! Transient request/response values and the report a run produces.

mod outcome;
mod request;

pub use outcome::*;
pub use request::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Run lifecycle.
///
/// `Start -> HealthCheck -> {EndpointsProbed | Aborted} -> SummaryPrinted -> Done`
///
/// A health-only check ends in `HealthConfirmed` instead of probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    Start,
    HealthCheck,
    HealthConfirmed,
    EndpointsProbed,
    Aborted,
    SummaryPrinted,
    Done,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Aborted | RunState::HealthConfirmed | RunState::Done
        )
    }

    /// Whether `next` directly follows `self`
    pub fn can_transition_to(&self, next: RunState) -> bool {
        matches!(
            (self, next),
            (RunState::Start, RunState::HealthCheck)
                | (RunState::HealthCheck, RunState::EndpointsProbed)
                | (RunState::HealthCheck, RunState::Aborted)
                | (RunState::HealthCheck, RunState::HealthConfirmed)
                | (RunState::EndpointsProbed, RunState::SummaryPrinted)
                | (RunState::SummaryPrinted, RunState::Done)
        )
    }
}

/// What a step was run for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    HealthCheck,
    ReferenceProbe,
    AdHoc,
}

/// Outcome of one executed request, as recorded in the run report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Step name (e.g. `countries`)
    pub name: String,

    pub kind: StepKind,

    pub method: HttpMethod,

    pub path: String,

    /// HTTP status, absent when the request never got a response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    pub success: bool,

    /// Human-readable detail
    pub detail: String,

    /// Catalog entries returned by a reference endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl StepReport {
    /// Step that received an HTTP response
    pub fn responded(
        name: impl Into<String>,
        kind: StepKind,
        request: &RequestDescriptor,
        outcome: &ResponseOutcome,
    ) -> Self {
        let success = outcome.is_success();
        let detail = if success {
            format!("HTTP {}", outcome.status)
        } else {
            format!("HTTP {}: {}", outcome.status, outcome.body.render())
        };

        Self {
            name: name.into(),
            kind,
            method: request.method,
            path: request.path.clone(),
            status: Some(outcome.status),
            success,
            detail,
            item_count: outcome.payload().and_then(ResponseBody::item_count),
            latency_ms: Some(outcome.latency_ms),
        }
    }

    /// Step whose request failed before a response arrived
    pub fn unreachable(
        name: impl Into<String>,
        kind: StepKind,
        request: &RequestDescriptor,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            method: request.method,
            path: request.path.clone(),
            status: None,
            success: false,
            detail: detail.into(),
            item_count: None,
            latency_ms: None,
        }
    }

    /// Override the success flag while keeping the response details
    pub fn with_success(mut self, success: bool, detail: impl Into<String>) -> Self {
        self.success = success;
        self.detail = detail.into();
        self
    }
}

/// Structured record of one smoke run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,

    pub base_url: String,

    /// Health check verdict
    pub healthy: bool,

    pub state: RunState,

    /// Executed steps, in execution order
    pub steps: Vec<StepReport>,

    pub started_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Total duration in milliseconds
    pub duration_ms: u64,
}

impl RunReport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            base_url: base_url.into(),
            healthy: false,
            state: RunState::Start,
            steps: Vec::new(),
            started_at: Utc::now(),
            completed_at: None,
            duration_ms: 0,
        }
    }

    pub fn record(&mut self, step: StepReport) {
        self.steps.push(step);
    }

    /// Move to the next state; illegal transitions are ignored and logged
    pub fn transition(&mut self, next: RunState) {
        if self.state.can_transition_to(next) {
            tracing::debug!(run_id = %self.run_id, from = ?self.state, to = ?next, "run state");
            self.state = next;
        } else {
            tracing::warn!(
                run_id = %self.run_id,
                from = ?self.state,
                to = ?next,
                "ignoring illegal run state transition"
            );
        }
    }

    /// Stamp completion time and duration
    pub fn finish(mut self) -> Self {
        let completed_at = Utc::now();
        self.duration_ms = (completed_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64;
        self.completed_at = Some(completed_at);
        self
    }

    pub fn probes(&self) -> impl Iterator<Item = &StepReport> {
        self.steps
            .iter()
            .filter(|s| s.kind == StepKind::ReferenceProbe)
    }

    pub fn failed_probe_count(&self) -> usize {
        self.probes().filter(|s| !s.success).count()
    }

    pub fn was_aborted(&self) -> bool {
        self.state == RunState::Aborted
    }
}
