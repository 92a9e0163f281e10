//! Batch dispatch of simulation start/stop calls.
//!
//! One remote call per roster entry, one outcome per dispatched entry.
//! Outcomes are classified by status code: `create` succeeds on 201,
//! `delete` on 204, every other received status is a failure. A call
//! that errors before any status is received is a transport failure and
//! lands in its own bucket, excluded from `total`.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use simroll_labapi::SimulationApi;

use crate::roster::RosterEntry;

/// The remote action a batch run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchAction {
    /// Start simulations (`POST simulations/create/{id}`).
    Create,
    /// Stop simulations (`DELETE simulations/{lab}-{id}`).
    Delete,
}

impl BatchAction {
    /// The only status code that counts as success for this action.
    pub fn success_status(self) -> u16 {
        match self {
            BatchAction::Create => 201,
            BatchAction::Delete => 204,
        }
    }
}

impl std::fmt::Display for BatchAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchAction::Create => write!(f, "create"),
            BatchAction::Delete => write!(f, "delete"),
        }
    }
}

/// Outcome of a single dispatch call.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// The expected status was received.
    Success(RosterEntry),
    /// A status was received but not the expected one.
    Failure(RosterEntry, u16, String),
    /// No status was received at all.
    Transport(RosterEntry, String),
}

/// A dispatched entry the service rejected, with diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedDispatch {
    pub entry: RosterEntry,
    /// HTTP status the service answered with.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

/// A dispatched entry whose call produced no response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportFailure {
    pub entry: RosterEntry,
    /// Transport error description.
    pub error: String,
}

/// Aggregated result of a dispatch pass (and any retry sweeps applied
/// to it afterwards).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Action this report belongs to.
    pub action: BatchAction,
    /// Lab the simulations belong to.
    pub lab: String,
    /// When the pass started.
    pub started_at: DateTime<Utc>,
    /// Entries that received a status code. Invariant:
    /// `succeeded.len() + failed.len() == total`.
    pub total: usize,
    /// Entries the service accepted.
    pub succeeded: Vec<RosterEntry>,
    /// Entries the service rejected.
    pub failed: Vec<FailedDispatch>,
    /// Entries whose call never produced a status.
    pub transport_failed: Vec<TransportFailure>,
    /// Wall-clock duration of the pass in milliseconds.
    pub duration_ms: u64,
}

impl BatchReport {
    /// Create an empty report for an action.
    pub fn new(action: BatchAction, lab: impl Into<String>) -> Self {
        Self {
            action,
            lab: lab.into(),
            started_at: Utc::now(),
            total: 0,
            succeeded: Vec::new(),
            failed: Vec::new(),
            transport_failed: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Number of accepted entries.
    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    /// Number of rejected entries.
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// Number of entries without a response.
    pub fn transport_count(&self) -> usize {
        self.transport_failed.len()
    }

    /// Whether every dispatched entry succeeded and none were lost to
    /// transport failures.
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty() && self.transport_failed.is_empty()
    }

    /// Record one outcome into the matching bucket.
    pub(crate) fn record(&mut self, outcome: DispatchOutcome) {
        match outcome {
            DispatchOutcome::Success(entry) => {
                self.total += 1;
                self.succeeded.push(entry);
            }
            DispatchOutcome::Failure(entry, status, body) => {
                self.total += 1;
                self.failed.push(FailedDispatch {
                    entry,
                    status,
                    body,
                });
            }
            DispatchOutcome::Transport(entry, error) => {
                self.transport_failed.push(TransportFailure { entry, error });
            }
        }
    }
}

/// Issues one simulation call per roster entry and buckets the
/// outcomes.
#[derive(Clone)]
pub struct BatchDispatcher {
    api: Arc<dyn SimulationApi>,
    lab: String,
}

impl BatchDispatcher {
    /// Create a dispatcher for one lab.
    pub fn new(api: Arc<dyn SimulationApi>, lab: impl Into<String>) -> Self {
        Self {
            api,
            lab: lab.into(),
        }
    }

    /// The lab this dispatcher operates on.
    pub fn lab(&self) -> &str {
        &self.lab
    }

    /// Run one dispatch pass over a snapshot of the roster.
    ///
    /// Entries are processed front-to-back, at most once each: a
    /// repeated identifier within the same pass is skipped with a
    /// warning. The pass is exhaustive, calls are sequential, and every
    /// processed entry ends up in exactly one bucket.
    pub async fn dispatch(&self, action: BatchAction, roster: &[RosterEntry]) -> BatchReport {
        let start = Instant::now();
        let mut report = BatchReport::new(action, &self.lab);
        let mut seen: HashSet<String> = HashSet::with_capacity(roster.len());

        for entry in roster {
            let identifier = entry.identifier.trim();
            if !seen.insert(identifier.to_string()) {
                warn!(identifier = %identifier, "duplicate identifier skipped within pass");
                continue;
            }
            let outcome = self.dispatch_one(action, entry).await;
            report.record(outcome);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            action = %action,
            lab = %self.lab,
            total = report.total,
            succeeded = report.success_count(),
            failed = report.failure_count(),
            transport_failed = report.transport_count(),
            "dispatch pass complete"
        );

        report
    }

    /// Issue and classify a single call.
    pub async fn dispatch_one(&self, action: BatchAction, entry: &RosterEntry) -> DispatchOutcome {
        let identifier = entry.identifier.trim();

        let result = match action {
            BatchAction::Create => self.api.start_simulation(&self.lab, identifier).await,
            BatchAction::Delete => self.api.stop_simulation(&self.lab, identifier).await,
        };

        match result {
            Ok(response) => {
                info!(
                    action = %action,
                    identifier = %identifier,
                    status = response.status,
                    "simulation call answered"
                );
                if response.status == action.success_status() {
                    DispatchOutcome::Success(entry.clone())
                } else {
                    DispatchOutcome::Failure(entry.clone(), response.status, response.body)
                }
            }
            Err(e) => {
                error!(
                    action = %action,
                    identifier = %identifier,
                    error = %e,
                    "no response received from simulation service"
                );
                DispatchOutcome::Transport(entry.clone(), e.to_string())
            }
        }
    }
}
