//! Retry sweeps over the failure buckets of a dispatch pass.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dispatch::{BatchDispatcher, BatchReport, DispatchOutcome, FailedDispatch, TransportFailure};

/// Counts for one retry sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySweep {
    /// Entries re-attempted.
    pub attempted: usize,
    /// Entries that succeeded this sweep.
    pub recovered: usize,
    /// Entries rejected again.
    pub still_failing: usize,
    /// Entries that again produced no response.
    pub transport_failed: usize,
}

/// Re-attempts the failed entries of a [`BatchReport`], one sweep per
/// invocation.
///
/// A sweep drains both the failed and transport buckets, re-dispatches
/// each entry with the report's action, and merges persistent failures
/// back into the buckets. It is a single pass, not a loop to
/// exhaustion; a caller wanting repeated sweeps invokes it repeatedly.
pub struct RetryCoordinator {
    dispatcher: BatchDispatcher,
}

impl RetryCoordinator {
    /// Create a coordinator re-using a dispatcher.
    pub fn new(dispatcher: BatchDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Run one sweep over the report's failure buckets.
    ///
    /// With both buckets empty this is a no-op: it returns immediately
    /// and no calls are made. The report's `succeeded + failed == total`
    /// invariant is preserved: an entry moving between the counted
    /// buckets and the transport bucket adjusts `total` accordingly.
    pub async fn sweep(&self, report: &mut BatchReport) -> RetrySweep {
        if report.failed.is_empty() && report.transport_failed.is_empty() {
            info!(action = %report.action, "retry sweep skipped: nothing to retry");
            return RetrySweep::default();
        }

        warn!(
            action = %report.action,
            failed = report.failure_count(),
            transport_failed = report.transport_count(),
            "retrying failed entries"
        );

        // Snapshot and drain the buckets, remembering which bucket each
        // entry came from for the total adjustment.
        let pending: Vec<(crate::roster::RosterEntry, bool)> = report
            .failed
            .drain(..)
            .map(|f| (f.entry, false))
            .chain(report.transport_failed.drain(..).map(|t| (t.entry, true)))
            .collect();

        let mut sweep = RetrySweep {
            attempted: pending.len(),
            ..RetrySweep::default()
        };

        for (entry, was_transport) in pending {
            match self.dispatcher.dispatch_one(report.action, &entry).await {
                DispatchOutcome::Success(entry) => {
                    if was_transport {
                        report.total += 1;
                    }
                    report.succeeded.push(entry);
                    sweep.recovered += 1;
                }
                DispatchOutcome::Failure(entry, status, body) => {
                    if was_transport {
                        report.total += 1;
                    }
                    report.failed.push(FailedDispatch {
                        entry,
                        status,
                        body,
                    });
                    sweep.still_failing += 1;
                }
                DispatchOutcome::Transport(entry, error) => {
                    if !was_transport {
                        report.total -= 1;
                    }
                    report.transport_failed.push(TransportFailure { entry, error });
                    sweep.transport_failed += 1;
                }
            }
        }

        info!(
            action = %report.action,
            attempted = sweep.attempted,
            recovered = sweep.recovered,
            still_failing = sweep.still_failing,
            transport_failed = sweep.transport_failed,
            "retry sweep complete"
        );

        sweep
    }
}
