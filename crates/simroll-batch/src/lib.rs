//! # simroll batch orchestration
//!
//! The reconcile/dispatch/retry core: load a cohort roster from the
//! directory, narrow it to an allow-list, issue one simulation call per
//! entry, and sweep the failures.
//!
//! Control flow is [`RosterLoader`] → [`filter_allowed`] →
//! [`BatchDispatcher`] → [`RetryCoordinator`]. Each run owns its
//! [`BatchReport`] exclusively; nothing is shared across runs.
//!
//! Dispatch is sequential with at most one in-flight call, and every
//! dispatched entry lands in exactly one of three buckets: succeeded,
//! failed (a status was received but not the expected one), or
//! transport-failed (no status received at all). The first two sum to
//! the report's `total`; transport failures are tracked separately and
//! remain eligible for retry sweeps.

pub mod dispatch;
pub mod filter;
pub mod retry;
pub mod roster;

pub use dispatch::{
    BatchAction, BatchDispatcher, BatchReport, DispatchOutcome, FailedDispatch, TransportFailure,
};
pub use filter::{filter_allowed, normalize_allow_list};
pub use retry::{RetryCoordinator, RetrySweep};
pub use roster::{RosterEntry, RosterLoader};
