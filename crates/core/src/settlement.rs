//! Settlement step model and the shared terminal-state guard.
//!
//! The reward settlement workflow itself lives in `pawtrail-db` (it is a
//! multi-entity transaction); this module holds the pieces both the reward
//! and reject paths agree on.

use crate::error::CoreError;
use crate::status::ReportStatus;

/// The named steps of the reward settlement workflow, in execution order.
///
/// Balance transfer runs first so that a failed credit leaves both the post
/// and the report in their pre-settlement state and the whole settlement can
/// simply be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementStep {
    BalanceUpdate,
    MarkPostFound,
    RewardReport,
}

impl SettlementStep {
    /// Stable machine-readable step name (used in error codes and logs).
    pub fn as_str(self) -> &'static str {
        match self {
            SettlementStep::BalanceUpdate => "balance_update",
            SettlementStep::MarkPostFound => "mark_post_found",
            SettlementStep::RewardReport => "reward_report",
        }
    }
}

impl std::fmt::Display for SettlementStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guard shared by `settle` and `reject`: a report may leave `pending`
/// exactly once. Must be evaluated inside the same transaction as the
/// status write so two concurrent settlements cannot both pass.
pub fn ensure_pending(status: ReportStatus) -> Result<(), CoreError> {
    match status {
        ReportStatus::Pending => Ok(()),
        ReportStatus::Rewarded | ReportStatus::Rejected => Err(CoreError::AlreadySettled),
    }
}
