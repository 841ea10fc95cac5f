//! Entity status enums, mapped to PostgreSQL enum types.

use serde::{Deserialize, Serialize};

/// Lifecycle of a lost-pet post.
///
/// `lost` is the only non-terminal state: a post moves `lost -> found`
/// (via settlement) or `lost -> closed` (owner gives up), never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "post_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Lost,
    Found,
    Closed,
}

impl PostStatus {
    /// New reports may only be filed against a post that is still `lost`.
    pub fn accepts_reports(self) -> bool {
        matches!(self, PostStatus::Lost)
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PostStatus::Lost => "lost",
            PostStatus::Found => "found",
            PostStatus::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Lifecycle of a found-pet report.
///
/// A report leaves `pending` exactly once; both `rewarded` and `rejected`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "report_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Rewarded,
    Rejected,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Rewarded => "rewarded",
            ReportStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// Lifecycle of the reward attached to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reward_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RewardStatus {
    Pending,
    Completed,
}

impl std::fmt::Display for RewardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RewardStatus::Pending => "pending",
            RewardStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}
