//! Reward settlement workflow.
//!
//! Settling a report touches four entities — the report, its post, the
//! post's reward, and the reporter's balance — none of which can enforce the
//! cross-entity invariants alone. Every step runs inside one transaction
//! with the report row locked for its duration, so two concurrent
//! settlements of the same report cannot both succeed: the loser observes a
//! non-pending status and fails with `AlreadySettled`.
//!
//! Step order is deliberate: the balance credit runs before either status
//! transition, so a failed credit leaves the post and report untouched and
//! the whole settlement safely retryable. Each write failure surfaces as
//! `SettlementFailed` naming the broken step, and rolls everything back.

use pawtrail_core::error::CoreError;
use pawtrail_core::settlement::{ensure_pending, SettlementStep};
use pawtrail_core::status::PostStatus;
use pawtrail_core::types::DbId;
use sqlx::PgPool;

use crate::models::report::{Report, ReportDetail};
use crate::repositories::report_repo::{ReportRepo, COLUMNS as REPORT_COLUMNS};
use crate::DbError;

/// Coordinates the reward settlement state machine.
pub struct SettlementRepo;

impl SettlementRepo {
    /// Settle a report: credit the reporter, mark the post `found`, mark the
    /// report `rewarded`, and complete the reward record — atomically.
    pub async fn settle(pool: &PgPool, report_id: DbId) -> Result<ReportDetail, DbError> {
        let mut tx = pool.begin().await?;

        // Step 1: load and lock the report; it must still be pending.
        let query = format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1 FOR UPDATE");
        let report: Option<Report> = sqlx::query_as(&query)
            .bind(report_id)
            .fetch_optional(&mut *tx)
            .await?;
        let report = report.ok_or(CoreError::NotFound {
            entity: "Report",
            id: report_id,
        })?;
        ensure_pending(report.status)?;

        // The post and its reward must exist by invariant; their absence is
        // an internal fault, never a client error.
        let post_status: Option<PostStatus> =
            sqlx::query_scalar("SELECT status FROM posts WHERE id = $1 FOR UPDATE")
                .bind(report.post_id)
                .fetch_optional(&mut *tx)
                .await?;
        if post_status.is_none() {
            tracing::error!(
                report_id,
                post_id = report.post_id,
                "Settlement found a report whose post is missing"
            );
            return Err(CoreError::Inconsistency(format!(
                "post {} behind report {report_id} does not exist",
                report.post_id
            ))
            .into());
        }

        let reward: Option<(DbId, i64)> =
            sqlx::query_as("SELECT id, amount FROM rewards WHERE post_id = $1")
                .bind(report.post_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((reward_id, amount)) = reward else {
            tracing::error!(
                report_id,
                post_id = report.post_id,
                "Settlement found a post without a reward record"
            );
            return Err(CoreError::Inconsistency(format!(
                "post {} has no reward record",
                report.post_id
            ))
            .into());
        };

        // Step 2: credit the reporter, if there is anything to transfer.
        if amount > 0 {
            let balance: Option<i64> =
                sqlx::query_scalar("SELECT balance FROM users WHERE id = $1 FOR UPDATE")
                    .bind(report.reporter_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            let Some(balance) = balance else {
                tracing::error!(
                    report_id,
                    reporter_id = report.reporter_id,
                    "Settlement found a report whose reporter is missing"
                );
                return Err(CoreError::Inconsistency(format!(
                    "reporter {} of report {report_id} does not exist",
                    report.reporter_id
                ))
                .into());
            };

            let credited = sqlx::query("UPDATE users SET balance = $2 WHERE id = $1")
                .bind(report.reporter_id)
                .bind(balance + amount)
                .execute(&mut *tx)
                .await
                .map_err(|e| Self::step_failure(e, SettlementStep::BalanceUpdate, report_id))?
                .rows_affected();
            if credited == 0 {
                return Err(Self::step_failed(SettlementStep::BalanceUpdate, report_id));
            }
        }

        // Step 3: transition the post to `found`.
        let post_updated =
            sqlx::query("UPDATE posts SET status = 'found' WHERE id = $1 AND status = 'lost'")
                .bind(report.post_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| Self::step_failure(e, SettlementStep::MarkPostFound, report_id))?
                .rows_affected();
        if post_updated == 0 {
            return Err(Self::step_failed(SettlementStep::MarkPostFound, report_id));
        }

        // Step 4: transition the report to `rewarded` and complete the
        // reward. The status guard stays in the UPDATE even under the row
        // lock, so the check-and-set is one atomic unit.
        let report_updated = sqlx::query(
            "UPDATE reports SET status = 'rewarded' WHERE id = $1 AND status = 'pending'",
        )
        .bind(report_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::step_failure(e, SettlementStep::RewardReport, report_id))?
        .rows_affected();
        if report_updated == 0 {
            return Err(Self::step_failed(SettlementStep::RewardReport, report_id));
        }

        sqlx::query("UPDATE rewards SET status = 'completed' WHERE id = $1")
            .bind(reward_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::step_failure(e, SettlementStep::RewardReport, report_id))?;

        tx.commit().await?;

        ReportRepo::find_detail(pool, report_id)
            .await?
            .ok_or_else(|| {
                CoreError::Inconsistency(format!("report {report_id} vanished after settlement"))
                    .into()
            })
    }

    fn step_failure(err: sqlx::Error, step: SettlementStep, report_id: DbId) -> DbError {
        tracing::error!(error = %err, step = %step, report_id, "Settlement step failed");
        Self::step_failed(step, report_id)
    }

    fn step_failed(step: SettlementStep, report_id: DbId) -> DbError {
        tracing::error!(step = %step, report_id, "Settlement write affected no rows");
        CoreError::SettlementFailed { step }.into()
    }
}
