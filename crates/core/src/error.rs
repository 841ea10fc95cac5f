//! Domain error taxonomy shared by the db and api crates.

use crate::settlement::SettlementStep;
use crate::status::PostStatus;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed or missing input. Always raised before any write, so a
    /// validation failure is never partially applied.
    #[error("Validation failed: {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },

    /// A report was submitted against a post that is no longer `lost`.
    #[error("Cannot submit a report for a post that is already {current_status}")]
    PostNotActive { current_status: PostStatus },

    /// The owner offered a reward larger than their point balance.
    #[error("Insufficient balance: have {current} points but need {required}")]
    InsufficientBalance { current: i64, required: i64 },

    /// The report already left `pending` (rewarded or rejected).
    #[error("Report has already been settled")]
    AlreadySettled,

    /// An entity that must exist by invariant (the post behind a report,
    /// the reporter of a report) is missing. Not client-caused; logged
    /// loudly and surfaced as a generic server fault.
    #[error("Internal consistency error: {0}")]
    Inconsistency(String),

    /// A settlement step failed after an earlier step in the same workflow
    /// succeeded. The surrounding transaction is rolled back; the step name
    /// tells an operator exactly which write broke.
    #[error("Settlement failed at step: {step}")]
    SettlementFailed { step: SettlementStep },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a missing-required-field validation error.
    pub fn missing_field(field: &'static str) -> Self {
        CoreError::Validation {
            field,
            reason: "is required".to_string(),
        }
    }
}
