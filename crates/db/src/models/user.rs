//! User entity model and DTOs.

use pawtrail_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
///
/// `balance` is the user's point wallet: debited when offering a reward,
/// credited when a report they filed is rewarded. It is guarded against
/// going negative both in the repositories and by a CHECK constraint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub balance: i64,
    pub created_at: Timestamp,
}

/// DTO for inserting a new user (registration).
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Request body for topping up the authenticated user's balance.
#[derive(Debug, Deserialize)]
pub struct TopUpRequest {
    pub amount: i64,
}
