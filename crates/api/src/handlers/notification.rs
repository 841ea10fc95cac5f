//! Handlers for post-scoped notification endpoints.

use axum::extract::{Path, State};
use axum::Json;
use pawtrail_core::types::DbId;
use pawtrail_db::models::notification::Notification;
use pawtrail_db::repositories::NotificationRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::post::ensure_owner;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for `PUT /posts/{id}/notifications/read`.
#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    /// How many notifications were flipped from unread to read.
    pub updated_count: u64,
}

/// GET /api/v1/posts/{id}/notifications
///
/// Owner-only. Lists unread notifications for the post, newest first.
pub async fn list_unread(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    ensure_owner(&state, &user, id).await?;
    let notifications = NotificationRepo::unread_for_post(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// PUT /api/v1/posts/{id}/notifications/read
///
/// Owner-only. Marks every unread notification on the post as read and
/// reports how many were affected.
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MarkReadResponse>> {
    ensure_owner(&state, &user, id).await?;
    let updated_count = NotificationRepo::mark_read_for_post(&state.pool, id).await?;
    Ok(Json(MarkReadResponse { updated_count }))
}
