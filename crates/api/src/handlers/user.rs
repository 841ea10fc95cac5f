//! Handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::Json;
use pawtrail_core::error::CoreError;
use pawtrail_core::types::DbId;
use pawtrail_db::models::user::{TopUpRequest, User};
use pawtrail_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/users/me
pub async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<User>> {
    let me = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;
    Ok(Json(me))
}

/// POST /api/v1/users/me/top-up
///
/// Atomically add points to the authenticated user's balance.
pub async fn top_up(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<TopUpRequest>,
) -> AppResult<Json<User>> {
    if input.amount <= 0 {
        return Err(AppError::Core(CoreError::Validation {
            field: "amount",
            reason: "must be a positive number of points".to_string(),
        }));
    }

    let updated = UserRepo::top_up(&state.pool, user.user_id, input.amount)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;
    Ok(Json(updated))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<User>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(user))
}
