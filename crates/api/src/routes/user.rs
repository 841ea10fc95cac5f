//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET  /me         -> me
/// POST /me/top-up  -> top_up
/// GET  /{id}       -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(user::me))
        .route("/me/top-up", post(user::top_up))
        .route("/{id}", get(user::get_by_id))
}
