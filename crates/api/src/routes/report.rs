//! Route definitions for the `/reports` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::report;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// POST /              -> create
/// GET  /{id}          -> get_by_id
/// PUT  /{id}/reject   -> reject (owner only)
/// PUT  /{id}/reward   -> reward (owner only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(report::create))
        .route("/{id}", get(report::get_by_id))
        .route("/{id}/reject", put(report::reject))
        .route("/{id}/reward", put(report::reward))
}
