//! Shared response envelope for list endpoints.
//!
//! Collection responses (posts, sighting reports, notifications) wrap their
//! payload in a `{ "data": [...] }` envelope so clients can page or extend
//! the shape later without breaking the top level. Single-entity responses
//! return the entity directly.

use serde::Serialize;

/// Standard `{ "data": T }` envelope for collection responses.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: posts }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
