//! Route definitions for the `/availability` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::availability;
use crate::state::AppState;

/// Routes mounted at `/availability`.
///
/// ```text
/// GET    /        -> list_availability
/// POST   /        -> create_availability
/// PUT    /{id}    -> update_availability
/// DELETE /{id}    -> delete_availability
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(availability::list_availability).post(availability::create_availability),
        )
        .route(
            "/{id}",
            put(availability::update_availability).delete(availability::delete_availability),
        )
}
