//! Route definitions for the `/criteria` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::criteria;
use crate::state::AppState;

/// Routes mounted at `/criteria`.
///
/// ```text
/// GET    /        -> list_criteria
/// POST   /        -> create_criteria
/// GET    /{id}    -> get_criteria
/// PATCH  /{id}    -> update_criteria
/// DELETE /{id}    -> delete_criteria
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(criteria::list_criteria).post(criteria::create_criteria))
        .route(
            "/{id}",
            get(criteria::get_criteria)
                .patch(criteria::update_criteria)
                .delete(criteria::delete_criteria),
        )
}
