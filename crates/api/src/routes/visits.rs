//! Route definitions for the `/visits` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{criteria, visits};
use crate::state::AppState;

/// Routes mounted at `/visits`.
///
/// ```text
/// GET    /                 -> list_visits (?type=upcoming|passed)
/// POST   /                 -> create_visit
/// GET    /{id}             -> get_visit
/// PATCH  /{id}             -> update_visit
/// DELETE /{id}             -> delete_visit
/// GET    /{id}/code        -> get_code
/// POST   /{id}/code        -> check_code
/// GET    /{id}/criteria    -> list_visit_criteria
/// POST   /{id}/criteria    -> link_criteria
/// DELETE /{id}/criteria/{criteria_id} -> unlink_criteria
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(visits::list_visits).post(visits::create_visit))
        .route(
            "/{id}",
            get(visits::get_visit)
                .patch(visits::update_visit)
                .delete(visits::delete_visit),
        )
        .route("/{id}/code", get(visits::get_code).post(visits::check_code))
        .route(
            "/{id}/criteria",
            get(criteria::list_visit_criteria).post(criteria::link_criteria),
        )
        .route(
            "/{id}/criteria/{criteria_id}",
            delete(criteria::unlink_criteria),
        )
}
