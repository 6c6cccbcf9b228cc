//! Route definitions for the availability search.

use axum::routing::get;
use axum::Router;

use crate::handlers::search;
use crate::state::AppState;

/// Routes merged at the API root.
///
/// ```text
/// GET /search    -> search (?x=&y=&date=&service_type_id=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(search::search))
}
