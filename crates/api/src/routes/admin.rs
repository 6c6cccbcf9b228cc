//! Route definitions for `/admin`.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET /visits    -> list_all_visits
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/visits", get(admin::list_all_visits))
}
