use axum::routing::get;
use axum::Router;

use crate::handlers::stats;
use crate::state::AppState;

/// Routes mounted at `/home`.
///
/// ```text
/// GET /stats    -> home_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(stats::home_stats))
}
