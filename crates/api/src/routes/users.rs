//! Route definitions for the caller's own profile settings.

use axum::routing::get;
use axum::Router;

use crate::handlers::location;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET /me/location    -> get_location
/// PUT /me/location    -> set_location
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/me/location",
        get(location::get_location).put(location::set_location),
    )
}
