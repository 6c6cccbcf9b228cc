pub mod admin;
pub mod availability;
pub mod criteria;
pub mod health;
pub mod home;
pub mod search;
pub mod users;
pub mod visits;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /search                        availability search
///
/// /visits                        list (?type=upcoming|passed), create
/// /visits/{id}                   get, update (PATCH), cancel (DELETE)
/// /visits/{id}/code              get code (prospect), check code (POST)
/// /visits/{id}/criteria          list, link (POST)
/// /visits/{id}/criteria/{cid}    unlink (DELETE)
///
/// /criteria                      list own, create
/// /criteria/{id}                 get, update (PATCH), delete
///
/// /availability                  list own, create (visitor only)
/// /availability/{id}             replace (PUT), delete
///
/// /users/me/location             get, set (PUT) (visitor only)
///
/// /home/stats                    home screen counters
///
/// /admin/visits                  every visit (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(search::router())
        .nest("/visits", visits::router())
        .nest("/criteria", criteria::router())
        .nest("/availability", availability::router())
        .nest("/users", users::router())
        .nest("/home", home::router())
        .nest("/admin", admin::router())
}
