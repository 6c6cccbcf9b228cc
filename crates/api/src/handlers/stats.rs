//! Handler for the home screen counters.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use voyo_core::access::Participant;
use voyo_core::error::CoreError;
use voyo_db::models::stats::{ProspectStats, VisitorStats};
use voyo_db::repositories::StatsRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Counters for whichever side the caller is on.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum HomeStats {
    Prospect(ProspectStats),
    Visitor(VisitorStats),
}

/// GET /api/v1/home/stats
pub async fn home_stats(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<HomeStats>>> {
    let now = chrono::Utc::now();
    let stats = match user.side().ok_or_else(CoreError::access_denied)? {
        Participant::Prospect => {
            HomeStats::Prospect(StatsRepo::for_prospect(&state.pool, &user.phone_number, now).await?)
        }
        Participant::Visitor => {
            HomeStats::Visitor(StatsRepo::for_visitor(&state.pool, &user.phone_number, now).await?)
        }
    };
    Ok(Json(DataResponse { data: stats }))
}
