//! Admin-only handlers.

use axum::extract::State;
use axum::Json;
use voyo_db::models::visit::Visit;
use voyo_db::repositories::VisitRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/visits
///
/// Every visit, unfiltered.
pub async fn list_all_visits(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Visit>>>> {
    let visits = VisitRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: visits }))
}
