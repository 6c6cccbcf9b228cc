//! Handlers for the `/availability` resource: a visitor's recurring windows.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use voyo_core::error::CoreError;
use voyo_core::recurrence::validate_window;
use voyo_core::types::DbId;
use voyo_db::models::availability::{Availability, CreateAvailability};
use voyo_db::repositories::AvailabilityRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireVisitor;
use crate::response::DataResponse;
use crate::state::AppState;

/// Validate a window and store its recurrence in canonical form.
fn normalized(mut input: CreateAvailability) -> AppResult<CreateAvailability> {
    let recurrence = validate_window(input.duration_minutes, &input.recurrence)?;
    input.recurrence = recurrence.as_str().to_string();
    Ok(input)
}

/// GET /api/v1/availability
pub async fn list_availability(
    RequireVisitor(user): RequireVisitor,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Availability>>>> {
    let items = AvailabilityRepo::list_for_provider(&state.pool, &user.phone_number).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/availability
pub async fn create_availability(
    RequireVisitor(user): RequireVisitor,
    State(state): State<AppState>,
    Json(input): Json<CreateAvailability>,
) -> AppResult<(StatusCode, Json<DataResponse<Availability>>)> {
    let input = normalized(input)?;
    let created = AvailabilityRepo::create(&state.pool, &user.phone_number, &input).await?;
    tracing::info!(
        availability_id = created.id,
        owner = %user.phone_number,
        recurrence = %created.recurrence,
        "Availability created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PUT /api/v1/availability/{id}
///
/// Replace one of the caller's windows.
pub async fn update_availability(
    RequireVisitor(user): RequireVisitor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateAvailability>,
) -> AppResult<Json<DataResponse<Availability>>> {
    let input = normalized(input)?;
    let updated = AvailabilityRepo::update(&state.pool, id, &user.phone_number, &input)
        .await?
        .ok_or_else(CoreError::access_denied)?;
    tracing::info!(availability_id = id, owner = %user.phone_number, "Availability replaced");
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/availability/{id}
pub async fn delete_availability(
    RequireVisitor(user): RequireVisitor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !AvailabilityRepo::delete(&state.pool, id, &user.phone_number).await? {
        return Err(CoreError::access_denied().into());
    }
    tracing::info!(availability_id = id, owner = %user.phone_number, "Availability deleted");
    Ok(StatusCode::NO_CONTENT)
}
