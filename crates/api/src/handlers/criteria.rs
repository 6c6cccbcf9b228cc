//! Handlers for screening criteria: the `/criteria` resource and the
//! criteria attached to a visit.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use voyo_core::access::{require_participant, Participant};
use voyo_core::criteria::{
    authorize_patch, validate_link, validate_prompt, validate_reusable_change, CriteriaEditor,
};
use voyo_core::error::CoreError;
use voyo_core::types::DbId;
use voyo_db::models::criteria::{CreateCriteria, Criteria, LinkCriteria, UpdateCriteria};
use voyo_db::repositories::{AccessRepo, CriteriaRepo, VisitRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireProspect;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/criteria
pub async fn create_criteria(
    RequireProspect(user): RequireProspect,
    State(state): State<AppState>,
    Json(input): Json<CreateCriteria>,
) -> AppResult<(StatusCode, Json<DataResponse<Criteria>>)> {
    validate_prompt(&input.prompt)?;
    let criteria = CriteriaRepo::create(&state.pool, &user.phone_number, &input).await?;
    tracing::info!(criteria_id = criteria.id, owner = %user.phone_number, "Criteria created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: criteria })))
}

/// GET /api/v1/criteria
///
/// Criteria written by the caller.
pub async fn list_criteria(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Criteria>>>> {
    let items = CriteriaRepo::list_for_owner(&state.pool, &user.phone_number).await?;
    Ok(Json(DataResponse { data: items }))
}

/// Load a criteria and decide how the caller relates to it.
async fn load_for(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> AppResult<(Criteria, CriteriaEditor)> {
    let criteria = CriteriaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(CoreError::access_denied)?;
    if criteria.owner_phone == user.phone_number {
        return Ok((criteria, CriteriaEditor::Owner));
    }
    if AccessRepo::has_criteria_access(&state.pool, &user.phone_number, id).await? {
        return Ok((criteria, CriteriaEditor::Participant));
    }
    Err(CoreError::access_denied().into())
}

/// GET /api/v1/criteria/{id}
pub async fn get_criteria(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Criteria>>> {
    let (criteria, _) = load_for(&state, &user, id).await?;
    Ok(Json(DataResponse { data: criteria }))
}

/// PATCH /api/v1/criteria/{id}
///
/// The owner may change anything; the other party of a linked visit may only
/// submit the photo or video.
pub async fn update_criteria(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCriteria>,
) -> AppResult<Json<DataResponse<Criteria>>> {
    let (_, editor) = load_for(&state, &user, id).await?;
    authorize_patch(editor, input.touches_owner_fields())?;
    if input.photo.is_none() && input.video.is_none() && !input.touches_owner_fields() {
        return Err(AppError::BadRequest("Nothing to update".into()));
    }
    if let Some(prompt) = &input.prompt {
        validate_prompt(prompt)?;
    }

    let mut tx = state.pool.begin().await?;
    CriteriaRepo::lock(&mut tx, id)
        .await?
        .ok_or_else(CoreError::access_denied)?;
    if input.reusable == Some(false) {
        let links = CriteriaRepo::link_count(&mut tx, id).await?;
        validate_reusable_change(input.reusable, links)?;
    }
    let updated = CriteriaRepo::update(&mut tx, id, &input)
        .await?
        .ok_or_else(CoreError::access_denied)?;
    tx.commit().await?;
    tracing::info!(criteria_id = id, phone = %user.phone_number, editor = ?editor, "Criteria updated");
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/criteria/{id}
///
/// Owner only, and only while the criteria is not attached to any visit.
pub async fn delete_criteria(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let (_, editor) = load_for(&state, &user, id).await?;
    if editor != CriteriaEditor::Owner {
        return Err(CoreError::access_denied().into());
    }
    if CriteriaRepo::is_linked(&state.pool, id).await? {
        return Err(CoreError::Conflict("Criteria is attached to a visit".into()).into());
    }
    CriteriaRepo::delete(&state.pool, id).await?;
    tracing::info!(criteria_id = id, owner = %user.phone_number, "Criteria deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/visits/{id}/criteria
pub async fn list_visit_criteria(
    user: AuthUser,
    State(state): State<AppState>,
    Path(visit_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Criteria>>>> {
    if !AccessRepo::has_visit_access(&state.pool, &user.phone_number, visit_id).await? {
        return Err(CoreError::access_denied().into());
    }
    let items = CriteriaRepo::list_for_visit(&state.pool, visit_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// Only the prospect of a visit manages its criteria.
async fn require_visit_prospect(state: &AppState, user: &AuthUser, visit_id: DbId) -> AppResult<()> {
    let visit = VisitRepo::find_by_id(&state.pool, visit_id)
        .await?
        .ok_or_else(CoreError::access_denied)?;
    let side = require_participant(&user.phone_number, &visit.prospect_phone, &visit.visitor_phone)?;
    if side != Participant::Prospect {
        return Err(CoreError::access_denied().into());
    }
    Ok(())
}

/// POST /api/v1/visits/{id}/criteria
///
/// Attach one of the caller's criteria to a visit they booked. A criteria
/// that is not reusable may only ever be attached to one visit.
pub async fn link_criteria(
    user: AuthUser,
    State(state): State<AppState>,
    Path(visit_id): Path<DbId>,
    Json(input): Json<LinkCriteria>,
) -> AppResult<(StatusCode, Json<DataResponse<Criteria>>)> {
    require_visit_prospect(&state, &user, visit_id).await?;

    let mut tx = state.pool.begin().await?;
    let criteria = CriteriaRepo::lock(&mut tx, input.criteria_id)
        .await?
        .filter(|c| c.owner_phone == user.phone_number)
        .ok_or_else(CoreError::access_denied)?;
    let elsewhere = CriteriaRepo::linked_to_other_visit(&mut tx, criteria.id, visit_id).await?;
    validate_link(criteria.reusable, elsewhere)?;
    CriteriaRepo::link(&mut tx, criteria.id, visit_id).await?;
    tx.commit().await?;

    tracing::info!(visit_id, criteria_id = criteria.id, "Criteria linked to visit");
    Ok((StatusCode::CREATED, Json(DataResponse { data: criteria })))
}

/// DELETE /api/v1/visits/{id}/criteria/{criteria_id}
///
/// Detach a criteria from a visit. The criteria itself is kept.
pub async fn unlink_criteria(
    user: AuthUser,
    State(state): State<AppState>,
    Path((visit_id, criteria_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    require_visit_prospect(&state, &user, visit_id).await?;
    if !CriteriaRepo::unlink(&state.pool, criteria_id, visit_id).await? {
        return Err(CoreError::access_denied().into());
    }
    tracing::info!(visit_id, criteria_id, "Criteria unlinked from visit");
    Ok(StatusCode::NO_CONTENT)
}
