//! Handlers for the `/visits` resource: booking, reading, status changes,
//! cancellation and the on-site verification code.
//!
//! Every route below is guarded the same way: a caller who is not one of the
//! visit's two parties gets `401 Unauthorized access`, whether or not the
//! visit exists.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use voyo_core::access::require_participant;
use voyo_core::criteria::validate_prompt;
use voyo_core::error::CoreError;
use voyo_core::roles::ROLE_VISITOR;
use voyo_core::types::{DbId, Timestamp};
use voyo_core::verification::{confirm_with_code, generate_code};
use voyo_core::visit::{
    end_time, plan_cancel, plan_update, validate_price, visit_location, ListType, VisitLocation,
    VisitStatus,
};
use voyo_db::models::criteria::Criteria;
use voyo_db::models::visit::{CreateVisit, NewVisit, UpdateVisit, Visit, VisitListItem};
use voyo_db::repositories::{CriteriaRepo, ServiceTypeRepo, UserRepo, VisitRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::search::last_initial;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireProspect;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for the visit list.
#[derive(Debug, Deserialize)]
pub struct VisitListQuery {
    /// `upcoming` (default) or `passed`.
    #[serde(rename = "type")]
    pub list_type: Option<String>,
}

/// A new visit together with the criteria created for it.
#[derive(Debug, Serialize)]
pub struct CreatedVisit {
    #[serde(flatten)]
    pub visit: Visit,
    pub criteria: Vec<Criteria>,
}

/// The visitor as presented to the prospect.
#[derive(Debug, Serialize)]
pub struct VisitorSummary {
    pub phone_number: String,
    pub first_name: String,
    pub last_initial: String,
    pub profile_picture: Option<String>,
    pub visits_done: i64,
    /// 0.0 when the visitor has no rated visit yet.
    pub average_rating: f64,
}

/// Full view of a visit for one of its parties.
#[derive(Debug, Serialize)]
pub struct VisitDetail {
    pub id: DbId,
    pub status: VisitStatus,
    pub prospect_phone: String,
    pub visitor_phone: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub duration_minutes: i32,
    pub service_type_id: DbId,
    pub service_label: String,
    pub price: f64,
    pub note: Option<f64>,
    pub place_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub visit_accepted: bool,
    pub criteria_sent: bool,
    pub criteria: Vec<Criteria>,
    pub visitor: VisitorSummary,
    /// `None` for the visitor, who must obtain it on site.
    pub verification_code: Option<i32>,
    pub code_hidden: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct CodeResponse {
    pub code: i32,
}

/// Body of `POST /visits/{id}/code`. Numbers and strings are both accepted.
#[derive(Debug, Deserialize)]
pub struct CheckCodeRequest {
    pub code: CodeInput,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CodeInput {
    Number(i64),
    Text(String),
}

impl CodeInput {
    fn as_text(&self) -> String {
        match self {
            CodeInput::Number(n) => n.to_string(),
            CodeInput::Text(s) => s.clone(),
        }
    }
}

fn stored_status(visit: &Visit) -> AppResult<VisitStatus> {
    visit.status().map_err(|e| {
        AppError::InternalError(format!("Visit {} has an invalid status: {e}", visit.id))
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/visits
///
/// Book a visit with a visitor. The visit, its criteria and the links between
/// them are written in one transaction.
pub async fn create_visit(
    RequireProspect(user): RequireProspect,
    State(state): State<AppState>,
    Json(input): Json<CreateVisit>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedVisit>>)> {
    // The token is trusted for its role, but the booking needs a user row.
    UserRepo::find_by_phone(&state.pool, &user.phone_number)
        .await?
        .ok_or_else(CoreError::access_denied)?;

    let visitor_phone = input
        .visitor_phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("visitor_phone is required".into()))?;
    let start_time = input
        .start_time
        .ok_or_else(|| AppError::BadRequest("start_time is required".into()))?;
    let price = input
        .price
        .ok_or_else(|| AppError::BadRequest("price is required".into()))?;
    let service_type_id = input
        .service_type_id
        .ok_or_else(|| AppError::BadRequest("service_type_id is required".into()))?;

    validate_price(price)?;
    let location = visit_location(input.place_id, input.latitude, input.longitude)?;
    for criteria in &input.criteria {
        validate_prompt(&criteria.prompt)?;
    }

    match UserRepo::role_label(&state.pool, &visitor_phone).await?.as_deref() {
        Some(ROLE_VISITOR) => {}
        _ => {
            return Err(AppError::BadRequest(
                "visitor_phone does not belong to a visitor".into(),
            ))
        }
    }
    if ServiceTypeRepo::find_by_id(&state.pool, service_type_id)
        .await?
        .is_none()
    {
        return Err(AppError::BadRequest(format!(
            "Unknown service type {service_type_id}"
        )));
    }

    let (place_id, point) = match location {
        VisitLocation::Point { place_id, point } => (place_id, point),
        VisitLocation::Place(place_id) => {
            let point = state.geo.resolve_coordinates(&place_id).await?;
            (Some(place_id), point)
        }
    };

    let new_visit = NewVisit {
        prospect_phone: user.phone_number,
        visitor_phone,
        place_id,
        latitude: point.latitude,
        longitude: point.longitude,
        service_type_id,
        start_time,
        price,
        verification_code: generate_code(),
    };
    let (visit, criteria) =
        VisitRepo::create_with_criteria(&state.pool, &new_visit, &input.criteria).await?;

    tracing::info!(
        visit_id = visit.id,
        prospect = %visit.prospect_phone,
        visitor = %visit.visitor_phone,
        criteria = criteria.len(),
        "Visit created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedVisit { visit, criteria },
        }),
    ))
}

/// GET /api/v1/visits?type=upcoming|passed
///
/// The caller's visits on their side (prospect or visitor), by start time.
pub async fn list_visits(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<VisitListQuery>,
) -> AppResult<Json<DataResponse<Vec<VisitListItem>>>> {
    let side = user.side().ok_or_else(CoreError::access_denied)?;
    let list = match params.list_type.as_deref() {
        Some(raw) => raw.parse::<ListType>()?,
        None => ListType::Upcoming,
    };
    let visits =
        VisitRepo::list_for_participant(&state.pool, &user.phone_number, side, list).await?;
    Ok(Json(DataResponse { data: visits }))
}

/// GET /api/v1/visits/{id}
pub async fn get_visit(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<VisitDetail>>> {
    let row = VisitRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(CoreError::access_denied)?;
    let side = require_participant(&user.phone_number, &row.prospect_phone, &row.visitor_phone)?;

    let status: VisitStatus = row.status.parse().map_err(|e| {
        AppError::InternalError(format!("Visit {id} has an invalid status: {e}"))
    })?;

    let address = match (&row.formatted_address, &row.place_id) {
        (Some(address), _) => Some(address.clone()),
        (None, Some(place_id)) => match state.geo.resolve_address(place_id).await {
            Ok(address) => Some(address),
            Err(e) => {
                tracing::warn!(visit_id = id, place_id = %place_id, error = %e, "Address lookup failed");
                None
            }
        },
        (None, None) => None,
    };

    let criteria = CriteriaRepo::list_for_visit(&state.pool, id).await?;
    let show_code = side.may_see_code();

    Ok(Json(DataResponse {
        data: VisitDetail {
            id: row.id,
            status,
            end_time: end_time(row.start_time, row.duration_minutes),
            start_time: row.start_time,
            duration_minutes: row.duration_minutes,
            service_type_id: row.service_type_id,
            service_label: row.service_label,
            price: row.price,
            note: row.note,
            place_id: row.place_id,
            latitude: row.latitude,
            longitude: row.longitude,
            address,
            visit_accepted: status.is_accepted(),
            criteria_sent: row.criteria_sent,
            criteria,
            visitor: VisitorSummary {
                last_initial: last_initial(&row.visitor_last_name),
                phone_number: row.visitor_phone.clone(),
                first_name: row.visitor_first_name,
                profile_picture: row.visitor_profile_picture,
                visits_done: row.visitor_visits_done,
                average_rating: row.visitor_average_rating.unwrap_or(0.0),
            },
            prospect_phone: row.prospect_phone,
            visitor_phone: row.visitor_phone,
            verification_code: show_code.then_some(row.verification_code),
            code_hidden: !show_code,
            created_at: row.created_at,
            updated_at: row.updated_at,
        },
    }))
}

/// PATCH /api/v1/visits/{id}
///
/// Change the status and/or rate the visit. The row is locked for the
/// duration of the check and write.
pub async fn update_visit(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVisit>,
) -> AppResult<StatusCode> {
    let requested = input
        .status
        .as_deref()
        .map(str::parse::<VisitStatus>)
        .transpose()?;

    let mut tx = state.pool.begin().await?;
    let visit = VisitRepo::lock(&mut tx, id)
        .await?
        .ok_or_else(CoreError::access_denied)?;
    let actor = require_participant(&user.phone_number, &visit.prospect_phone, &visit.visitor_phone)?;
    let current = stored_status(&visit)?;

    let update = plan_update(actor, current, requested, input.note)?;
    let updated = VisitRepo::apply_update(&mut tx, id, update.status, update.note).await?;
    tx.commit().await?;

    tracing::info!(
        visit_id = id,
        phone = %user.phone_number,
        from = %current,
        to = %updated.status,
        note = ?updated.note,
        "Visit updated"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/visits/{id}
///
/// Cancel the visit. Cancelling twice is harmless; completed or rejected
/// visits are kept as they are.
pub async fn delete_visit(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    let visit = VisitRepo::lock(&mut tx, id)
        .await?
        .ok_or_else(CoreError::access_denied)?;
    require_participant(&user.phone_number, &visit.prospect_phone, &visit.visitor_phone)?;

    if let Some(next) = plan_cancel(stored_status(&visit)?)? {
        VisitRepo::apply_update(&mut tx, id, Some(next), None).await?;
        tracing::info!(visit_id = id, phone = %user.phone_number, "Visit cancelled");
    }
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/visits/{id}/code
///
/// The verification code, shown to the prospect only.
pub async fn get_code(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CodeResponse>>> {
    let visit = VisitRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(CoreError::access_denied)?;
    let side = require_participant(&user.phone_number, &visit.prospect_phone, &visit.visitor_phone)?;
    if !side.may_see_code() {
        return Err(CoreError::access_denied().into());
    }
    Ok(Json(DataResponse {
        data: CodeResponse {
            code: visit.verification_code,
        },
    }))
}

/// POST /api/v1/visits/{id}/code
///
/// Confirm an accepted visit with the code the prospect handed over.
pub async fn check_code(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CheckCodeRequest>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    let visit = VisitRepo::lock(&mut tx, id)
        .await?
        .ok_or_else(CoreError::access_denied)?;
    require_participant(&user.phone_number, &visit.prospect_phone, &visit.visitor_phone)?;

    let next = match confirm_with_code(
        stored_status(&visit)?,
        visit.verification_code,
        &input.code.as_text(),
    ) {
        Ok(next) => next,
        Err(e) => {
            tracing::info!(visit_id = id, phone = %user.phone_number, error = %e, "Code check refused");
            return Err(e.into());
        }
    };
    VisitRepo::apply_update(&mut tx, id, Some(next), None).await?;
    tx.commit().await?;

    tracing::info!(visit_id = id, phone = %user.phone_number, "Visit confirmed by code");
    Ok(StatusCode::NO_CONTENT)
}
