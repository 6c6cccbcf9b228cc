//! Handlers for `/users/me/location`: where a visitor works and how far
//! they travel.

use axum::extract::State;
use axum::Json;
use voyo_core::geo::validate_radius;
use voyo_core::visit::{visit_location, VisitLocation};
use voyo_db::models::provider_location::{
    ProviderLocation, SetProviderLocation, UpsertProviderLocation,
};
use voyo_db::repositories::ProviderLocationRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireVisitor;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users/me/location
///
/// `data` is `null` until a location has been set.
pub async fn get_location(
    RequireVisitor(user): RequireVisitor,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Option<ProviderLocation>>>> {
    let location = ProviderLocationRepo::find_by_phone(&state.pool, &user.phone_number).await?;
    Ok(Json(DataResponse { data: location }))
}

/// PUT /api/v1/users/me/location
///
/// Set the service area from coordinates or from a place id, which is
/// resolved through the geocoder.
pub async fn set_location(
    RequireVisitor(user): RequireVisitor,
    State(state): State<AppState>,
    Json(input): Json<SetProviderLocation>,
) -> AppResult<Json<DataResponse<ProviderLocation>>> {
    validate_radius(input.radius_m)?;
    let (place_id, point) = match visit_location(input.place_id, input.latitude, input.longitude)? {
        VisitLocation::Point { place_id, point } => (place_id, point),
        VisitLocation::Place(place_id) => {
            let point = state.geo.resolve_coordinates(&place_id).await?;
            (Some(place_id), point)
        }
    };

    let saved = ProviderLocationRepo::upsert(
        &state.pool,
        &user.phone_number,
        &UpsertProviderLocation {
            place_id,
            point,
            radius_m: input.radius_m,
        },
    )
    .await?;

    tracing::info!(
        phone = %user.phone_number,
        latitude = saved.latitude,
        longitude = saved.longitude,
        radius_m = saved.radius_m,
        "Service area updated"
    );
    Ok(Json(DataResponse { data: saved }))
}
