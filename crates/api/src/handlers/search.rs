//! Handler for `/search`: which visitors can serve a visit of a given kind,
//! at a given time and place.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use voyo_core::geo::GeoPoint;
use voyo_core::matching::{self, parse_search_datetime, ProviderCandidate, SearchRequest};
use voyo_core::recurrence::AvailabilityWindow;
use voyo_core::types::DbId;
use voyo_db::models::search::ProviderRow;
use voyo_db::repositories::{SearchRepo, ServiceTypeRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters of the search. Everything arrives as text so a missing
/// or malformed value gets the API's own 400 body.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Latitude of the visit.
    pub x: Option<String>,
    /// Longitude of the visit.
    pub y: Option<String>,
    pub date: Option<String>,
    pub service_type_id: Option<String>,
    /// Older clients send the service type under this name.
    pub duration: Option<String>,
}

/// A provider as shown in the search result.
#[derive(Debug, Serialize)]
pub struct ProviderMatch {
    pub phone_number: String,
    pub first_name: String,
    pub last_initial: String,
    pub profile_picture: Option<String>,
    pub biography: Option<String>,
    pub pricing: Option<f64>,
    /// Distance to the visit, rounded.
    pub distance_m: f64,
    /// 0.0 when unrated; see `rating_count`.
    pub average_rating: f64,
    pub rating_count: i64,
    pub visits_done: i64,
    /// `false` for fallback results that ignore availability.
    pub matched: bool,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// `true` when nobody was available and the nearest providers are listed instead.
    pub fallback: bool,
    pub providers: Vec<ProviderMatch>,
}

/// First letter of a last name, followed by a dot.
pub(crate) fn last_initial(last_name: &str) -> String {
    last_name
        .trim()
        .chars()
        .next()
        .map(|c| format!("{}.", c.to_uppercase()))
        .unwrap_or_default()
}

fn required<'a>(value: &'a Option<String>, name: &str) -> AppResult<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Missing query parameter '{name}'")))
}

fn parse_coordinate(value: &Option<String>, name: &str) -> AppResult<f64> {
    required(value, name)?
        .parse::<f64>()
        .map_err(|_| AppError::BadRequest(format!("Query parameter '{name}' must be a number")))
}

/// GET /api/v1/search?x=&y=&date=&service_type_id=
///
/// Available providers nearest first; when none is available, the nearest
/// providers regardless of availability with `fallback = true`.
pub async fn search(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<DataResponse<SearchResponse>>> {
    let latitude = parse_coordinate(&params.x, "x")?;
    let longitude = parse_coordinate(&params.y, "y")?;
    let target = GeoPoint::new(latitude, longitude)?;
    let start = parse_search_datetime(required(&params.date, "date")?)?;

    let service_param = if params.service_type_id.is_some() {
        &params.service_type_id
    } else {
        &params.duration
    };
    let service_type_id: DbId = required(service_param, "service_type_id")?
        .parse()
        .map_err(|_| AppError::BadRequest("service_type_id must be an integer".into()))?;
    let service_type = ServiceTypeRepo::find_by_id(&state.pool, service_type_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("Unknown service type {service_type_id}")))?;

    let request = SearchRequest {
        target,
        start,
        required_minutes: i64::from(service_type.duration_minutes),
    };

    let loaded = SearchRepo::load_candidates(&state.pool, target).await?;

    let mut windows: HashMap<String, Vec<AvailabilityWindow>> = HashMap::new();
    for row in &loaded.availabilities {
        let window = row.window().map_err(|e| {
            AppError::InternalError(format!("Stored availability {} is invalid: {e}", row.id))
        })?;
        windows.entry(row.owner_phone.clone()).or_default().push(window);
    }

    let candidates: Vec<ProviderCandidate<ProviderRow>> = loaded
        .providers
        .into_iter()
        .map(|profile| ProviderCandidate {
            area: profile.service_area(),
            windows: windows.remove(&profile.phone_number).unwrap_or_default(),
            profile,
        })
        .collect();

    let config = &state.config.search;
    let mut ranked = matching::available(&request, candidates, config);
    if ranked.is_empty() {
        let nearest = SearchRepo::nearest_providers(&state.pool, target, config.fallback_limit)
            .await?
            .into_iter()
            .map(|profile| ProviderCandidate {
                area: profile.service_area(),
                windows: Vec::new(),
                profile,
            })
            .collect();
        ranked = matching::fallback(&request, nearest, config);
    }
    let fallback = ranked.first().is_some_and(|r| !r.matched);

    tracing::debug!(
        service_type_id,
        results = ranked.len(),
        fallback,
        "Search completed"
    );

    let providers = ranked
        .into_iter()
        .map(|r| ProviderMatch {
            last_initial: last_initial(&r.profile.last_name),
            phone_number: r.profile.phone_number,
            first_name: r.profile.first_name,
            profile_picture: r.profile.profile_picture,
            biography: r.profile.biography,
            pricing: r.profile.pricing,
            distance_m: r.rounded_distance_m,
            average_rating: r.profile.rating_average.unwrap_or(0.0),
            rating_count: r.profile.rating_count,
            visits_done: r.profile.visits_done,
            matched: r.matched,
        })
        .collect();

    Ok(Json(DataResponse {
        data: SearchResponse {
            fallback,
            providers,
        },
    }))
}
