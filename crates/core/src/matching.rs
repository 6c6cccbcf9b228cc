//! Availability matching: which providers can serve a visit of a given
//! duration, at a given time and place.
//!
//! The repository layer narrows the candidates down to visitors whose service
//! area roughly reaches the target; [`available`] then applies the exact
//! geographic and recurrence checks and ranks by distance. When nobody is
//! available the caller loads the nearest providers and ranks them with
//! [`fallback`].

use chrono::{DateTime, NaiveDateTime};

use crate::error::CoreError;
use crate::geo::{round_distance, GeoPoint, ServiceArea, DEFAULT_DISTANCE_ROUNDING_M};
use crate::recurrence::AvailabilityWindow;

/// Default number of providers returned when no provider is available.
pub const DEFAULT_FALLBACK_LIMIT: usize = 20;

/// Tunables for the search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    /// Reported distances are rounded to a multiple of this many metres.
    pub distance_rounding_m: f64,
    /// Maximum number of providers in the fallback list.
    pub fallback_limit: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            distance_rounding_m: DEFAULT_DISTANCE_ROUNDING_M,
            fallback_limit: DEFAULT_FALLBACK_LIMIT,
        }
    }
}

/// What the prospect is looking for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRequest {
    pub target: GeoPoint,
    pub start: NaiveDateTime,
    pub required_minutes: i64,
}

/// A provider considered by the search. `profile` is carried through to the
/// result untouched.
#[derive(Debug, Clone)]
pub struct ProviderCandidate<T> {
    pub profile: T,
    pub area: ServiceArea,
    pub windows: Vec<AvailabilityWindow>,
}

/// A provider in the search result.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedProvider<T> {
    pub profile: T,
    pub distance_m: f64,
    pub rounded_distance_m: f64,
    /// `false` for fallback results that ignore availability.
    pub matched: bool,
}

impl<T> ProviderCandidate<T> {
    /// Whether the target lies in the service area and at least one window
    /// covers the requested slot.
    pub fn is_available(&self, request: &SearchRequest) -> bool {
        self.area.contains(&request.target)
            && self
                .windows
                .iter()
                .any(|w| w.covers(request.start, request.required_minutes))
    }
}

/// Providers of `candidates` that can take the visit, nearest first.
pub fn available<T>(
    request: &SearchRequest,
    candidates: Vec<ProviderCandidate<T>>,
    config: &MatchConfig,
) -> Vec<RankedProvider<T>> {
    let available: Vec<_> = candidates
        .into_iter()
        .filter(|c| c.is_available(request))
        .collect();
    rank(request, available, config, true, usize::MAX)
}

/// The `fallback_limit` nearest of `candidates`, regardless of availability
/// or service area, flagged with `matched = false`.
pub fn fallback<T>(
    request: &SearchRequest,
    candidates: Vec<ProviderCandidate<T>>,
    config: &MatchConfig,
) -> Vec<RankedProvider<T>> {
    rank(request, candidates, config, false, config.fallback_limit)
}

fn rank<T>(
    request: &SearchRequest,
    candidates: Vec<ProviderCandidate<T>>,
    config: &MatchConfig,
    matched: bool,
    limit: usize,
) -> Vec<RankedProvider<T>> {
    let mut ranked: Vec<RankedProvider<T>> = candidates
        .into_iter()
        .map(|c| {
            let distance_m = c.area.center.distance_m(&request.target);
            RankedProvider {
                profile: c.profile,
                distance_m,
                rounded_distance_m: round_distance(distance_m, config.distance_rounding_m),
                matched,
            }
        })
        .collect();

    // Stable sort: equal distances keep the repository order.
    ranked.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    ranked.truncate(limit);
    ranked
}

/// Parse the `date` query parameter of a search.
///
/// Accepts naive ISO-8601 date-times (`2025-01-01T10:00:00`, `2025-01-01T10:00`,
/// `2025-01-01 10:00:00`) and RFC 3339 timestamps. Windows are stored as
/// wall-clock times, so an offset is dropped rather than applied.
pub fn parse_search_datetime(raw: &str) -> Result<NaiveDateTime, CoreError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.naive_local());
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| CoreError::Validation(format!("Invalid search date '{raw}'")))
}
