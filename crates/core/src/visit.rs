//! Visit status machine, actor rules and input validation.
//!
//! ```text
//! PENDING  -> ACCEPTED | REJECTED | CANCELLED
//! ACCEPTED -> DONE | CANCELLED
//! REJECTED, DONE, CANCELLED are terminal
//! ```
//!
//! Accepting or rejecting is the visitor's call; either party may cancel or
//! mark the visit done.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::access::Participant;
use crate::error::CoreError;
use crate::geo::GeoPoint;
use crate::types::Timestamp;

/// Lowest and highest accepted rating.
pub const MIN_NOTE: f64 = 0.0;
pub const MAX_NOTE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VisitStatus {
    Pending,
    Accepted,
    Rejected,
    Done,
    Cancelled,
}

/// All status labels stored in `visits.status`.
pub const VALID_STATUSES: &[&str] = &["PENDING", "ACCEPTED", "REJECTED", "DONE", "CANCELLED"];

/// Statuses of visits that are still ahead of the participants.
pub const UPCOMING_STATUSES: &[&str] = &["PENDING", "ACCEPTED"];

impl VisitStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VisitStatus::Pending => "PENDING",
            VisitStatus::Accepted => "ACCEPTED",
            VisitStatus::Rejected => "REJECTED",
            VisitStatus::Done => "DONE",
            VisitStatus::Cancelled => "CANCELLED",
        }
    }

    /// Statuses this one may move to.
    pub fn valid_transitions(self) -> &'static [VisitStatus] {
        match self {
            VisitStatus::Pending => &[
                VisitStatus::Accepted,
                VisitStatus::Rejected,
                VisitStatus::Cancelled,
            ],
            VisitStatus::Accepted => &[VisitStatus::Done, VisitStatus::Cancelled],
            VisitStatus::Rejected | VisitStatus::Done | VisitStatus::Cancelled => &[],
        }
    }

    pub fn can_transition(self, next: VisitStatus) -> bool {
        self.valid_transitions().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.valid_transitions().is_empty()
    }

    /// `true` once the visitor has accepted, including after completion.
    pub fn is_accepted(self) -> bool {
        matches!(self, VisitStatus::Accepted | VisitStatus::Done)
    }

    pub fn is_upcoming(self) -> bool {
        UPCOMING_STATUSES.contains(&self.as_str())
    }
}

impl fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisitStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(VisitStatus::Pending),
            "ACCEPTED" => Ok(VisitStatus::Accepted),
            "REJECTED" => Ok(VisitStatus::Rejected),
            "DONE" => Ok(VisitStatus::Done),
            "CANCELLED" => Ok(VisitStatus::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Invalid visit status '{other}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}

/// Validate that `current -> next` is an edge of the status machine.
pub fn validate_transition(current: VisitStatus, next: VisitStatus) -> Result<(), CoreError> {
    if current.can_transition(next) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot transition visit from '{current}' to '{next}'"
        )))
    }
}

/// Whether `actor` may request a move to `next`.
pub fn actor_may_set(actor: Participant, next: VisitStatus) -> bool {
    match next {
        VisitStatus::Accepted | VisitStatus::Rejected => actor == Participant::Visitor,
        VisitStatus::Done | VisitStatus::Cancelled => true,
        VisitStatus::Pending => false,
    }
}

/// Check both the actor rule and the status machine for a status change.
///
/// The actor is checked first: a prospect trying to accept gets the access
/// error whatever the current status.
pub fn authorize_transition(
    actor: Participant,
    current: VisitStatus,
    next: VisitStatus,
) -> Result<(), CoreError> {
    if !actor_may_set(actor, next) {
        return Err(CoreError::access_denied());
    }
    validate_transition(current, next)
}

/// Validate a rating value.
pub fn validate_note(note: f64) -> Result<(), CoreError> {
    if !note.is_finite() || !(MIN_NOTE..=MAX_NOTE).contains(&note) {
        return Err(CoreError::Validation(format!(
            "Note must be between {MIN_NOTE} and {MAX_NOTE}"
        )));
    }
    Ok(())
}

/// What a partial visit update will write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisitUpdate {
    pub status: Option<VisitStatus>,
    pub note: Option<f64>,
}

/// Validate a `{status?, note?}` patch from `actor` against the locked row's
/// `current` status.
///
/// A note may only come from the prospect, and only once the visit is done
/// (or becomes done in the same patch).
pub fn plan_update(
    actor: Participant,
    current: VisitStatus,
    status: Option<VisitStatus>,
    note: Option<f64>,
) -> Result<VisitUpdate, CoreError> {
    if status.is_none() && note.is_none() {
        return Err(CoreError::Validation("Nothing to update".into()));
    }

    if let Some(next) = status {
        authorize_transition(actor, current, next)?;
    }

    if let Some(value) = note {
        if actor != Participant::Prospect {
            return Err(CoreError::access_denied());
        }
        validate_note(value)?;
        let effective = status.unwrap_or(current);
        if effective != VisitStatus::Done {
            return Err(CoreError::Conflict(
                "A visit can only be rated once it is DONE".into(),
            ));
        }
    }

    Ok(VisitUpdate { status, note })
}

/// Decide what cancelling a visit in `current` does.
///
/// Returns `None` when the visit is already cancelled, so repeating the
/// request is harmless. Completed or rejected visits cannot be cancelled.
pub fn plan_cancel(current: VisitStatus) -> Result<Option<VisitStatus>, CoreError> {
    if current == VisitStatus::Cancelled {
        return Ok(None);
    }
    validate_transition(current, VisitStatus::Cancelled)?;
    Ok(Some(VisitStatus::Cancelled))
}

/// Which page of the caller's visit list to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Upcoming,
    Passed,
}

impl FromStr for ListType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(ListType::Upcoming),
            "passed" => Ok(ListType::Passed),
            other => Err(CoreError::Validation(format!(
                "Invalid list type '{other}'. Must be 'upcoming' or 'passed'"
            ))),
        }
    }
}

impl ListType {
    pub fn includes(self, status: VisitStatus) -> bool {
        match self {
            ListType::Upcoming => status.is_upcoming(),
            ListType::Passed => !status.is_upcoming(),
        }
    }
}

// ---------------------------------------------------------------------------
// New visit input
// ---------------------------------------------------------------------------

/// Where a new visit takes place, as supplied by the prospect.
#[derive(Debug, Clone, PartialEq)]
pub enum VisitLocation {
    /// Coordinates given directly, optionally with the place they came from.
    Point {
        place_id: Option<String>,
        point: GeoPoint,
    },
    /// Only a place id; coordinates must be resolved.
    Place(String),
}

/// Accept either a place id or a full coordinate pair.
pub fn visit_location(
    place_id: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<VisitLocation, CoreError> {
    let place_id = place_id.filter(|p| !p.trim().is_empty());
    match (latitude, longitude) {
        (Some(lat), Some(lng)) => Ok(VisitLocation::Point {
            place_id,
            point: GeoPoint::new(lat, lng)?,
        }),
        (Some(_), None) | (None, Some(_)) => Err(CoreError::Validation(
            "Both latitude and longitude are required".into(),
        )),
        (None, None) => place_id.map(VisitLocation::Place).ok_or_else(|| {
            CoreError::Validation("A place_id or coordinates are required".into())
        }),
    }
}

pub fn validate_price(price: f64) -> Result<(), CoreError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(CoreError::Validation("Price must be greater than zero".into()));
    }
    Ok(())
}

/// End of a visit given its start and the service duration.
pub fn end_time(start: Timestamp, duration_minutes: i32) -> Timestamp {
    start + Duration::minutes(i64::from(duration_minutes))
}
