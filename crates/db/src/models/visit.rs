//! Visit entity model, DTOs and joined read models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use voyo_core::error::CoreError;
use voyo_core::types::{DbId, Timestamp};
use voyo_core::visit::VisitStatus;

use crate::models::criteria::CreateCriteria;

/// A row from the `visits` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Visit {
    pub id: DbId,
    pub prospect_phone: String,
    pub visitor_phone: String,
    pub place_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub service_type_id: DbId,
    pub start_time: Timestamp,
    pub price: f64,
    pub verification_code: i32,
    pub status: String,
    pub note: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Visit {
    pub fn status(&self) -> Result<VisitStatus, CoreError> {
        self.status.parse()
    }
}

/// Body of `POST /visits`.
///
/// Required fields are optional here so that a missing one is reported as a
/// validation error by the handler rather than as a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateVisit {
    pub visitor_phone: Option<String>,
    pub start_time: Option<Timestamp>,
    pub price: Option<f64>,
    pub place_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub service_type_id: Option<DbId>,
    /// Criteria written for this visit; created and linked with it.
    #[serde(default)]
    pub criteria: Vec<CreateCriteria>,
}

/// A validated visit ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub prospect_phone: String,
    pub visitor_phone: String,
    pub place_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub service_type_id: DbId,
    pub start_time: Timestamp,
    pub price: f64,
    pub verification_code: i32,
}

/// Body of `PATCH /visits/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVisit {
    pub status: Option<String>,
    pub note: Option<f64>,
}

/// A visit joined with its service type, cached address and visitor summary.
#[derive(Debug, Clone, FromRow)]
pub struct VisitDetailRow {
    pub id: DbId,
    pub prospect_phone: String,
    pub visitor_phone: String,
    pub place_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub service_type_id: DbId,
    pub service_label: String,
    pub duration_minutes: i32,
    pub start_time: Timestamp,
    pub price: f64,
    pub verification_code: i32,
    pub status: String,
    pub note: Option<f64>,
    pub formatted_address: Option<String>,
    pub criteria_sent: bool,
    pub visitor_first_name: String,
    pub visitor_last_name: String,
    pub visitor_profile_picture: Option<String>,
    pub visitor_visits_done: i64,
    pub visitor_average_rating: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One line of a participant's visit list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VisitListItem {
    pub id: DbId,
    pub start_time: Timestamp,
    pub status: String,
    pub price: f64,
    pub note: Option<f64>,
    pub service_type_id: DbId,
    pub service_label: String,
    pub duration_minutes: i32,
    pub place_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub formatted_address: Option<String>,
    pub counterpart_phone: String,
    pub counterpart_first_name: String,
    pub counterpart_last_name: String,
    pub counterpart_profile_picture: Option<String>,
}
