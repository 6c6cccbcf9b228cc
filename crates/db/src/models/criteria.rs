//! Screening criteria model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use voyo_core::types::{DbId, Timestamp};

/// A row from the `criteria` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Criteria {
    pub id: DbId,
    pub owner_phone: String,
    pub prompt: String,
    pub expected_answer: Option<String>,
    pub photo_required: bool,
    pub photo: Option<String>,
    pub video_required: bool,
    pub video: Option<String>,
    pub reusable: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a criteria, standalone or as part of a new visit.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCriteria {
    pub prompt: String,
    pub expected_answer: Option<String>,
    pub photo_required: Option<bool>,
    pub video_required: Option<bool>,
    pub reusable: Option<bool>,
}

/// DTO for a partial criteria update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCriteria {
    pub prompt: Option<String>,
    pub expected_answer: Option<String>,
    pub photo_required: Option<bool>,
    pub photo: Option<String>,
    pub video_required: Option<bool>,
    pub video: Option<String>,
    pub reusable: Option<bool>,
}

impl UpdateCriteria {
    /// Whether anything other than the submitted media is being changed.
    pub fn touches_owner_fields(&self) -> bool {
        self.prompt.is_some()
            || self.expected_answer.is_some()
            || self.photo_required.is_some()
            || self.video_required.is_some()
            || self.reusable.is_some()
    }
}

/// Body of `POST /visits/{id}/criteria`.
#[derive(Debug, Deserialize)]
pub struct LinkCriteria {
    pub criteria_id: DbId,
}
