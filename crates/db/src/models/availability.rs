//! Availability window model and DTOs.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use voyo_core::error::CoreError;
use voyo_core::recurrence::AvailabilityWindow;
use voyo_core::types::{DbId, Timestamp};

/// A row from the `availabilities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Availability {
    pub id: DbId,
    pub owner_phone: String,
    pub anchor: NaiveDateTime,
    pub duration_minutes: i32,
    pub recurrence: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Availability {
    /// Convert the stored row into the window evaluated by the matcher.
    pub fn window(&self) -> Result<AvailabilityWindow, CoreError> {
        Ok(AvailabilityWindow::new(
            self.anchor,
            i64::from(self.duration_minutes),
            self.recurrence.parse()?,
        ))
    }
}

/// Body of `POST /availability` and `PUT /availability/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAvailability {
    /// Start of the first occurrence; its time of day is the daily slot start.
    pub anchor: NaiveDateTime,
    pub duration_minutes: i32,
    pub recurrence: String,
}
