//! Service type entity model.

use serde::Serialize;
use sqlx::FromRow;
use voyo_core::types::{DbId, Timestamp};

/// A row from the `service_types` table. `duration_minutes` is the length
/// of every visit of this kind.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServiceType {
    pub id: DbId,
    pub label: String,
    pub duration_minutes: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
