//! Role entity model.

use serde::Serialize;
use sqlx::FromRow;
use voyo_core::types::{DbId, Timestamp};

/// A row from the `roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub label: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
