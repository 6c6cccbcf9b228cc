//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use voyo_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub role_id: DbId,
    pub biography: Option<String>,
    pub profile_picture: Option<String>,
    pub pricing: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a user. Accounts are provisioned by the sign-up flow,
/// which lives outside this service.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub role_id: DbId,
    pub biography: Option<String>,
    pub profile_picture: Option<String>,
    pub pricing: Option<f64>,
}
