//! Repository for the `availabilities` table.

use sqlx::PgPool;
use voyo_core::types::DbId;

use crate::models::availability::{Availability, CreateAvailability};

const COLUMNS: &str =
    "id, owner_phone, anchor, duration_minutes, recurrence, created_at, updated_at";

/// Stores recurring availability windows. Writes are scoped to the owner's
/// phone number so a provider can only touch their own rows.
pub struct AvailabilityRepo;

impl AvailabilityRepo {
    pub async fn create(
        pool: &PgPool,
        owner_phone: &str,
        input: &CreateAvailability,
    ) -> Result<Availability, sqlx::Error> {
        let query = format!(
            "INSERT INTO availabilities (owner_phone, anchor, duration_minutes, recurrence) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Availability>(&query)
            .bind(owner_phone)
            .bind(input.anchor)
            .bind(input.duration_minutes)
            .bind(&input.recurrence)
            .fetch_one(pool)
            .await
    }

    /// All windows of one provider, oldest first.
    pub async fn list_for_provider(
        pool: &PgPool,
        owner_phone: &str,
    ) -> Result<Vec<Availability>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM availabilities WHERE owner_phone = $1 ORDER BY anchor, id"
        );
        sqlx::query_as::<_, Availability>(&query)
            .bind(owner_phone)
            .fetch_all(pool)
            .await
    }

    /// All windows of several providers in one round-trip.
    pub async fn list_for_providers(
        pool: &PgPool,
        owner_phones: &[String],
    ) -> Result<Vec<Availability>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM availabilities WHERE owner_phone = ANY($1) ORDER BY id"
        );
        sqlx::query_as::<_, Availability>(&query)
            .bind(owner_phones)
            .fetch_all(pool)
            .await
    }

    /// Replace a window. Returns `None` if it does not exist or belongs to
    /// someone else.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner_phone: &str,
        input: &CreateAvailability,
    ) -> Result<Option<Availability>, sqlx::Error> {
        let query = format!(
            "UPDATE availabilities SET \
                anchor = $3, \
                duration_minutes = $4, \
                recurrence = $5 \
             WHERE id = $1 AND owner_phone = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Availability>(&query)
            .bind(id)
            .bind(owner_phone)
            .bind(input.anchor)
            .bind(input.duration_minutes)
            .bind(&input.recurrence)
            .fetch_optional(pool)
            .await
    }

    /// Delete a window owned by `owner_phone`. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, owner_phone: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM availabilities WHERE id = $1 AND owner_phone = $2")
            .bind(id)
            .bind(owner_phone)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
