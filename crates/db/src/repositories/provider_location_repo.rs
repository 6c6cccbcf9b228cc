//! Repository for the `provider_locations` table.

use sqlx::PgPool;

use crate::models::provider_location::{ProviderLocation, UpsertProviderLocation};

const COLUMNS: &str =
    "user_phone, place_id, latitude, longitude, radius_m, created_at, updated_at";

pub struct ProviderLocationRepo;

impl ProviderLocationRepo {
    pub async fn find_by_phone(
        pool: &PgPool,
        phone: &str,
    ) -> Result<Option<ProviderLocation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM provider_locations WHERE user_phone = $1");
        sqlx::query_as::<_, ProviderLocation>(&query)
            .bind(phone)
            .fetch_optional(pool)
            .await
    }

    /// Create or replace the provider's service area.
    pub async fn upsert(
        pool: &PgPool,
        phone: &str,
        input: &UpsertProviderLocation,
    ) -> Result<ProviderLocation, sqlx::Error> {
        let query = format!(
            "INSERT INTO provider_locations (user_phone, place_id, latitude, longitude, radius_m) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_phone) DO UPDATE SET \
                place_id = EXCLUDED.place_id, \
                latitude = EXCLUDED.latitude, \
                longitude = EXCLUDED.longitude, \
                radius_m = EXCLUDED.radius_m \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProviderLocation>(&query)
            .bind(phone)
            .bind(&input.place_id)
            .bind(input.point.latitude)
            .bind(input.point.longitude)
            .bind(input.radius_m)
            .fetch_one(pool)
            .await
    }
}
