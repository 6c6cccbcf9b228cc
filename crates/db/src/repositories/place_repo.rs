//! Repository for the `places` geocoding cache.

use sqlx::PgPool;
use voyo_core::geo_directory::ResolvedPlace;

use crate::models::place::Place;

const COLUMNS: &str =
    "place_id, latitude, longitude, formatted_address, resolved_at, created_at, updated_at";

pub struct PlaceRepo;

impl PlaceRepo {
    pub async fn find(pool: &PgPool, place_id: &str) -> Result<Option<Place>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM places WHERE place_id = $1");
        sqlx::query_as::<_, Place>(&query)
            .bind(place_id)
            .fetch_optional(pool)
            .await
    }

    /// Store a resolution, refreshing an existing entry.
    pub async fn upsert(pool: &PgPool, place: &ResolvedPlace) -> Result<Place, sqlx::Error> {
        let query = format!(
            "INSERT INTO places (place_id, latitude, longitude, formatted_address) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (place_id) DO UPDATE SET \
                latitude = EXCLUDED.latitude, \
                longitude = EXCLUDED.longitude, \
                formatted_address = EXCLUDED.formatted_address, \
                resolved_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Place>(&query)
            .bind(&place.place_id)
            .bind(place.location.latitude)
            .bind(place.location.longitude)
            .bind(&place.formatted_address)
            .fetch_one(pool)
            .await
    }
}
