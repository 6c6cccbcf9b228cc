//! Repository for the `service_types` table.

use sqlx::PgPool;
use voyo_core::types::DbId;

use crate::models::service_type::ServiceType;

const COLUMNS: &str = "id, label, duration_minutes, created_at, updated_at";

pub struct ServiceTypeRepo;

impl ServiceTypeRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ServiceType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM service_types WHERE id = $1");
        sqlx::query_as::<_, ServiceType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all service types, shortest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ServiceType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM service_types ORDER BY duration_minutes, id");
        sqlx::query_as::<_, ServiceType>(&query).fetch_all(pool).await
    }
}
