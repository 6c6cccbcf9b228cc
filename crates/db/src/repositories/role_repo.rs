//! Repository for the `roles` table.

use sqlx::PgPool;

use crate::models::role::Role;

const COLUMNS: &str = "id, label, created_at, updated_at";

/// Provides read operations for roles.
pub struct RoleRepo;

impl RoleRepo {
    /// Find a role by label (case-sensitive).
    pub async fn find_by_label(pool: &PgPool, label: &str) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE label = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(label)
            .fetch_optional(pool)
            .await
    }
}
