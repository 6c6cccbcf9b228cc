//! Participation checks answered in SQL.

use sqlx::PgPool;
use voyo_core::types::DbId;

/// Backs the route guards: a caller may reach a visit only as one of its two
/// parties, and a criteria only through a visit they can reach.
pub struct AccessRepo;

impl AccessRepo {
    /// `true` iff `phone` is the prospect or the visitor of the visit.
    pub async fn has_visit_access(
        pool: &PgPool,
        phone: &str,
        visit_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                SELECT 1 FROM visits \
                WHERE id = $1 AND (prospect_phone = $2 OR visitor_phone = $2) \
             )",
        )
        .bind(visit_id)
        .bind(phone)
        .fetch_one(pool)
        .await
    }

    /// `true` iff the criteria is linked to a visit `phone` takes part in.
    pub async fn has_criteria_access(
        pool: &PgPool,
        phone: &str,
        criteria_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                SELECT 1 FROM criteria_visit_links l \
                JOIN visits v ON v.id = l.visit_id \
                WHERE l.criteria_id = $1 \
                  AND (v.prospect_phone = $2 OR v.visitor_phone = $2) \
             )",
        )
        .bind(criteria_id)
        .bind(phone)
        .fetch_one(pool)
        .await
    }
}
