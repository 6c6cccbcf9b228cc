//! Counters for the home screen.

use sqlx::PgPool;
use voyo_core::types::Timestamp;

use crate::models::stats::{ProspectStats, VisitorStats};

pub struct StatsRepo;

impl StatsRepo {
    /// Counters seen by a prospect. "Upcoming" means pending or accepted
    /// and starting after `now`.
    pub async fn for_prospect(
        pool: &PgPool,
        phone: &str,
        now: Timestamp,
    ) -> Result<ProspectStats, sqlx::Error> {
        sqlx::query_as::<_, ProspectStats>(
            "SELECT \
                COUNT(*) FILTER (WHERE status IN ('PENDING', 'ACCEPTED') AND start_time > $2) \
                    AS upcoming_visits, \
                COUNT(*) FILTER (WHERE status = 'DONE') AS visits_done, \
                COUNT(*) FILTER (WHERE status = 'DONE' AND note IS NULL) AS awaiting_review \
             FROM visits \
             WHERE prospect_phone = $1",
        )
        .bind(phone)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    /// Counters seen by a visitor.
    pub async fn for_visitor(
        pool: &PgPool,
        phone: &str,
        now: Timestamp,
    ) -> Result<VisitorStats, sqlx::Error> {
        sqlx::query_as::<_, VisitorStats>(
            "SELECT \
                COUNT(*) FILTER (WHERE status IN ('PENDING', 'ACCEPTED') AND start_time > $2) \
                    AS upcoming_visits, \
                COUNT(*) FILTER (WHERE status = 'PENDING') AS awaiting_approval, \
                COUNT(*) FILTER (WHERE status = 'DONE' AND note IS NULL) AS awaiting_review \
             FROM visits \
             WHERE visitor_phone = $1",
        )
        .bind(phone)
        .bind(now)
        .fetch_one(pool)
        .await
    }
}
