//! Loads the candidate set for the availability search.

use sqlx::PgPool;
use voyo_core::geo::{GeoPoint, EARTH_RADIUS_M};
use voyo_core::roles::ROLE_VISITOR;

use crate::models::availability::Availability;
use crate::models::search::ProviderRow;
use crate::repositories::AvailabilityRepo;

/// Visitors whose service area reaches the target, with their windows.
#[derive(Debug, Clone)]
pub struct SearchCandidates {
    pub providers: Vec<ProviderRow>,
    pub availabilities: Vec<Availability>,
}

/// Provider profile, location and rating aggregates over `DONE` visits.
/// `$1` is the role label, `$2`/`$3` the target and `$4` the earth radius.
const PROVIDER_SELECT: &str = "\
    SELECT u.phone_number, u.first_name, u.last_name, u.profile_picture, \
           u.biography, u.pricing, \
           pl.latitude, pl.longitude, pl.radius_m, \
           r.rating_average, \
           COALESCE(r.rating_count, 0) AS rating_count, \
           COALESCE(r.visits_done, 0) AS visits_done \
    FROM users u \
    JOIN roles ro ON ro.id = u.role_id \
    JOIN provider_locations pl ON pl.user_phone = u.phone_number \
    CROSS JOIN LATERAL ( \
       SELECT 2 * $4::float8 * ASIN(LEAST(1, SQRT( \
           POWER(SIN(RADIANS(pl.latitude - $2::float8) / 2), 2) \
           + COS(RADIANS($2::float8)) * COS(RADIANS(pl.latitude)) \
             * POWER(SIN(RADIANS(pl.longitude - $3::float8) / 2), 2) \
       ))) AS distance_m \
    ) d \
    LEFT JOIN ( \
       SELECT visitor_phone, \
              COUNT(*) AS visits_done, \
              AVG(note) AS rating_average, \
              COUNT(note) AS rating_count \
       FROM visits \
       WHERE status = 'DONE' \
       GROUP BY visitor_phone \
    ) r ON r.visitor_phone = u.phone_number \
    WHERE ro.label = $1";

/// Slack added to the radius in SQL. The exact boundary check is done by
/// the matcher, so the database may only over-include.
const RADIUS_SLACK_M: f64 = 1.0;

pub struct SearchRepo;

impl SearchRepo {
    /// Visitors with at least one availability window whose service area
    /// contains `target`. Ordered by phone number for a stable ranking.
    pub async fn providers_in_reach(
        pool: &PgPool,
        target: GeoPoint,
    ) -> Result<Vec<ProviderRow>, sqlx::Error> {
        let query = format!(
            "{PROVIDER_SELECT} \
               AND d.distance_m <= pl.radius_m + $5 \
               AND EXISTS (SELECT 1 FROM availabilities a WHERE a.owner_phone = u.phone_number) \
             ORDER BY u.phone_number"
        );
        sqlx::query_as::<_, ProviderRow>(&query)
            .bind(ROLE_VISITOR)
            .bind(target.latitude)
            .bind(target.longitude)
            .bind(EARTH_RADIUS_M)
            .bind(RADIUS_SLACK_M)
            .fetch_all(pool)
            .await
    }

    /// The `limit` visitors nearest to `target`, ignoring service areas and
    /// availability.
    pub async fn nearest_providers(
        pool: &PgPool,
        target: GeoPoint,
        limit: usize,
    ) -> Result<Vec<ProviderRow>, sqlx::Error> {
        let query = format!("{PROVIDER_SELECT} ORDER BY d.distance_m, u.phone_number LIMIT $5");
        sqlx::query_as::<_, ProviderRow>(&query)
            .bind(ROLE_VISITOR)
            .bind(target.latitude)
            .bind(target.longitude)
            .bind(EARTH_RADIUS_M)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(pool)
            .await
    }

    /// Providers in reach of `target` plus their availability windows.
    pub async fn load_candidates(
        pool: &PgPool,
        target: GeoPoint,
    ) -> Result<SearchCandidates, sqlx::Error> {
        let providers = Self::providers_in_reach(pool, target).await?;
        let phones: Vec<String> = providers.iter().map(|p| p.phone_number.clone()).collect();
        let availabilities = if phones.is_empty() {
            Vec::new()
        } else {
            AvailabilityRepo::list_for_providers(pool, &phones).await?
        };
        tracing::debug!(
            providers = providers.len(),
            windows = availabilities.len(),
            "Loaded search candidates"
        );
        Ok(SearchCandidates {
            providers,
            availabilities,
        })
    }
}
