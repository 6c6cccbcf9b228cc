//! Repository for the `visits` table.

use sqlx::PgPool;
use voyo_core::access::Participant;
use voyo_core::types::DbId;
use voyo_core::visit::{ListType, VisitStatus, UPCOMING_STATUSES};

use crate::models::criteria::{CreateCriteria, Criteria};
use crate::models::visit::{NewVisit, Visit, VisitDetailRow, VisitListItem};
use crate::repositories::{CriteriaRepo, PgTransaction};

/// Column list for `visits` queries.
const COLUMNS: &str = "id, prospect_phone, visitor_phone, place_id, latitude, longitude, \
    service_type_id, start_time, price, verification_code, status, note, created_at, updated_at";

/// Provides persistence for visits and the row locking used by status changes.
pub struct VisitRepo;

impl VisitRepo {
    /// Insert a visit, its criteria and the links between them in one
    /// transaction. Any failure rolls back every row.
    pub async fn create_with_criteria(
        pool: &PgPool,
        input: &NewVisit,
        criteria: &[CreateCriteria],
    ) -> Result<(Visit, Vec<Criteria>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO visits \
                (prospect_phone, visitor_phone, place_id, latitude, longitude, \
                 service_type_id, start_time, price, verification_code, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        let visit = sqlx::query_as::<_, Visit>(&query)
            .bind(&input.prospect_phone)
            .bind(&input.visitor_phone)
            .bind(&input.place_id)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.service_type_id)
            .bind(input.start_time)
            .bind(input.price)
            .bind(input.verification_code)
            .bind(VisitStatus::Pending.as_str())
            .fetch_one(&mut *tx)
            .await?;

        let mut created = Vec::with_capacity(criteria.len());
        for item in criteria {
            let row = CriteriaRepo::insert_in_tx(&mut tx, &input.prospect_phone, item).await?;
            CriteriaRepo::link(&mut tx, row.id, visit.id).await?;
            created.push(row);
        }

        tx.commit().await?;
        Ok((visit, created))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Visit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM visits WHERE id = $1");
        sqlx::query_as::<_, Visit>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every visit, newest start first. Admin only.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Visit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM visits ORDER BY start_time DESC, id DESC");
        sqlx::query_as::<_, Visit>(&query).fetch_all(pool).await
    }

    /// Visit joined with its service type, cached address and visitor summary.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<VisitDetailRow>, sqlx::Error> {
        sqlx::query_as::<_, VisitDetailRow>(
            "SELECT v.id, v.prospect_phone, v.visitor_phone, v.place_id, v.latitude, v.longitude, \
                    v.service_type_id, st.label AS service_label, st.duration_minutes, \
                    v.start_time, v.price, v.verification_code, v.status, v.note, \
                    p.formatted_address, \
                    EXISTS (SELECT 1 FROM criteria_visit_links l WHERE l.visit_id = v.id) \
                        AS criteria_sent, \
                    u.first_name AS visitor_first_name, \
                    u.last_name AS visitor_last_name, \
                    u.profile_picture AS visitor_profile_picture, \
                    (SELECT COUNT(*) FROM visits d \
                        WHERE d.visitor_phone = v.visitor_phone AND d.status = 'DONE') \
                        AS visitor_visits_done, \
                    (SELECT AVG(d.note) FROM visits d \
                        WHERE d.visitor_phone = v.visitor_phone AND d.status = 'DONE' \
                          AND d.note IS NOT NULL) \
                        AS visitor_average_rating, \
                    v.created_at, v.updated_at \
             FROM visits v \
             JOIN service_types st ON st.id = v.service_type_id \
             JOIN users u ON u.phone_number = v.visitor_phone \
             LEFT JOIN places p ON p.place_id = v.place_id \
             WHERE v.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Visits where `phone` is on the given `side`, filtered to upcoming or
    /// passed ones and ordered by start time.
    pub async fn list_for_participant(
        pool: &PgPool,
        phone: &str,
        side: Participant,
        list: ListType,
    ) -> Result<Vec<VisitListItem>, sqlx::Error> {
        let (own, other) = match side {
            Participant::Prospect => ("prospect_phone", "visitor_phone"),
            Participant::Visitor => ("visitor_phone", "prospect_phone"),
        };
        let status_filter = match list {
            ListType::Upcoming => "v.status = ANY($2)",
            ListType::Passed => "NOT (v.status = ANY($2))",
        };
        let query = format!(
            "SELECT v.id, v.start_time, v.status, v.price, v.note, \
                    v.service_type_id, st.label AS service_label, st.duration_minutes, \
                    v.place_id, v.latitude, v.longitude, p.formatted_address, \
                    c.phone_number AS counterpart_phone, \
                    c.first_name AS counterpart_first_name, \
                    c.last_name AS counterpart_last_name, \
                    c.profile_picture AS counterpart_profile_picture \
             FROM visits v \
             JOIN service_types st ON st.id = v.service_type_id \
             JOIN users c ON c.phone_number = v.{other} \
             LEFT JOIN places p ON p.place_id = v.place_id \
             WHERE v.{own} = $1 AND {status_filter} \
             ORDER BY v.start_time, v.id"
        );
        sqlx::query_as::<_, VisitListItem>(&query)
            .bind(phone)
            .bind(UPCOMING_STATUSES)
            .fetch_all(pool)
            .await
    }

    /// Load and lock a visit row for the rest of the transaction.
    pub async fn lock(tx: &mut PgTransaction<'_>, id: DbId) -> Result<Option<Visit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM visits WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Visit>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Write a status and/or note on a locked row. `None` leaves the column as is.
    pub async fn apply_update(
        tx: &mut PgTransaction<'_>,
        id: DbId,
        status: Option<VisitStatus>,
        note: Option<f64>,
    ) -> Result<Visit, sqlx::Error> {
        let query = format!(
            "UPDATE visits SET \
                status = COALESCE($2, status), \
                note = COALESCE($3, note) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Visit>(&query)
            .bind(id)
            .bind(status.map(VisitStatus::as_str))
            .bind(note)
            .fetch_one(&mut **tx)
            .await
    }
}
