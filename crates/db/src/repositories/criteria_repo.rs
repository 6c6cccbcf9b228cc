//! Repository for the `criteria` and `criteria_visit_links` tables.

use sqlx::PgPool;
use voyo_core::types::DbId;

use crate::models::criteria::{CreateCriteria, Criteria, UpdateCriteria};
use crate::repositories::PgTransaction;

const COLUMNS: &str = "id, owner_phone, prompt, expected_answer, photo_required, photo, \
    video_required, video, reusable, created_at, updated_at";

/// Same columns qualified with the `c` alias, for joins.
const C_COLUMNS: &str = "c.id, c.owner_phone, c.prompt, c.expected_answer, c.photo_required, \
    c.photo, c.video_required, c.video, c.reusable, c.created_at, c.updated_at";

/// Provides CRUD operations for criteria and their visit links.
pub struct CriteriaRepo;

impl CriteriaRepo {
    /// Insert a standalone criteria.
    pub async fn create(
        pool: &PgPool,
        owner_phone: &str,
        input: &CreateCriteria,
    ) -> Result<Criteria, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let criteria = Self::insert_in_tx(&mut tx, owner_phone, input).await?;
        tx.commit().await?;
        Ok(criteria)
    }

    /// Insert a criteria inside a caller-held transaction.
    pub async fn insert_in_tx(
        tx: &mut PgTransaction<'_>,
        owner_phone: &str,
        input: &CreateCriteria,
    ) -> Result<Criteria, sqlx::Error> {
        let query = format!(
            "INSERT INTO criteria \
                (owner_phone, prompt, expected_answer, photo_required, video_required, reusable) \
             VALUES ($1, $2, $3, COALESCE($4, false), COALESCE($5, false), COALESCE($6, false)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Criteria>(&query)
            .bind(owner_phone)
            .bind(&input.prompt)
            .bind(&input.expected_answer)
            .bind(input.photo_required)
            .bind(input.video_required)
            .bind(input.reusable)
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Criteria>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM criteria WHERE id = $1");
        sqlx::query_as::<_, Criteria>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Criteria written by `owner_phone`, newest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_phone: &str,
    ) -> Result<Vec<Criteria>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM criteria WHERE owner_phone = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Criteria>(&query)
            .bind(owner_phone)
            .fetch_all(pool)
            .await
    }

    /// Criteria attached to a visit.
    pub async fn list_for_visit(pool: &PgPool, visit_id: DbId) -> Result<Vec<Criteria>, sqlx::Error> {
        let query = format!(
            "SELECT {C_COLUMNS} FROM criteria c \
             JOIN criteria_visit_links l ON l.criteria_id = c.id \
             WHERE l.visit_id = $1 \
             ORDER BY c.id"
        );
        sqlx::query_as::<_, Criteria>(&query)
            .bind(visit_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update inside a caller-held transaction. Only
    /// non-`None` fields are written.
    pub async fn update(
        tx: &mut PgTransaction<'_>,
        id: DbId,
        input: &UpdateCriteria,
    ) -> Result<Option<Criteria>, sqlx::Error> {
        let query = format!(
            "UPDATE criteria SET \
                prompt = COALESCE($2, prompt), \
                expected_answer = COALESCE($3, expected_answer), \
                photo_required = COALESCE($4, photo_required), \
                photo = COALESCE($5, photo), \
                video_required = COALESCE($6, video_required), \
                video = COALESCE($7, video), \
                reusable = COALESCE($8, reusable) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Criteria>(&query)
            .bind(id)
            .bind(&input.prompt)
            .bind(&input.expected_answer)
            .bind(input.photo_required)
            .bind(&input.photo)
            .bind(input.video_required)
            .bind(&input.video)
            .bind(input.reusable)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Delete a criteria. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM criteria WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// `true` if the criteria is linked to any visit.
    pub async fn is_linked(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM criteria_visit_links WHERE criteria_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Number of visits the criteria is attached to.
    pub async fn link_count(tx: &mut PgTransaction<'_>, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM criteria_visit_links WHERE criteria_id = $1",
        )
        .bind(id)
        .fetch_one(&mut **tx)
        .await
    }

    /// Lock the criteria row for the rest of the transaction.
    pub async fn lock(
        tx: &mut PgTransaction<'_>,
        id: DbId,
    ) -> Result<Option<Criteria>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM criteria WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Criteria>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// `true` if the criteria is linked to a visit other than `visit_id`.
    pub async fn linked_to_other_visit(
        tx: &mut PgTransaction<'_>,
        criteria_id: DbId,
        visit_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                SELECT 1 FROM criteria_visit_links \
                WHERE criteria_id = $1 AND visit_id <> $2 \
             )",
        )
        .bind(criteria_id)
        .bind(visit_id)
        .fetch_one(&mut **tx)
        .await
    }

    /// Link a criteria to a visit. Linking twice is a no-op.
    pub async fn link(
        tx: &mut PgTransaction<'_>,
        criteria_id: DbId,
        visit_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO criteria_visit_links (criteria_id, visit_id) VALUES ($1, $2) \
             ON CONFLICT (criteria_id, visit_id) DO NOTHING",
        )
        .bind(criteria_id)
        .bind(visit_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Detach a criteria from a visit. Returns `true` if a link was removed.
    pub async fn unlink(pool: &PgPool, criteria_id: DbId, visit_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM criteria_visit_links WHERE criteria_id = $1 AND visit_id = $2",
        )
        .bind(criteria_id)
        .bind(visit_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
