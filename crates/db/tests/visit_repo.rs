//! Integration tests for visit persistence: atomic creation, listing,
//! locking updates and the participation checks.

mod common;

use assert_matches::assert_matches;
use chrono::Duration;
use sqlx::PgPool;
use voyo_core::access::Participant;
use voyo_core::roles::ROLE_VISITOR;
use voyo_core::visit::{ListType, VisitStatus};
use voyo_db::models::criteria::CreateCriteria;
use voyo_db::repositories::{AccessRepo, CriteriaRepo, VisitRepo};

use common::{create_user, new_visit, seed_parties, OTHER_VISITOR, PROSPECT, VISITOR};

fn criteria(prompt: &str) -> CreateCriteria {
    CreateCriteria {
        prompt: prompt.to_string(),
        expected_answer: None,
        photo_required: Some(true),
        video_required: None,
        reusable: None,
    }
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    n
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_links_criteria_to_visit(pool: PgPool) {
    seed_parties(&pool).await;

    let (visit, created) = VisitRepo::create_with_criteria(
        &pool,
        &new_visit(PROSPECT, VISITOR),
        &[criteria("Is the roof recent?"), criteria("Photo of the cellar")],
    )
    .await
    .unwrap();

    assert_eq!(visit.status, "PENDING");
    assert_eq!(visit.note, None);
    assert_eq!(created.len(), 2);
    assert!(created.iter().all(|c| c.owner_phone == PROSPECT));

    let linked = CriteriaRepo::list_for_visit(&pool, visit.id).await.unwrap();
    assert_eq!(linked.len(), 2);
    assert!(linked[0].photo_required);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rolls_back_when_a_criteria_insert_fails(pool: PgPool) {
    seed_parties(&pool).await;

    // The second prompt violates the non-empty CHECK after the visit row and
    // the first criteria were written.
    let result = VisitRepo::create_with_criteria(
        &pool,
        &new_visit(PROSPECT, VISITOR),
        &[criteria("Fine prompt"), criteria("   ")],
    )
    .await;

    assert!(result.is_err());
    assert_eq!(count(&pool, "visits").await, 0);
    assert_eq!(count(&pool, "criteria").await, 0);
    assert_eq!(count(&pool, "criteria_visit_links").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rejects_out_of_range_code(pool: PgPool) {
    seed_parties(&pool).await;
    let mut input = new_visit(PROSPECT, VISITOR);
    input.verification_code = 999_999;

    let result = VisitRepo::create_with_criteria(&pool, &input, &[]).await;
    assert_matches!(result, Err(sqlx::Error::Database(_)));
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_detail_includes_service_duration_and_visitor_summary(pool: PgPool) {
    seed_parties(&pool).await;
    let (visit, _) = VisitRepo::create_with_criteria(&pool, &new_visit(PROSPECT, VISITOR), &[])
        .await
        .unwrap();

    let detail = VisitRepo::find_detail(&pool, visit.id).await.unwrap().unwrap();
    assert_eq!(detail.duration_minutes, 60);
    assert_eq!(detail.visitor_last_name, "Martin");
    assert_eq!(detail.visitor_visits_done, 0);
    assert_eq!(detail.visitor_average_rating, None);
    assert!(!detail.criteria_sent);
    assert_eq!(detail.formatted_address, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_splits_upcoming_and_passed(pool: PgPool) {
    seed_parties(&pool).await;
    let (first, _) = VisitRepo::create_with_criteria(&pool, &new_visit(PROSPECT, VISITOR), &[])
        .await
        .unwrap();
    let mut later = new_visit(PROSPECT, VISITOR);
    later.start_time += Duration::days(1);
    let (second, _) = VisitRepo::create_with_criteria(&pool, &later, &[]).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    VisitRepo::apply_update(&mut tx, second.id, Some(VisitStatus::Cancelled), None)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let upcoming =
        VisitRepo::list_for_participant(&pool, PROSPECT, Participant::Prospect, ListType::Upcoming)
            .await
            .unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].id, first.id);
    assert_eq!(upcoming[0].counterpart_phone, VISITOR);

    let passed =
        VisitRepo::list_for_participant(&pool, VISITOR, Participant::Visitor, ListType::Passed)
            .await
            .unwrap();
    assert_eq!(passed.len(), 1);
    assert_eq!(passed[0].id, second.id);
    assert_eq!(passed[0].counterpart_phone, PROSPECT);
}

// ---------------------------------------------------------------------------
// Locked updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_update_keeps_unset_columns(pool: PgPool) {
    seed_parties(&pool).await;
    let (visit, _) = VisitRepo::create_with_criteria(&pool, &new_visit(PROSPECT, VISITOR), &[])
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let locked = VisitRepo::lock(&mut tx, visit.id).await.unwrap().unwrap();
    assert_eq!(locked.status().unwrap(), VisitStatus::Pending);
    VisitRepo::apply_update(&mut tx, visit.id, Some(VisitStatus::Accepted), None)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let updated = VisitRepo::apply_update(&mut tx, visit.id, None, Some(4.0))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(updated.status, "ACCEPTED");
    assert_eq!(updated.note, Some(4.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dropped_transaction_rolls_back(pool: PgPool) {
    seed_parties(&pool).await;
    let (visit, _) = VisitRepo::create_with_criteria(&pool, &new_visit(PROSPECT, VISITOR), &[])
        .await
        .unwrap();

    {
        let mut tx = pool.begin().await.unwrap();
        VisitRepo::apply_update(&mut tx, visit.id, Some(VisitStatus::Rejected), None)
            .await
            .unwrap();
    }

    let reloaded = VisitRepo::find_by_id(&pool, visit.id).await.unwrap().unwrap();
    assert_eq!(reloaded.status, "PENDING");
}

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_visit_access_is_limited_to_participants(pool: PgPool) {
    seed_parties(&pool).await;
    create_user(&pool, OTHER_VISITOR, ROLE_VISITOR).await;
    let (visit, created) = VisitRepo::create_with_criteria(
        &pool,
        &new_visit(PROSPECT, VISITOR),
        &[criteria("Check the boiler")],
    )
    .await
    .unwrap();

    assert!(AccessRepo::has_visit_access(&pool, PROSPECT, visit.id).await.unwrap());
    assert!(AccessRepo::has_visit_access(&pool, VISITOR, visit.id).await.unwrap());
    assert!(!AccessRepo::has_visit_access(&pool, OTHER_VISITOR, visit.id).await.unwrap());
    assert!(!AccessRepo::has_visit_access(&pool, PROSPECT, visit.id + 1000).await.unwrap());

    let criteria_id = created[0].id;
    assert!(AccessRepo::has_criteria_access(&pool, VISITOR, criteria_id).await.unwrap());
    assert!(!AccessRepo::has_criteria_access(&pool, OTHER_VISITOR, criteria_id).await.unwrap());
}
