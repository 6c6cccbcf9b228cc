//! Seed helpers shared by the repository tests.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use voyo_core::roles::{ROLE_PROSPECT, ROLE_VISITOR};
use voyo_core::types::{DbId, Timestamp};
use voyo_db::models::provider_location::UpsertProviderLocation;
use voyo_db::models::user::{CreateUser, User};
use voyo_db::models::visit::NewVisit;
use voyo_db::repositories::{ProviderLocationRepo, RoleRepo, UserRepo};
use voyo_core::geo::GeoPoint;

pub const PROSPECT: &str = "+33600000001";
pub const VISITOR: &str = "+33600000002";
pub const OTHER_VISITOR: &str = "+33600000003";

/// Id of the seeded "Standard visit" service type (60 minutes).
pub const STANDARD_VISIT: DbId = 2;

pub async fn create_user(pool: &PgPool, phone: &str, role: &str) -> User {
    let role = RoleRepo::find_by_label(pool, role)
        .await
        .unwrap()
        .expect("role should be seeded");
    UserRepo::create(
        pool,
        &CreateUser {
            phone_number: phone.to_string(),
            first_name: format!("First {phone}"),
            last_name: "Martin".to_string(),
            email: None,
            role_id: role.id,
            biography: None,
            profile_picture: None,
            pricing: Some(40.0),
        },
    )
    .await
    .unwrap()
}

/// Seed the default prospect and visitor.
pub async fn seed_parties(pool: &PgPool) {
    create_user(pool, PROSPECT, ROLE_PROSPECT).await;
    create_user(pool, VISITOR, ROLE_VISITOR).await;
}

pub async fn set_location(pool: &PgPool, phone: &str, lat: f64, lng: f64, radius_m: f64) {
    ProviderLocationRepo::upsert(
        pool,
        phone,
        &UpsertProviderLocation {
            place_id: None,
            point: GeoPoint::new(lat, lng).unwrap(),
            radius_m,
        },
    )
    .await
    .unwrap();
}

pub fn start_time() -> Timestamp {
    Utc.with_ymd_and_hms(2030, 1, 1, 10, 0, 0).unwrap()
}

pub fn new_visit(prospect: &str, visitor: &str) -> NewVisit {
    NewVisit {
        prospect_phone: prospect.to_string(),
        visitor_phone: visitor.to_string(),
        place_id: None,
        latitude: 48.8566,
        longitude: 2.3522,
        service_type_id: STANDARD_VISIT,
        start_time: start_time(),
        price: 80.0,
        verification_code: 123_456,
    }
}
