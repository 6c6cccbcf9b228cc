//! Shared harness for the HTTP integration tests: app construction, tokens,
//! request helpers and seed data.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use voyo_api::auth::jwt::{generate_access_token, JwtConfig};
use voyo_api::config::ServerConfig;
use voyo_api::geocoding::cached::CachedGeoDirectory;
use voyo_api::geocoding::GeocodingConfig;
use voyo_api::router::build_app_router;
use voyo_api::state::AppState;
use voyo_core::geo::GeoPoint;
use voyo_core::geo_directory::{GeoDirectory, GeoError, ResolvedPlace};
use voyo_core::matching::MatchConfig;
use voyo_core::roles::{ROLE_ADMIN, ROLE_PROSPECT, ROLE_VISITOR};
use voyo_db::models::user::{CreateUser, User};
use voyo_db::repositories::{RoleRepo, UserRepo};
use voyo_db::PoolSettings;

pub const PROSPECT: &str = "+33600000001";
pub const VISITOR: &str = "+33600000002";
pub const OTHER_VISITOR: &str = "+33600000003";
pub const OTHER_PROSPECT: &str = "+33600000004";
pub const ADMIN: &str = "+33600000009";

/// Id of the seeded "Standard" service type (60 minutes).
pub const STANDARD_VISIT: i64 = 2;

/// Place id known to [`StubGeo`].
pub const LOUVRE_PLACE_ID: &str = "place-louvre";
pub const LOUVRE_ADDRESS: &str = "Rue de Rivoli, 75001 Paris, France";
pub const LOUVRE: (f64, f64) = (48.8606, 2.3376);

/// Central Paris, where the test visits take place.
pub const PARIS: (f64, f64) = (48.8566, 2.3522);

/// Start of the visits booked by the tests (a Tuesday).
pub const VISIT_START: &str = "2030-01-01T10:00:00Z";
pub const SEARCH_DATE: &str = "2030-01-01T10:00:00";

/// Geocoder answering for a single place.
pub struct StubGeo;

#[async_trait]
impl GeoDirectory for StubGeo {
    async fn resolve(&self, place_id: &str) -> Result<ResolvedPlace, GeoError> {
        if place_id != LOUVRE_PLACE_ID {
            return Err(GeoError::NotFound(place_id.to_string()));
        }
        Ok(ResolvedPlace {
            place_id: place_id.to_string(),
            location: GeoPoint::new(LOUVRE.0, LOUVRE.1).unwrap(),
            formatted_address: LOUVRE_ADDRESS.to_string(),
        })
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        geocoding: GeocodingConfig {
            api_key: None,
            base_url: "http://localhost:0".to_string(),
            timeout_secs: 1,
        },
        search: MatchConfig::default(),
        pool: PoolSettings::default(),
    }
}

/// Build the full application router, with [`StubGeo`] behind the database
/// cache.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let geo: Arc<dyn GeoDirectory> =
        Arc::new(CachedGeoDirectory::new(pool.clone(), Arc::new(StubGeo)));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        geo,
    };

    build_app_router(state, &config)
}

/// A valid access token for `phone` with `role`.
pub fn token(phone: &str, role: &str) -> String {
    generate_access_token(phone, role, &test_config().jwt).expect("token generation")
}

pub fn prospect_token() -> String {
    token(PROSPECT, ROLE_PROSPECT)
}

pub fn visitor_token() -> String {
    token(VISITOR, ROLE_VISITOR)
}

pub fn admin_token() -> String {
    token(ADMIN, ROLE_ADMIN)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Send one request through the app.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the uniform access error.
pub async fn assert_access_denied(response: Response<Body>) {
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Unauthorized access");
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, phone: &str, role: &str) -> User {
    let role = RoleRepo::find_by_label(pool, role)
        .await
        .unwrap()
        .expect("role should be seeded");
    UserRepo::create(
        pool,
        &CreateUser {
            phone_number: phone.to_string(),
            first_name: "Camille".to_string(),
            last_name: "durand".to_string(),
            email: None,
            role_id: role.id,
            biography: Some("Ten years of Paris flats".to_string()),
            profile_picture: None,
            pricing: Some(45.0),
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

/// Give `phone` a service area through the API.
pub async fn set_location(app: Router, token: &str, lat: f64, lng: f64, radius_m: f64) {
    let response = put_json(
        app,
        "/api/v1/users/me/location",
        token,
        serde_json::json!({ "latitude": lat, "longitude": lng, "radius_m": radius_m }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Add a daily 09:00-12:00 window through the API.
pub async fn add_morning_window(app: Router, token: &str) {
    let response = post_json(
        app,
        "/api/v1/availability",
        token,
        serde_json::json!({
            "anchor": "2029-12-31T09:00:00",
            "duration_minutes": 180,
            "recurrence": "DAILY",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Body of a valid booking with [`VISITOR`] in central Paris.
pub fn visit_body() -> Value {
    serde_json::json!({
        "visitor_phone": VISITOR,
        "start_time": VISIT_START,
        "price": 80.0,
        "latitude": PARIS.0,
        "longitude": PARIS.1,
        "service_type_id": STANDARD_VISIT,
    })
}

/// Book a visit as [`PROSPECT`] and return its id.
pub async fn create_visit(app: Router) -> i64 {
    let response = post_json(app, "/api/v1/visits", &prospect_token(), visit_body()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Move a visit to `status` as the given caller.
pub async fn set_status(app: Router, id: i64, token: &str, status: &str) -> StatusCode {
    patch_json(
        app,
        &format!("/api/v1/visits/{id}"),
        token,
        serde_json::json!({ "status": status }),
    )
    .await
    .status()
}

/// Read the code as the prospect.
pub async fn fetch_code(app: Router, id: i64) -> i64 {
    let response = get_auth(app, &format!("/api/v1/visits/{id}/code"), &prospect_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["code"].as_i64().unwrap()
}
