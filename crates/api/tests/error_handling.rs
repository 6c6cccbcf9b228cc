//! Tests for `AppError` to HTTP response mapping.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use serde_json::Value;
use voyo_api::error::AppError;
use voyo_core::error::CoreError;
use voyo_core::geo_directory::GeoError;

async fn error_json(error: AppError) -> (StatusCode, Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn access_denied_maps_to_401() {
    let (status, json) = error_json(AppError::Core(CoreError::access_denied())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Unauthorized access");
}

#[tokio::test]
async fn validation_maps_to_400() {
    let (status, json) =
        error_json(AppError::Core(CoreError::Validation("Price must be greater than zero".into())))
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Price must be greater than zero");
}

#[tokio::test]
async fn conflict_maps_to_409() {
    let (status, json) = error_json(AppError::Core(CoreError::Conflict("no".into()))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn not_found_maps_to_404() {
    let (status, json) = error_json(AppError::Core(CoreError::NotFound {
        entity: "Visit",
        id: 7,
    }))
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Visit with id 7 not found");
}

#[tokio::test]
async fn bad_request_maps_to_400() {
    let (status, json) = error_json(AppError::BadRequest("start_time is required".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn internal_details_are_not_leaked() {
    let (status, json) =
        error_json(AppError::InternalError("password=hunter2 in connection string".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");

    let (status, json) = error_json(AppError::Core(CoreError::Internal("boom".into()))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn row_not_found_maps_to_404() {
    let (status, _) = error_json(AppError::Database(sqlx::Error::RowNotFound)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_place_is_a_client_error() {
    let (status, json) = error_json(AppError::Geo(GeoError::NotFound("abc".into()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Unknown place id 'abc'");
}

#[tokio::test]
async fn geocoding_outage_is_a_generic_500() {
    let (status, json) =
        error_json(AppError::Geo(GeoError::Upstream("REQUEST_DENIED: key xyz".into()))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");

    let (status, _) = error_json(AppError::Geo(GeoError::NotConfigured)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
