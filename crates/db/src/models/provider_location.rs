//! Provider service area model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use voyo_core::geo::{GeoPoint, ServiceArea};
use voyo_core::types::Timestamp;

/// A row from the `provider_locations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProviderLocation {
    pub user_phone: String,
    pub place_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProviderLocation {
    pub fn service_area(&self) -> ServiceArea {
        ServiceArea::new(
            GeoPoint {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            self.radius_m,
        )
    }
}

/// Request body for `PUT /users/me/location`: either a place id or a
/// coordinate pair, plus the service radius.
#[derive(Debug, Deserialize)]
pub struct SetProviderLocation {
    pub place_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_m: f64,
}

/// Fully resolved location ready to be stored.
#[derive(Debug, Clone)]
pub struct UpsertProviderLocation {
    pub place_id: Option<String>,
    pub point: GeoPoint,
    pub radius_m: f64,
}
