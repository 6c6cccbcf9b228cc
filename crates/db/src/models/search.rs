//! Rows loaded for the availability search.

use serde::Serialize;
use sqlx::FromRow;
use voyo_core::geo::{GeoPoint, ServiceArea};

/// A visitor with a registered service area and their rating aggregates.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProviderRow {
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_picture: Option<String>,
    pub biography: Option<String>,
    pub pricing: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
    /// Average over rated `DONE` visits; `None` when unrated.
    pub rating_average: Option<f64>,
    pub rating_count: i64,
    pub visits_done: i64,
}

impl ProviderRow {
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
