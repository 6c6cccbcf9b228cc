//! Cached geocoding results.

use serde::Serialize;
use sqlx::FromRow;
use voyo_core::geo::GeoPoint;
use voyo_core::geo_directory::ResolvedPlace;
use voyo_core::types::Timestamp;

/// A row from the `places` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Place {
    pub place_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,
    pub resolved_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Place {
    pub fn into_resolved(self) -> ResolvedPlace {
        ResolvedPlace {
            place_id: self.place_id,
            location: GeoPoint {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            formatted_address: self.formatted_address,
        }
    }
}
