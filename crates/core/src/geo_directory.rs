//! Place resolution seam.
//!
//! Visits and provider locations may reference a place by an opaque
//! provider-issued identifier. A [`GeoDirectory`] turns that identifier into
//! coordinates and a human-readable address.

use async_trait::async_trait;
use serde::Serialize;

use crate::geo::GeoPoint;

/// A place identifier resolved to coordinates and a formatted address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPlace {
    pub place_id: String,
    pub location: GeoPoint,
    pub formatted_address: String,
}

/// Error type for place resolution failures.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// The provider has no result for this place id.
    #[error("No geocoding result for place '{0}'")]
    NotFound(String),

    /// The provider could not be reached or answered with an error status.
    #[error("Geocoding provider error: {0}")]
    Upstream(String),

    /// No provider is configured (e.g. missing API key).
    #[error("Geocoding is not configured")]
    NotConfigured,
}

#[async_trait]
pub trait GeoDirectory: Send + Sync {
    /// Resolve a place identifier.
    async fn resolve(&self, place_id: &str) -> Result<ResolvedPlace, GeoError>;

    async fn resolve_coordinates(&self, place_id: &str) -> Result<GeoPoint, GeoError> {
        Ok(self.resolve(place_id).await?.location)
    }

    async fn resolve_address(&self, place_id: &str) -> Result<String, GeoError> {
        Ok(self.resolve(place_id).await?.formatted_address)
    }
}
