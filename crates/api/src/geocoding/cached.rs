//! Database-backed cache in front of a [`GeoDirectory`].

use std::sync::Arc;

use async_trait::async_trait;
use voyo_core::geo_directory::{GeoDirectory, GeoError, ResolvedPlace};
use voyo_db::repositories::PlaceRepo;
use voyo_db::DbPool;

/// Answers from the `places` table when possible; otherwise asks `inner`
/// and stores the answer.
///
/// Cache read and write failures are logged and never fail a lookup.
pub struct CachedGeoDirectory {
    pool: DbPool,
    inner: Arc<dyn GeoDirectory>,
}

impl CachedGeoDirectory {
    pub fn new(pool: DbPool, inner: Arc<dyn GeoDirectory>) -> Self {
        Self { pool, inner }
    }
}

#[async_trait]
impl GeoDirectory for CachedGeoDirectory {
    async fn resolve(&self, place_id: &str) -> Result<ResolvedPlace, GeoError> {
        match PlaceRepo::find(&self.pool, place_id).await {
            Ok(Some(place)) => return Ok(place.into_resolved()),
            Ok(None) => {}
            Err(e) => tracing::warn!(place_id, error = %e, "Place cache read failed"),
        }

        let resolved = self.inner.resolve(place_id).await?;

        if let Err(e) = PlaceRepo::upsert(&self.pool, &resolved).await {
            tracing::warn!(place_id, error = %e, "Place cache write failed");
        } else {
            tracing::debug!(place_id, "Cached resolved place");
        }
        Ok(resolved)
    }
}
