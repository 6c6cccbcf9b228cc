//! Place resolution: a Google Geocoding client behind a Postgres cache.
//!
//! - [`google::GoogleGeocoder`] -- `place_id` lookups with retry.
//! - [`cached::CachedGeoDirectory`] -- reads and fills the `places` table
//!   around any other [`GeoDirectory`].

pub mod cached;
pub mod google;

use std::sync::Arc;

use async_trait::async_trait;
use voyo_core::geo_directory::{GeoDirectory, GeoError, ResolvedPlace};

use self::cached::CachedGeoDirectory;
use self::google::GoogleGeocoder;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Geocoding provider settings.
#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    /// Google Maps API key. Without it only cached places resolve.
    pub api_key: Option<String>,
    /// Provider origin, overridable for testing.
    pub base_url: String,
    /// Timeout of a single provider request.
    pub timeout_secs: u64,
}

impl GeocodingConfig {
    /// Load geocoding configuration from environment variables.
    ///
    /// | Env Var                  | Default                       |
    /// |--------------------------|-------------------------------|
    /// | `GOOGLE_MAPS_API_KEY`    | unset (geocoding disabled)    |
    /// | `GEOCODING_BASE_URL`     | `https://maps.googleapis.com` |
    /// | `GEOCODING_TIMEOUT_SECS` | `10`                          |
    pub fn from_env() -> Self {
        let api_key = std::env::var("GOOGLE_MAPS_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let base_url =
            std::env::var("GEOCODING_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        let timeout_secs: u64 = std::env::var("GEOCODING_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("GEOCODING_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key,
            base_url,
            timeout_secs,
        }
    }
}

/// Stand-in provider used when no API key is configured.
pub struct Unconfigured;

#[async_trait]
impl GeoDirectory for Unconfigured {
    async fn resolve(&self, _place_id: &str) -> Result<ResolvedPlace, GeoError> {
        Err(GeoError::NotConfigured)
    }
}

/// Build the directory used by the server: the Google client (or
/// [`Unconfigured`]) wrapped in the database cache.
pub fn build_geo_directory(config: &GeocodingConfig, pool: voyo_db::DbPool) -> Arc<dyn GeoDirectory> {
    let inner: Arc<dyn GeoDirectory> = match &config.api_key {
        Some(key) => Arc::new(GoogleGeocoder::new(
            key.clone(),
            config.base_url.clone(),
            std::time::Duration::from_secs(config.timeout_secs),
        )),
        None => {
            tracing::warn!("GOOGLE_MAPS_API_KEY not set, only cached places will resolve");
            Arc::new(Unconfigured)
        }
    };
    Arc::new(CachedGeoDirectory::new(pool, inner))
}
