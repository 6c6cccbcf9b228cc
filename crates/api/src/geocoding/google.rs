//! Google Geocoding `place_id` lookups with exponential-backoff retry.
//!
//! Transport failures, non-2xx responses and transient API statuses are
//! retried after 1 s and 2 s. An unknown place id is answered immediately.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use voyo_core::geo::GeoPoint;
use voyo_core::geo_directory::{GeoDirectory, GeoError, ResolvedPlace};

/// Delays before each retry (exponential backoff: 1s, 2s).
const RETRY_DELAYS_SECS: [u64; 2] = [1, 2];

const GEOCODE_PATH: &str = "/maps/api/geocode/json";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Failure of a single lookup attempt.
#[derive(Debug, thiserror::Error)]
enum LookupError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Geocoding returned HTTP {0}")]
    HttpStatus(u16),

    /// The provider answered with a non-`OK` API status.
    #[error("Geocoding status {status}: {message}")]
    Status { status: String, message: String },

    /// The provider has no result for the place id.
    #[error("No result")]
    NotFound,
}

impl LookupError {
    fn is_retryable(&self) -> bool {
        match self {
            LookupError::Request(_) | LookupError::HttpStatus(_) => true,
            LookupError::Status { status, .. } => {
                matches!(status.as_str(), "OVER_QUERY_LIMIT" | "UNKNOWN_ERROR")
            }
            LookupError::NotFound => false,
        }
    }

    fn into_geo_error(self, place_id: &str) -> GeoError {
        match self {
            LookupError::NotFound => GeoError::NotFound(place_id.to_string()),
            other => GeoError::Upstream(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Turn a decoded response into a resolved place or a lookup error.
fn interpret(place_id: &str, response: GeocodeResponse) -> Result<ResolvedPlace, LookupError> {
    match response.status.as_str() {
        "OK" => {}
        // INVALID_REQUEST is what Google answers for a malformed place id.
        "ZERO_RESULTS" | "NOT_FOUND" | "INVALID_REQUEST" => return Err(LookupError::NotFound),
        _ => {
            return Err(LookupError::Status {
                status: response.status,
                message: response.error_message.unwrap_or_default(),
            })
        }
    }

    let first = response
        .results
        .into_iter()
        .next()
        .ok_or(LookupError::NotFound)?;
    let location = GeoPoint::new(first.geometry.location.lat, first.geometry.location.lng)
        .map_err(|e| LookupError::Status {
            status: "INVALID_COORDINATES".into(),
            message: e.to_string(),
        })?;

    // Keyed by the requested id so the cache answers the same question next time.
    Ok(ResolvedPlace {
        place_id: place_id.to_string(),
        location,
        formatted_address: first.formatted_address,
    })
}

// ---------------------------------------------------------------------------
// GoogleGeocoder
// ---------------------------------------------------------------------------

/// Resolves place ids with the Google Geocoding API.
pub struct GoogleGeocoder {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GoogleGeocoder {
    /// Create a geocoder with a pre-configured HTTP client.
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Execute a single lookup.
    async fn try_lookup(&self, place_id: &str) -> Result<ResolvedPlace, LookupError> {
        let url = format!("{}{GEOCODE_PATH}", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("place_id", place_id), ("key", self.api_key.as_str())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(LookupError::HttpStatus(response.status().as_u16()));
        }
        let body: GeocodeResponse = response.json().await?;
        interpret(place_id, body)
    }
}

#[async_trait]
impl GeoDirectory for GoogleGeocoder {
    async fn resolve(&self, place_id: &str) -> Result<ResolvedPlace, GeoError> {
        for (attempt, delay_secs) in RETRY_DELAYS_SECS.iter().enumerate() {
            match self.try_lookup(place_id).await {
                Ok(place) => return Ok(place),
                Err(e) if e.is_retryable() => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        place_id,
                        error = %e,
                        "Geocoding attempt failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_secs(*delay_secs)).await;
                }
                Err(e) => return Err(e.into_geo_error(place_id)),
            }
        }

        // Final attempt after the last backoff.
        self.try_lookup(place_id).await.map_err(|e| {
            if e.is_retryable() {
                tracing::error!(place_id, error = %e, "Geocoding failed after all retries");
            }
            e.into_geo_error(place_id)
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
