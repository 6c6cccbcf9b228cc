use std::time::Duration;

use voyo_core::matching::MatchConfig;
use voyo_db::PoolSettings;

use crate::auth::jwt::JwtConfig;
use crate::geocoding::GeocodingConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the JWT
/// secret. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Place resolution provider settings.
    pub geocoding: GeocodingConfig,
    /// Distance rounding and fallback size for the availability search.
    pub search: MatchConfig,
    /// Connection pool limits and timeouts.
    pub pool: PoolSettings,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `HOST`                       | `0.0.0.0`               |
    /// | `PORT`                       | `3000`                  |
    /// | `CORS_ORIGINS`               | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                    |
    /// | `SEARCH_DISTANCE_ROUNDING_M` | `100`                   |
    /// | `SEARCH_FALLBACK_LIMIT`      | `20`                    |
    /// | `DB_MAX_CONNECTIONS`         | `20`                    |
    /// | `DB_ACQUIRE_TIMEOUT_SECS`    | `5`                     |
    /// | `DB_STATEMENT_TIMEOUT_SECS`  | `15`                    |
    ///
    /// JWT and geocoding variables are documented on [`JwtConfig::from_env`]
    /// and [`GeocodingConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let distance_rounding_m: f64 = std::env::var("SEARCH_DISTANCE_ROUNDING_M")
            .unwrap_or_else(|_| "100".into())
            .parse()
            .expect("SEARCH_DISTANCE_ROUNDING_M must be a valid number");
        assert!(
            distance_rounding_m > 0.0,
            "SEARCH_DISTANCE_ROUNDING_M must be positive"
        );

        let fallback_limit: usize = std::env::var("SEARCH_FALLBACK_LIMIT")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("SEARCH_FALLBACK_LIMIT must be a valid usize");

        let max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let acquire_timeout_secs: u64 = std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("DB_ACQUIRE_TIMEOUT_SECS must be a valid u64");

        let statement_timeout_secs: u64 = std::env::var("DB_STATEMENT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".into())
            .parse()
            .expect("DB_STATEMENT_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            geocoding: GeocodingConfig::from_env(),
            search: MatchConfig {
                distance_rounding_m,
                fallback_limit,
            },
            pool: PoolSettings {
                max_connections,
                acquire_timeout: Duration::from_secs(acquire_timeout_secs),
                statement_timeout: Duration::from_secs(statement_timeout_secs),
            },
        }
    }
}
