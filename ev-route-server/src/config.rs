//! Application configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::ocm::OcmConfig;
use crate::ors::OrsConfig;
use crate::planner::PlannerConfig;

/// Address the server binds to when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Error reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid BIND_ADDR {value:?}: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("invalid CACHE_TTL_SECS {value:?}: expected whole seconds")]
    CacheTtl { value: String },
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Origins allowed by CORS. Empty means no cross-origin access.
    pub cors_allowed_origins: Vec<String>,
    /// When set, serve from this fixture instead of the live APIs.
    pub mock_data: Option<PathBuf>,
    pub ors: OrsConfig,
    pub ocm: OcmConfig,
    pub cache: CacheConfig,
    pub planner: PlannerConfig,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    ///
    /// | Variable               | Meaning                                   |
    /// |------------------------|-------------------------------------------|
    /// | `ORS_API_KEY`          | OpenRouteService key                      |
    /// | `OCM_API_KEY`          | Open Charge Map key (optional)            |
    /// | `BIND_ADDR`            | listen address, default `127.0.0.1:8080`  |
    /// | `CORS_ALLOWED_ORIGINS` | comma-separated origins                   |
    /// | `EV_ROUTE_MOCK_DATA`   | path to a mock fixture                    |
    /// | `CACHE_TTL_SECS`       | upstream cache TTL                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_value = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .trim()
            .parse()
            .map_err(|source| ConfigError::BindAddr {
                value: bind_value.clone(),
                source,
            })?;

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let mut cache = CacheConfig::default();
        if let Some(value) = var("CACHE_TTL_SECS") {
            let secs: u64 = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::CacheTtl {
                    value: value.clone(),
                })?;
            cache = cache.with_ttl(Duration::from_secs(secs));
        }

        Ok(Self {
            bind_addr,
            cors_allowed_origins,
            mock_data: var("EV_ROUTE_MOCK_DATA").map(PathBuf::from),
            ors: OrsConfig::new(var("ORS_API_KEY").unwrap_or_default()),
            ocm: OcmConfig::new(var("OCM_API_KEY")),
            cache,
            planner: PlannerConfig::default(),
        })
    }
}
