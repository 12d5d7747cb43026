//! OpenRouteService client error types.

use crate::providers::ProviderError;

use super::PROVIDER;

/// Errors from the OpenRouteService HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum OrsError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid API key
    #[error("unauthorized: check ORS_API_KEY")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by OpenRouteService")]
    RateLimited,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("JSON parse error: {message}")]
    Json { message: String },
}

impl From<OrsError> for ProviderError {
    fn from(err: OrsError) -> Self {
        ProviderError::Upstream {
            provider: PROVIDER,
            message: err.to_string(),
        }
    }
}
