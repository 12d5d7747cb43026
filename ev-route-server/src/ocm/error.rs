//! Open Charge Map client error types.

use crate::providers::ProviderError;

use super::PROVIDER;

/// Errors that can occur when interacting with Open Charge Map.
#[derive(Debug, thiserror::Error)]
pub enum OcmError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check OCM_API_KEY")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by Open Charge Map")]
    RateLimited,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },
}

impl From<OcmError> for ProviderError {
    fn from(err: OcmError) -> Self {
        ProviderError::Upstream {
            provider: PROVIDER,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_upstream() {
        let err: ProviderError = OcmError::Api {
            status: 503,
            message: "maintenance".into(),
        }
        .into();
        assert_eq!(
            err,
            ProviderError::Upstream {
                provider: "openchargemap",
                message: "API error 503: maintenance".into(),
            }
        );
    }
}
