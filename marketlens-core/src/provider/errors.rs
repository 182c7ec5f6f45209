// =================================================================
// provider/errors.rs - Error Types
// =================================================================

use thiserror::Error;

/// Error types for price-provider operations
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Data parsing error: {0}")]
    Parse(String),

    #[error("Connection timeout")]
    Timeout,

    #[error("Provider API error: {0}")]
    Api(String),
}

// Convert from common error types
impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_connect() {
            ProviderError::Network(err.to_string())
        } else {
            ProviderError::Api(err.to_string())
        }
    }
}
