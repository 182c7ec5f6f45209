use marketlens_common::data::types::DataError;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::provider::ProviderError;

/// Service layer error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

impl ServiceError {
    /// Check if error is recoverable by retrying the request
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Network hiccups and timeouts may clear on a later attempt
            ServiceError::Provider(e) => matches!(
                e,
                ProviderError::Network(_) | ProviderError::Timeout | ProviderError::Api(_)
            ),
            // Pure computation is deterministic: same inputs, same failure
            ServiceError::Analysis(_) => false,
            ServiceError::Data(_) => false,
        }
    }
}
