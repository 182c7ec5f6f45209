use thiserror::Error;

/// Error types for signal and return computation
///
/// All variants are deterministic given the same inputs; transient
/// failures only exist in the provider layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Non-positive window, unrecognized strategy name, or similar bad input.
    /// Fatal to the computation, never retried.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Empty price series. A series shorter than the lookback is NOT an
    /// error: those points degrade to flat signals instead.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Signal and price series disagree in length or date set. Internal
    /// contract violation between callers; fails loudly rather than
    /// silently truncating and corrupting the return comparison.
    #[error("series misaligned: {0}")]
    Alignment(String),
}
