pub mod errors;
pub mod metrics;
pub mod returns;
pub mod signal;

// Re-export main interfaces for easy access
pub use errors::AnalysisError;
pub use metrics::{compute_metrics, return_correlation, PerformanceMetrics};
pub use returns::{compute_returns, ReturnPoint, ReturnSeries};
pub use signal::{
    compute_signal, list_strategies, Position, SignalPoint, SignalSeries, StrategyConfig,
    StrategyInfo, StrategyKind,
};
