pub mod analysis;
pub mod errors;
pub mod types;

// Re-export main interfaces
pub use analysis::AnalysisService;
pub use errors::ServiceError;
pub use types::*;
