//! Analysis HTTP adapter module.
//!
//! Thin REST surface over the analysis orchestrator.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::ErrorResponse;
pub use handlers::AnalysisAppState;
pub use routes::analysis_routes;
