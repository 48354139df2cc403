//! HTTP routes for analysis endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{analyze, analyze_recent, query_logs, service_status, AnalysisAppState};

/// Creates the analysis router with all routes.
pub fn analysis_routes(state: AnalysisAppState) -> Router {
    Router::new()
        // POST /api/analysis/analyze
        .route("/api/analysis/analyze", post(analyze))
        // POST /api/analysis/recent
        .route("/api/analysis/recent", post(analyze_recent))
        // GET /api/analysis/status
        .route("/api/analysis/status", get(service_status))
        // POST /api/logs/query
        .route("/api/logs/query", post(query_logs))
        .with_state(state)
}
