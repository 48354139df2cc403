//! HTTP DTOs for analysis endpoints.
//!
//! The analysis response and per-table views are already serialization-ready
//! domain/application types, so they are re-exported directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::application::AnalysisResponse;
pub use crate::domain::analysis::NormalizedTable;

/// Body for POST /api/analysis/analyze.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub application_name: String,
    #[serde(default)]
    pub tables_to_analyze: Vec<String>,
    pub start_date_utc: DateTime<Utc>,
    pub end_date_utc: DateTime<Utc>,
    #[serde(default = "default_max_records")]
    pub max_records: usize,
    #[serde(default)]
    pub max_response_time_ms: Option<i64>,
    /// "basic" or "intelligent"; anything else falls back to basic.
    #[serde(default)]
    pub analysis_mode: Option<String>,
}

/// Body for POST /api/analysis/recent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentAnalysisRequest {
    #[serde(default)]
    pub application_name: String,
    #[serde(default)]
    pub tables_to_analyze: Vec<String>,
    #[serde(default = "default_minutes_back")]
    pub minutes_back: i64,
    #[serde(default = "default_max_records")]
    pub max_records: usize,
    #[serde(default)]
    pub max_response_time_ms: Option<i64>,
}

/// Body for POST /api/logs/query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsQueryRequest {
    #[serde(default)]
    pub application_name: String,
    #[serde(default)]
    pub table_names: Vec<String>,
    pub start_date_utc: DateTime<Utc>,
    pub end_date_utc: DateTime<Utc>,
    #[serde(default = "default_max_records")]
    pub max_records: usize,
    #[serde(default)]
    pub max_response_time_ms: Option<i64>,
}

/// Response for POST /api/logs/query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsQueryResponse {
    pub application_name: String,
    pub total_records: u32,
    pub tables: Vec<NormalizedTable>,
}

/// Response for GET /api/analysis/status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    /// "healthy" when the LLM path is up, "degraded" otherwise.
    pub status: &'static str,
    pub llm_available: bool,
    pub supported_modes: Vec<&'static str>,
    pub timestamp: DateTime<Utc>,
}

fn default_max_records() -> usize {
    crate::application::DEFAULT_MAX_RECORDS
}

fn default_minutes_back() -> i64 {
    30
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// Attaches structured details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
