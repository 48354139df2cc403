//! HTTP handlers for analysis endpoints.
//!
//! These handlers connect axum routes to the analysis orchestrator. They do
//! no business logic of their own: parse the request, call the application
//! layer, translate the outcome.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use tracing::warn;

use crate::application::{
    AnalysisError, AnalysisMode, AnalysisOrchestrator, AnalysisRequest, AnalysisResponse,
};
use crate::domain::analysis::{NormalizedTable, RecordNormalizer};
use crate::ports::{LogQuery, LogStore, LogStoreError};

use super::dto::{
    AnalyzeRequest, ErrorResponse, LogsQueryRequest, LogsQueryResponse, RecentAnalysisRequest,
    ServiceStatus,
};

/// Analysis API error that implements IntoResponse.
pub enum AnalysisApiError {
    BadRequest(String),
    NotFound { resource: &'static str, id: String },
    Internal(String),
}

impl IntoResponse for AnalysisApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            AnalysisApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            AnalysisApiError::NotFound { resource, id } => {
                (StatusCode::NOT_FOUND, ErrorResponse::not_found(resource, &id))
            }
            AnalysisApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal(msg))
            }
        };
        (status, Json(error)).into_response()
    }
}

impl From<AnalysisError> for AnalysisApiError {
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::Validation(msg) => AnalysisApiError::BadRequest(msg),
            AnalysisError::Internal { .. } => AnalysisApiError::Internal(error.to_string()),
        }
    }
}

impl From<LogStoreError> for AnalysisApiError {
    fn from(error: LogStoreError) -> Self {
        match error {
            LogStoreError::UnknownApplication { application_name } => AnalysisApiError::NotFound {
                resource: "Application",
                id: application_name,
            },
            LogStoreError::Connection(msg) => {
                AnalysisApiError::Internal(format!("Store error: {}", msg))
            }
        }
    }
}

/// Shared application state for the analysis API.
#[derive(Clone)]
pub struct AnalysisAppState {
    pub orchestrator: Arc<AnalysisOrchestrator>,
    pub log_store: Arc<dyn LogStore>,
}

/// POST /api/analysis/analyze
///
/// Runs one full analysis over an explicit time window.
pub async fn analyze(
    State(state): State<AnalysisAppState>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>, AnalysisApiError> {
    let analysis_mode = body
        .analysis_mode
        .as_deref()
        .map(AnalysisMode::parse)
        .unwrap_or_default();

    let request = AnalysisRequest {
        application_name: body.application_name,
        tables_to_analyze: body.tables_to_analyze,
        start_date_utc: body.start_date_utc,
        end_date_utc: body.end_date_utc,
        max_records: body.max_records,
        max_response_time_ms: body.max_response_time_ms,
        analysis_mode,
    };

    let response = state.orchestrator.analyze(request).await?;
    Ok(Json(response))
}

/// POST /api/analysis/recent
///
/// Analyzes the last `minutesBack` minutes in intelligent mode.
pub async fn analyze_recent(
    State(state): State<AnalysisAppState>,
    Json(body): Json<RecentAnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AnalysisApiError> {
    if body.minutes_back <= 0 {
        return Err(AnalysisApiError::BadRequest(
            "minutesBack must be positive".to_string(),
        ));
    }

    let request = AnalysisRequest::recent(
        body.application_name,
        body.tables_to_analyze,
        body.minutes_back,
        body.max_records,
        body.max_response_time_ms,
    );

    let response = state.orchestrator.analyze(request).await?;
    Ok(Json(response))
}

/// POST /api/logs/query
///
/// Fetches and normalizes records per table without classification.
pub async fn query_logs(
    State(state): State<AnalysisAppState>,
    Json(body): Json<LogsQueryRequest>,
) -> Result<Json<LogsQueryResponse>, AnalysisApiError> {
    if body.application_name.is_empty() {
        return Err(AnalysisApiError::BadRequest(
            "applicationName is required".to_string(),
        ));
    }
    if body.table_names.is_empty() {
        return Err(AnalysisApiError::BadRequest(
            "tableNames must contain at least one table".to_string(),
        ));
    }
    if body.start_date_utc >= body.end_date_utc {
        return Err(AnalysisApiError::BadRequest(
            "startDateUtc must be before endDateUtc".to_string(),
        ));
    }

    let query = LogQuery {
        application_name: body.application_name.clone(),
        table_names: body.table_names,
        start_utc: body.start_date_utc,
        end_utc: body.end_date_utc,
        max_records_per_table: body.max_records,
    };
    let log_data = state.log_store.query(&query).await?;

    let total_records = log_data.total_records();
    let tables: Vec<NormalizedTable> = log_data
        .tables
        .iter()
        .map(|table| NormalizedTable {
            table_name: table.table_name.clone(),
            status: table.status,
            error_message: table.error_message.clone(),
            records_returned: table.records_returned(),
            records: RecordNormalizer::normalize(
                &table.records,
                &body.application_name,
                body.max_records,
                body.max_response_time_ms,
            ),
        })
        .collect();

    Ok(Json(LogsQueryResponse {
        application_name: body.application_name,
        total_records,
        tables,
    }))
}

/// GET /api/analysis/status
///
/// Reports LLM availability and the analysis modes currently usable.
pub async fn service_status(State(state): State<AnalysisAppState>) -> Json<ServiceStatus> {
    let llm_available = state.orchestrator.llm_available().await;
    if !llm_available {
        warn!("LLM provider unavailable, intelligent mode degraded to fallback");
    }

    let (status, supported_modes) = status_view(llm_available);
    Json(ServiceStatus {
        status,
        llm_available,
        supported_modes,
        timestamp: Utc::now(),
    })
}

/// Both modes stay advertised when the LLM is down: an intelligent request
/// still succeeds through the rule fallback, it just stops being
/// LLM-authored. The status string alone carries the degradation.
fn status_view(llm_available: bool) -> (&'static str, Vec<&'static str>) {
    let status = if llm_available { "healthy" } else { "degraded" };
    (status, vec!["basic", "intelligent"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_keeps_intelligent_mode_advertised_when_llm_is_down() {
        let (status, modes) = status_view(false);
        assert_eq!(status, "degraded");
        assert_eq!(modes, vec!["basic", "intelligent"]);

        let (status, modes) = status_view(true);
        assert_eq!(status, "healthy");
        assert_eq!(modes, vec!["basic", "intelligent"]);
    }
}
