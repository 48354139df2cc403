//! Analysis Orchestrator - top-level entry point for one analysis request.
//!
//! Drives the request through validate, fetch, configure, and classify, and
//! guarantees a valid response is always produced: missing data
//! short-circuits to a zero result, classifier failure is recovered through
//! the fallback path, and only truly unexpected failures surface — as a
//! single structured error carrying the analysis id and elapsed time.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::analysis::{
    AnalysisResults, GlobalAnalysisConfiguration, NormalizedTable, RecordNormalizer,
    RuleClassifier,
};
use crate::ports::{
    AnalysisCompleted, AnalysisFailed, AnalysisStarted, AuditSink, ConfigurationSource,
    ConfigurationSourceError, LogQuery, LogStore, LogStoreError,
};

use super::llm_classifier::{ClassificationOutcome, LlmClassifier};

/// Token cost estimate per analyzed record.
const TOKENS_PER_RECORD: u32 = 100;

/// Fixed prompt overhead in the token cost estimate.
const TOKEN_PROMPT_OVERHEAD: u32 = 500;

/// Default per-table record ceiling.
pub const DEFAULT_MAX_RECORDS: usize = 10;

/// Requested analysis strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    /// Deterministic rule-based classification.
    #[default]
    Basic,
    /// LLM-backed classification with rule fallback.
    Intelligent,
}

impl AnalysisMode {
    /// Parses the requested mode; anything but "intelligent"
    /// (case-insensitive) is the basic default.
    pub fn parse(mode: &str) -> Self {
        if mode.eq_ignore_ascii_case("intelligent") {
            AnalysisMode::Intelligent
        } else {
            AnalysisMode::Basic
        }
    }

    /// Wire label for this mode.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisMode::Basic => "basic",
            AnalysisMode::Intelligent => "intelligent",
        }
    }
}

/// One analysis request.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub application_name: String,
    pub tables_to_analyze: Vec<String>,
    pub start_date_utc: DateTime<Utc>,
    pub end_date_utc: DateTime<Utc>,
    pub max_records: usize,
    pub max_response_time_ms: Option<i64>,
    pub analysis_mode: AnalysisMode,
}

impl AnalysisRequest {
    /// Builds a request covering the last `minutes_back` minutes, pinned to
    /// intelligent mode.
    pub fn recent(
        application_name: impl Into<String>,
        tables_to_analyze: Vec<String>,
        minutes_back: i64,
        max_records: usize,
        max_response_time_ms: Option<i64>,
    ) -> Self {
        let end = Utc::now();
        Self {
            application_name: application_name.into(),
            tables_to_analyze,
            start_date_utc: end - Duration::minutes(minutes_back),
            end_date_utc: end,
            max_records,
            max_response_time_ms,
            analysis_mode: AnalysisMode::Intelligent,
        }
    }
}

/// Audit trail attached to every analysis response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub analysis_id: String,
    pub processing_time_ms: u64,
    pub llm_tokens_used: u32,
    pub rules_applied: Vec<String>,
    pub used_fallback: bool,
}

/// The complete analysis response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub application_name: String,
    pub analysis_timestamp: DateTime<Utc>,
    pub total_records_analyzed: u32,
    pub analysis_results: AnalysisResults,
    pub audit_log: AuditRecord,
}

/// Errors surfaced to the caller. Everything below the orchestrator is
/// recovered or converted into status fields.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Malformed request; rejected before any side effect.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Unexpected failure during fetch or classification.
    #[error("analysis {analysis_id} failed after {processing_time_ms}ms: {message}")]
    Internal {
        analysis_id: String,
        processing_time_ms: u64,
        message: String,
    },
}

/// Failures inside the pipeline, before conversion at the boundary.
#[derive(Debug, thiserror::Error)]
enum PipelineError {
    #[error(transparent)]
    Store(#[from] LogStoreError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationSourceError),
}

/// Top-level analysis entry point over the collaborating ports.
pub struct AnalysisOrchestrator {
    log_store: Arc<dyn LogStore>,
    llm_classifier: Arc<LlmClassifier>,
    configuration_source: Arc<dyn ConfigurationSource>,
    audit_sink: Arc<dyn AuditSink>,
}

impl AnalysisOrchestrator {
    /// Wires the orchestrator to its collaborators.
    pub fn new(
        log_store: Arc<dyn LogStore>,
        llm_classifier: Arc<LlmClassifier>,
        configuration_source: Arc<dyn ConfigurationSource>,
        audit_sink: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            log_store,
            llm_classifier,
            configuration_source,
            audit_sink,
        }
    }

    /// Reports whether the LLM classification path is currently available.
    pub async fn llm_available(&self) -> bool {
        self.llm_classifier.is_available().await
    }

    /// Runs one analysis request end to end.
    #[instrument(skip(self, request), fields(application = %request.application_name))]
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        let analysis_id = Uuid::new_v4().to_string();
        let started_at = Instant::now();

        Self::validate(&request)?;

        self.audit_sink
            .analysis_started(AnalysisStarted {
                analysis_id: analysis_id.clone(),
                application_name: request.application_name.clone(),
                analysis_mode: request.analysis_mode.label().to_string(),
                table_count: request.tables_to_analyze.len(),
                start_utc: request.start_date_utc,
                end_utc: request.end_date_utc,
                max_records: request.max_records,
                max_response_time_ms: request.max_response_time_ms,
            })
            .await;

        info!(analysis_id = %analysis_id, "starting analysis");

        match self.run_pipeline(&analysis_id, &request, started_at).await {
            Ok(response) => {
                self.audit_sink
                    .analysis_completed(AnalysisCompleted {
                        analysis_id: analysis_id.clone(),
                        processing_time_ms: response.audit_log.processing_time_ms,
                        llm_tokens_used: response.audit_log.llm_tokens_used,
                        rules_applied: response.audit_log.rules_applied.clone(),
                        used_fallback: response.audit_log.used_fallback,
                    })
                    .await;

                info!(
                    analysis_id = %analysis_id,
                    processing_time_ms = response.audit_log.processing_time_ms,
                    "analysis completed"
                );
                Ok(response)
            }
            Err(error) => {
                let processing_time_ms = started_at.elapsed().as_millis() as u64;
                warn!(analysis_id = %analysis_id, %error, "analysis failed");

                self.audit_sink
                    .analysis_failed(AnalysisFailed {
                        analysis_id: analysis_id.clone(),
                        error: error.to_string(),
                    })
                    .await;

                Err(AnalysisError::Internal {
                    analysis_id,
                    processing_time_ms,
                    message: error.to_string(),
                })
            }
        }
    }

    /// Rejects malformed requests before any side effect.
    fn validate(request: &AnalysisRequest) -> Result<(), AnalysisError> {
        if request.application_name.is_empty() {
            return Err(AnalysisError::Validation(
                "applicationName is required".to_string(),
            ));
        }
        if request.tables_to_analyze.is_empty() {
            return Err(AnalysisError::Validation(
                "tablesToAnalyze must contain at least one table".to_string(),
            ));
        }
        if request.start_date_utc >= request.end_date_utc {
            return Err(AnalysisError::Validation(
                "startDateUtc must be before endDateUtc".to_string(),
            ));
        }
        Ok(())
    }

    /// Fetch, configure, and classify. Store and configuration failures
    /// bubble up for conversion at the boundary.
    async fn run_pipeline(
        &self,
        analysis_id: &str,
        request: &AnalysisRequest,
        started_at: Instant,
    ) -> Result<AnalysisResponse, PipelineError> {
        let query = LogQuery {
            application_name: request.application_name.clone(),
            table_names: request.tables_to_analyze.clone(),
            start_utc: request.start_date_utc,
            end_utc: request.end_date_utc,
            max_records_per_table: request.max_records,
        };
        let log_data = self.log_store.query(&query).await?;

        let total_records = log_data.total_records();
        if total_records == 0 {
            warn!(application = %request.application_name, "no records found to analyze");
            return Ok(AnalysisResponse {
                application_name: request.application_name.clone(),
                analysis_timestamp: Utc::now(),
                total_records_analyzed: 0,
                analysis_results: AnalysisResults::default(),
                audit_log: AuditRecord {
                    analysis_id: analysis_id.to_string(),
                    processing_time_ms: started_at.elapsed().as_millis() as u64,
                    llm_tokens_used: 0,
                    rules_applied: vec!["no-data-found".to_string()],
                    used_fallback: false,
                },
            });
        }

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
                    &request.application_name,
                    request.max_records,
                    request.max_response_time_ms,
                ),
            })
            .collect();

        let global_configuration: GlobalAnalysisConfiguration =
            self.configuration_source.load().await?;
        let configuration = global_configuration.configuration_for(&request.application_name);

        let (analysis_results, llm_tokens_used, used_fallback) = match request.analysis_mode {
            AnalysisMode::Intelligent => {
                let outcome = if self.llm_classifier.is_available().await {
                    info!(total_records, "running LLM analysis");
                    self.llm_classifier
                        .classify(&request.application_name, &tables, &configuration)
                        .await
                } else {
                    warn!("LLM unavailable, running fallback analysis");
                    self.llm_classifier.fallback(
                        &tables,
                        &configuration,
                        "LLM provider unavailable".to_string(),
                    )
                };

                let tokens = match &outcome {
                    ClassificationOutcome::Direct(_) => estimate_tokens_used(total_records),
                    ClassificationOutcome::Fallback { .. } => 0,
                };
                let (results, used_fallback) = outcome.into_parts();
                (results, tokens, used_fallback)
            }
            AnalysisMode::Basic => (
                RuleClassifier::classify(&tables, &configuration),
                0,
                false,
            ),
        };

        Ok(AnalysisResponse {
            application_name: request.application_name.clone(),
            analysis_timestamp: Utc::now(),
            total_records_analyzed: total_records,
            analysis_results,
            audit_log: AuditRecord {
                analysis_id: analysis_id.to_string(),
                processing_time_ms: started_at.elapsed().as_millis() as u64,
                llm_tokens_used,
                rules_applied: applied_rules(request.analysis_mode, used_fallback),
                used_fallback,
            },
        })
    }
}

/// Approximate token cost: linear in record count plus prompt overhead.
fn estimate_tokens_used(total_records: u32) -> u32 {
    total_records * TOKENS_PER_RECORD + TOKEN_PROMPT_OVERHEAD
}

/// The applied-rules list is deterministic from (mode, fallback flag).
fn applied_rules(mode: AnalysisMode, used_fallback: bool) -> Vec<String> {
    let mut rules: Vec<&str> = match (mode, used_fallback) {
        (AnalysisMode::Intelligent, false) => {
            vec!["llm-analysis", "intelligent-classification"]
        }
        (AnalysisMode::Intelligent, true) => {
            vec!["fallback-analysis", "rule-based-classification"]
        }
        (AnalysisMode::Basic, _) => vec!["basic-analysis", "rule-based-classification"],
    };

    rules.extend([
        "error-pattern-matching",
        "performance-threshold-check",
        "recurrence-detection",
    ]);

    rules.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parsing_is_case_insensitive_with_basic_default() {
        assert_eq!(AnalysisMode::parse("intelligent"), AnalysisMode::Intelligent);
        assert_eq!(AnalysisMode::parse("Intelligent"), AnalysisMode::Intelligent);
        assert_eq!(AnalysisMode::parse("INTELLIGENT"), AnalysisMode::Intelligent);
        assert_eq!(AnalysisMode::parse("basic"), AnalysisMode::Basic);
        assert_eq!(AnalysisMode::parse("anything"), AnalysisMode::Basic);
        assert_eq!(AnalysisMode::parse(""), AnalysisMode::Basic);
    }

    #[test]
    fn applied_rules_table() {
        assert_eq!(
            applied_rules(AnalysisMode::Intelligent, false),
            vec![
                "llm-analysis",
                "intelligent-classification",
                "error-pattern-matching",
                "performance-threshold-check",
                "recurrence-detection"
            ]
        );
        assert_eq!(
            applied_rules(AnalysisMode::Intelligent, true)[..2],
            ["fallback-analysis", "rule-based-classification"]
        );
        assert_eq!(
            applied_rules(AnalysisMode::Basic, false)[..2],
            ["basic-analysis", "rule-based-classification"]
        );
        // The common tail is always appended.
        for rules in [
            applied_rules(AnalysisMode::Intelligent, true),
            applied_rules(AnalysisMode::Basic, false),
        ] {
            assert!(rules.contains(&"recurrence-detection".to_string()));
            assert_eq!(rules.len(), 5);
        }
    }

    #[test]
    fn token_estimate_is_linear_with_overhead() {
        assert_eq!(estimate_tokens_used(0), 500);
        assert_eq!(estimate_tokens_used(10), 1500);
    }

    #[test]
    fn recent_request_pins_intelligent_mode_and_window() {
        let request = AnalysisRequest::recent("App", vec!["Logs".to_string()], 30, 10, None);
        assert_eq!(request.analysis_mode, AnalysisMode::Intelligent);
        let window = request.end_date_utc - request.start_date_utc;
        assert_eq!(window.num_minutes(), 30);
    }
}
