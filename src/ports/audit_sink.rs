//! Audit Sink Port - fire-and-forget analysis audit notifications.
//!
//! Sink failures must never affect the analysis result, so the methods are
//! infallible: implementations swallow and log their own errors. Delivery is
//! best-effort, not exactly-once.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Port for emitting analysis audit events.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// An analysis request passed validation and started processing.
    async fn analysis_started(&self, event: AnalysisStarted);

    /// An analysis completed and a response was produced.
    async fn analysis_completed(&self, event: AnalysisCompleted);

    /// An analysis failed with an unhandled error.
    async fn analysis_failed(&self, event: AnalysisFailed);
}

/// Audit payload for a started analysis.
#[derive(Debug, Clone)]
pub struct AnalysisStarted {
    pub analysis_id: String,
    pub application_name: String,
    pub analysis_mode: String,
    pub table_count: usize,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub max_records: usize,
    pub max_response_time_ms: Option<i64>,
}

/// Audit payload for a completed analysis.
#[derive(Debug, Clone)]
pub struct AnalysisCompleted {
    pub analysis_id: String,
    pub processing_time_ms: u64,
    pub llm_tokens_used: u32,
    pub rules_applied: Vec<String>,
    pub used_fallback: bool,
}

/// Audit payload for a failed analysis.
#[derive(Debug, Clone)]
pub struct AnalysisFailed {
    pub analysis_id: String,
    pub error: String,
}
