//! Tracing Audit Sink - structured audit events through the tracing stack.
//!
//! Emits one event per lifecycle transition, plus warnings when an analysis
//! ran suspiciously long or burned an unusual number of tokens.

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::ports::{AnalysisCompleted, AnalysisFailed, AnalysisStarted, AuditSink};

/// Processing time above which a completed analysis is flagged.
const SLOW_ANALYSIS_MS: u64 = 30_000;

/// Token usage above which a completed analysis is flagged.
const HIGH_TOKEN_USAGE: u32 = 100_000;

/// AuditSink writing structured tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn analysis_started(&self, event: AnalysisStarted) {
        info!(
            analysis_id = %event.analysis_id,
            application = %event.application_name,
            mode = %event.analysis_mode,
            tables = event.table_count,
            start_utc = %event.start_utc,
            end_utc = %event.end_utc,
            max_records = event.max_records,
            max_response_time_ms = ?event.max_response_time_ms,
            "audit: analysis started"
        );
    }

    async fn analysis_completed(&self, event: AnalysisCompleted) {
        info!(
            analysis_id = %event.analysis_id,
            processing_time_ms = event.processing_time_ms,
            llm_tokens_used = event.llm_tokens_used,
            rules_applied = ?event.rules_applied,
            used_fallback = event.used_fallback,
            "audit: analysis completed"
        );

        if event.processing_time_ms > SLOW_ANALYSIS_MS {
            warn!(
                analysis_id = %event.analysis_id,
                processing_time_ms = event.processing_time_ms,
                "audit: analysis exceeded expected processing time"
            );
        }
        if event.llm_tokens_used > HIGH_TOKEN_USAGE {
            warn!(
                analysis_id = %event.analysis_id,
                llm_tokens_used = event.llm_tokens_used,
                "audit: analysis used an unusually high token count"
            );
        }
    }

    async fn analysis_failed(&self, event: AnalysisFailed) {
        error!(
            analysis_id = %event.analysis_id,
            error = %event.error,
            "audit: analysis failed"
        );
    }
}
