//! LLM Classifier - generative log classification with rule-based fallback.
//!
//! Builds a provider-agnostic analysis prompt, submits it over the
//! [`ChatModel`] transport, and parses the structured response. Failure never
//! propagates: a transport fault is substituted with the Rule Classifier's
//! output over the same input, and an unusable response body degrades to a
//! minimal "manual review required" result. The fallback path is a
//! first-class outcome, not an exception handler side effect.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::analysis::{
    AnalysisConfiguration, AnalysisResults, NormalizedTable, Recommendations, RuleClassifier,
};
use crate::ports::ChatModel;

/// Result of one classification attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationOutcome {
    /// The LLM produced the results (possibly the minimal degraded form
    /// when its response carried no usable JSON).
    Direct(AnalysisResults),
    /// Rule-based results substituted for the LLM path.
    Fallback {
        results: AnalysisResults,
        reason: String,
    },
}

impl ClassificationOutcome {
    /// The analysis results regardless of path.
    pub fn results(&self) -> &AnalysisResults {
        match self {
            ClassificationOutcome::Direct(results) => results,
            ClassificationOutcome::Fallback { results, .. } => results,
        }
    }

    /// Consumes the outcome, returning the results and the fallback flag.
    pub fn into_parts(self) -> (AnalysisResults, bool) {
        match self {
            ClassificationOutcome::Direct(results) => (results, false),
            ClassificationOutcome::Fallback { results, .. } => (results, true),
        }
    }
}

/// LLM-backed classifier with automatic rule-based fallback.
pub struct LlmClassifier {
    chat_model: Arc<dyn ChatModel>,
}

impl LlmClassifier {
    /// Creates a classifier over the given transport.
    pub fn new(chat_model: Arc<dyn ChatModel>) -> Self {
        Self { chat_model }
    }

    /// Checks provider availability with a minimal round-trip request.
    ///
    /// Any transport fault or non-success response counts as unavailable;
    /// failures are logged, never raised.
    pub async fn is_available(&self) -> bool {
        match self.chat_model.probe().await {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "LLM provider unavailable");
                false
            }
        }
    }

    /// Classifies the normalized records, falling back to rules on any
    /// transport failure.
    pub async fn classify(
        &self,
        application_name: &str,
        tables: &[NormalizedTable],
        configuration: &AnalysisConfiguration,
    ) -> ClassificationOutcome {
        let prompt = build_analysis_prompt(application_name, tables, configuration);

        match self.chat_model.complete(SYSTEM_INSTRUCTION, &prompt).await {
            Ok(response_text) => {
                info!(application = application_name, "LLM analysis completed");
                ClassificationOutcome::Direct(parse_llm_response(&response_text))
            }
            Err(error) => {
                warn!(%error, application = application_name, "LLM call failed, using rule-based fallback");
                self.fallback(tables, configuration, error.to_string())
            }
        }
    }

    /// Rule-based fallback, invoked directly when the provider is known to
    /// be unavailable or after a failed call.
    pub fn fallback(
        &self,
        tables: &[NormalizedTable],
        configuration: &AnalysisConfiguration,
        reason: String,
    ) -> ClassificationOutcome {
        ClassificationOutcome::Fallback {
            results: RuleClassifier::classify(tables, configuration),
            reason,
        }
    }
}

/// System instruction pinning task and output locale for deterministic
/// downstream parsing.
const SYSTEM_INSTRUCTION: &str = "You are an expert in enterprise application log analysis. \
ALWAYS RESPOND IN ENGLISH.\n\n\
Your task is to analyze log data and:\n\
1. Detect errors and problems in the applications\n\
2. Classify problems as critical or non-critical\n\
3. Suggest specific resolution actions\n\
4. Provide a clear summary of the application state\n\n\
Always respond in valid JSON with the exact structure you are given. \
All text values must be in English.";

/// Builds the user prompt: context, configured thresholds, the structured
/// record block, and the required output schema.
fn build_analysis_prompt(
    application_name: &str,
    tables: &[NormalizedTable],
    configuration: &AnalysisConfiguration,
) -> String {
    let total_records: u32 = tables.iter().map(|t| t.records_returned).sum();
    let thresholds = serde_json::to_string(&configuration.response_time_thresholds)
        .unwrap_or_else(|_| "{}".to_string());

    format!(
        "You are an expert in enterprise application log analysis. ALWAYS RESPOND IN ENGLISH.\n\n\
Your goals are to:\n\
1. Identify critical error patterns requiring immediate attention\n\
2. Classify problems by severity (Critical, High, Medium, Low)\n\
3. Suggest specific, practical resolution actions\n\
4. Detect trends and emerging patterns\n\
5. Recommend whether escalation is required\n\n\
Context: application {application_name} with {total_records} records.\n\
Configured thresholds (ms): {thresholds}\n\n\
Analyze the following log records:\n{records}\n\
For each identified problem provide:\n\
- Issue type (ExternalServiceError, InternalError, PerformanceIssue, ...)\n\
- Severity (Critical, High, Medium, Low)\n\
- Detected pattern\n\
- Occurrence count\n\
- Affected services/methods\n\
- Suggested actions (at most 3, specific and actionable)\n\
- Whether escalation is required (true/false with justification)\n\n\
Respond ONLY in valid JSON with this exact structure:\n{schema}",
        application_name = application_name,
        total_records = total_records,
        thresholds = thresholds,
        records = structured_record_block(tables),
        schema = RESPONSE_SCHEMA,
    )
}

/// Fixed JSON shape the provider is asked to fill, mirroring
/// [`AnalysisResults`].
const RESPONSE_SCHEMA: &str = r#"{
  "errorSummary": {
    "criticalErrors": 0,
    "nonCriticalErrors": 0,
    "performanceIssues": 0,
    "recurrentPatterns": 0
  },
  "detectedIssues": [
    {
      "issueType": "description of the problem type",
      "severity": "Critical|High|Medium|Low",
      "pattern": "description of the detected pattern",
      "occurrences": 0,
      "affectedService": "name of the affected service",
      "suggestedActions": ["action 1", "action 2"],
      "escalationRequired": false,
      "escalationReason": "justification when escalation is required"
    }
  ],
  "performanceAnalysis": {
    "slowServices": [
      {
        "serviceName": "name of the service",
        "averageResponseTime": "average time",
        "threshold": "configured threshold",
        "recommendation": "specific recommendation"
      }
    ]
  },
  "recommendations": {
    "immediate": ["immediate recommendation"],
    "shortTerm": ["short-term recommendation"],
    "longTerm": ["long-term recommendation"]
  }
}"#;

/// Serializes per-table record groups, separating error-bearing from
/// performance-bearing records.
fn structured_record_block(tables: &[NormalizedTable]) -> String {
    let mut block = String::new();

    for table in tables {
        if !table.status.is_ok() || table.records.is_empty() {
            continue;
        }

        block.push_str(&format!(
            "Table: {} ({} records)\n",
            table.table_name, table.records_returned
        ));

        let error_records: Vec<_> = table.records.iter().filter(|r| r.has_exception()).collect();
        let performance_records: Vec<_> = table
            .records
            .iter()
            .filter(|r| !r.has_exception() && r.has_time_service())
            .collect();

        if !error_records.is_empty() {
            block.push_str(&format!("Errors found ({}):\n", error_records.len()));
            for record in error_records {
                if let Ok(json) = serde_json::to_string(record) {
                    block.push_str(&json);
                    block.push('\n');
                }
            }
        }

        if !performance_records.is_empty() {
            block.push_str(&format!(
                "Performance records ({}):\n",
                performance_records.len()
            ));
            for record in performance_records {
                if let Ok(json) = serde_json::to_string(record) {
                    block.push_str(&json);
                    block.push('\n');
                }
            }
        }

        block.push('\n');
    }

    block
}

/// Extracts the first balanced top-level JSON object (first `{` to last `}`)
/// and deserializes it tolerantly. An unusable response degrades to the
/// minimal manual-review result instead of raising.
fn parse_llm_response(response_text: &str) -> AnalysisResults {
    let json_start = response_text.find('{');
    let json_end = response_text.rfind('}');

    if let (Some(start), Some(end)) = (json_start, json_end) {
        if end > start {
            let json_content = &response_text[start..=end];
            match serde_json::from_str::<AnalysisResults>(json_content) {
                Ok(results) => return results.cap_suggested_actions(),
                Err(error) => {
                    warn!(%error, "failed to parse LLM response JSON");
                }
            }
        }
    }

    manual_review_results()
}

/// Minimal non-empty results produced when the response carried no usable
/// JSON.
fn manual_review_results() -> AnalysisResults {
    AnalysisResults {
        recommendations: Recommendations {
            immediate: vec![
                "Automatic analysis failed - manual review of the logs is required".to_string(),
                "Verify connectivity and configuration of the intelligent analysis service"
                    .to_string(),
            ],
            ..Recommendations::default()
        },
        ..AnalysisResults::default()
    }
}
