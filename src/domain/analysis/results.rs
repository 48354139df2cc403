//! Structured analysis output.
//!
//! Produced fresh per analysis call and never mutated after construction.
//! The serde shape doubles as the JSON schema the LLM classifier is asked to
//! fill in, so field names are case-tolerant on deserialization via aliases.

use serde::{Deserialize, Serialize};

/// Maximum suggested actions kept per issue when sourced from a generative
/// classifier.
pub const MAX_SUGGESTED_ACTIONS: usize = 3;

/// Issue severity buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Severity {
    /// Returns the display label for this severity.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Quantitative summary of everything the classifier found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorSummary {
    #[serde(alias = "CriticalErrors")]
    pub critical_errors: u32,
    #[serde(alias = "NonCriticalErrors")]
    pub non_critical_errors: u32,
    #[serde(alias = "PerformanceIssues")]
    pub performance_issues: u32,
    #[serde(alias = "RecurrentPatterns")]
    pub recurrent_patterns: u32,
}

/// A single problem surfaced by classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectedIssue {
    #[serde(alias = "IssueType")]
    pub issue_type: String,
    #[serde(alias = "Severity")]
    pub severity: Severity,
    /// Matched pattern text.
    #[serde(alias = "Pattern")]
    pub pattern: String,
    #[serde(alias = "Occurrences")]
    pub occurrences: u32,
    #[serde(alias = "AffectedService")]
    pub affected_service: String,
    #[serde(alias = "SuggestedActions")]
    pub suggested_actions: Vec<String>,
    #[serde(alias = "EscalationRequired")]
    pub escalation_required: bool,
    /// Empty when `escalation_required` is false.
    #[serde(alias = "EscalationReason")]
    pub escalation_reason: String,
}

/// Per-service slowness detail, as reported by the LLM classifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlowService {
    #[serde(alias = "ServiceName")]
    pub service_name: String,
    #[serde(alias = "AverageResponseTime")]
    pub average_response_time: String,
    #[serde(alias = "Threshold")]
    pub threshold: String,
    #[serde(alias = "Recommendation")]
    pub recommendation: String,
}

/// Performance section of the analysis output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceAnalysis {
    #[serde(alias = "SlowServices")]
    pub slow_services: Vec<SlowService>,
}

/// Remediation recommendations, tagged by time horizon. Absent triggers
/// yield empty sequences, never omitted fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recommendations {
    #[serde(alias = "Immediate")]
    pub immediate: Vec<String>,
    #[serde(alias = "ShortTerm")]
    pub short_term: Vec<String>,
    #[serde(alias = "LongTerm")]
    pub long_term: Vec<String>,
}

/// The full structured diagnostic report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResults {
    #[serde(alias = "ErrorSummary")]
    pub error_summary: ErrorSummary,
    #[serde(alias = "DetectedIssues")]
    pub detected_issues: Vec<DetectedIssue>,
    #[serde(alias = "PerformanceAnalysis")]
    pub performance_analysis: PerformanceAnalysis,
    #[serde(alias = "Recommendations")]
    pub recommendations: Recommendations,
}

impl AnalysisResults {
    /// Caps suggested actions on every issue at [`MAX_SUGGESTED_ACTIONS`].
    pub fn cap_suggested_actions(mut self) -> Self {
        for issue in &mut self.detected_issues {
            issue.suggested_actions.truncate(MAX_SUGGESTED_ACTIONS);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_case_insensitive_field_names() {
        let json = r#"{
            "ErrorSummary": {"CriticalErrors": 2, "NonCriticalErrors": 1},
            "DetectedIssues": [{
                "IssueType": "ExternalServiceError",
                "Severity": "High",
                "Pattern": "TimeoutException",
                "Occurrences": 4,
                "AffectedService": "Billing",
                "SuggestedActions": ["Check upstream"],
                "EscalationRequired": false,
                "EscalationReason": ""
            }],
            "Recommendations": {"Immediate": ["Act now"]}
        }"#;

        let results: AnalysisResults = serde_json::from_str(json).unwrap();
        assert_eq!(results.error_summary.critical_errors, 2);
        assert_eq!(results.detected_issues.len(), 1);
        assert_eq!(results.detected_issues[0].severity, Severity::High);
        assert_eq!(results.recommendations.immediate, vec!["Act now"]);
        // Absent sections default, not error.
        assert!(results.performance_analysis.slow_services.is_empty());
        assert!(results.recommendations.short_term.is_empty());
    }

    #[test]
    fn serializes_camel_case() {
        let results = AnalysisResults::default();
        let json = serde_json::to_value(&results).unwrap();
        assert!(json.get("errorSummary").is_some());
        assert!(json.get("detectedIssues").is_some());
        assert!(json["recommendations"].get("shortTerm").is_some());
    }

    #[test]
    fn caps_suggested_actions() {
        let results = AnalysisResults {
            detected_issues: vec![DetectedIssue {
                suggested_actions: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                ..DetectedIssue::default()
            }],
            ..AnalysisResults::default()
        }
        .cap_suggested_actions();

        assert_eq!(results.detected_issues[0].suggested_actions.len(), MAX_SUGGESTED_ACTIONS);
    }

    #[test]
    fn severity_labels() {
        assert_eq!(Severity::Critical.label(), "Critical");
        assert_eq!(Severity::Medium.label(), "Medium");
    }
}
