//! Rule Classifier - deterministic, side-effect-free log classification.
//!
//! Walks every record of every successfully queried table once, counting
//! error patterns, bucketing severity against configured substrings, and
//! flagging response times over their per-method thresholds. Recurrence is
//! decided after the full enumeration so pattern counts span tables.

use std::collections::BTreeMap;

use super::configuration::AnalysisConfiguration;
use super::results::{
    AnalysisResults, DetectedIssue, ErrorSummary, PerformanceAnalysis, Recommendations, Severity,
};
use super::tables::NormalizedTable;

/// Pattern key for empty exception text.
const UNKNOWN_PATTERN: &str = "Unknown";

/// Pattern key for exception text with no usable first line.
const UNKNOWN_ERROR_PATTERN: &str = "UnknownError";

/// Occurrence count above which a recurrent pattern escalates.
pub const HIGH_VOLUME_ESCALATION_CUTOFF: u32 = 10;

/// Deterministic rule-based classification engine.
pub struct RuleClassifier;

impl RuleClassifier {
    /// Classifies normalized records against the application configuration.
    ///
    /// Deterministic: the same input and configuration always produce an
    /// identical [`AnalysisResults`], with no clock or randomness involved.
    pub fn classify(
        tables: &[NormalizedTable],
        configuration: &AnalysisConfiguration,
    ) -> AnalysisResults {
        let mut critical_errors: u32 = 0;
        let mut non_critical_errors: u32 = 0;
        let mut performance_issues: u32 = 0;

        // Pattern occurrence counters scoped to the whole call, across all
        // tables. BTreeMap keeps issue emission order deterministic.
        let mut pattern_counts: BTreeMap<String, u32> = BTreeMap::new();

        for table in tables {
            if !table.status.is_ok() {
                continue;
            }

            for record in &table.records {
                if record.has_exception() {
                    let exception_text = record.exception_text().unwrap_or_default();

                    let pattern = Self::extract_error_pattern(&exception_text);
                    *pattern_counts.entry(pattern).or_insert(0) += 1;

                    // Severity bucketing is independent of the pattern
                    // counter.
                    if configuration.is_critical(&exception_text) {
                        critical_errors += 1;
                    } else {
                        non_critical_errors += 1;
                    }
                }

                if let Some(elapsed_ms) = record.elapsed_ms() {
                    let threshold = configuration.threshold_for(record.method_name());
                    if elapsed_ms > threshold {
                        performance_issues += 1;
                    }
                }
            }
        }

        let mut detected_issues = Vec::new();
        let mut recurrent_patterns: u32 = 0;

        for (pattern, count) in &pattern_counts {
            if *count < configuration.recurrence_threshold {
                continue;
            }
            recurrent_patterns += 1;

            let escalate = *count > HIGH_VOLUME_ESCALATION_CUTOFF;
            detected_issues.push(DetectedIssue {
                issue_type: "RecurrentError".to_string(),
                severity: Severity::Medium,
                pattern: pattern.clone(),
                occurrences: *count,
                affected_service: "Multiple".to_string(),
                suggested_actions: vec![
                    "Investigate the recurrent pattern".to_string(),
                    "Review detailed logs for affected requests".to_string(),
                    "Consider a preventive fix".to_string(),
                ],
                escalation_required: escalate,
                escalation_reason: if escalate {
                    "High number of occurrences".to_string()
                } else {
                    String::new()
                },
            });
        }

        AnalysisResults {
            error_summary: ErrorSummary {
                critical_errors,
                non_critical_errors,
                performance_issues,
                recurrent_patterns,
            },
            detected_issues,
            performance_analysis: PerformanceAnalysis::default(),
            recommendations: Recommendations {
                immediate: if critical_errors > 0 {
                    vec!["Review critical errors immediately".to_string()]
                } else {
                    Vec::new()
                },
                short_term: if performance_issues > 0 {
                    vec!["Optimize slow services".to_string()]
                } else {
                    Vec::new()
                },
                long_term: if recurrent_patterns > 0 {
                    vec!["Analyze recurrent patterns for improvements".to_string()]
                } else {
                    Vec::new()
                },
            },
        }
    }

    /// Extracts the recurrence pattern key from exception text: the first
    /// line up to (but excluding) the first colon, trimmed; the trimmed
    /// first line when it has no colon; a sentinel otherwise.
    fn extract_error_pattern(exception_text: &str) -> String {
        if exception_text.is_empty() {
            return UNKNOWN_PATTERN.to_string();
        }

        match exception_text.split('\n').find(|line| !line.is_empty()) {
            Some(first_line) => match first_line.find(':') {
                Some(index) if index > 0 => first_line[..index].trim().to_string(),
                _ => first_line.trim().to_string(),
            },
            None => UNKNOWN_ERROR_PATTERN.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::configuration::default_configuration;
    use crate::domain::analysis::record::{
        FieldValue, NormalizedRecord, EXCEPTION_FIELD, NAME_METHOD_FIELD, TIME_SERVICE_FIELD,
    };
    use crate::domain::analysis::tables::NormalizedTable;

    fn exception_record(text: &str) -> NormalizedRecord {
        NormalizedRecord::new().with_field(EXCEPTION_FIELD, FieldValue::text(text))
    }

    fn timing_record(elapsed: &str, method: Option<&str>) -> NormalizedRecord {
        let mut record =
            NormalizedRecord::new().with_field(TIME_SERVICE_FIELD, FieldValue::text(elapsed));
        if let Some(method) = method {
            record.insert(NAME_METHOD_FIELD, FieldValue::text(method));
        }
        record
    }

    fn ok_table(records: Vec<NormalizedRecord>) -> NormalizedTable {
        let count = records.len() as u32;
        NormalizedTable::ok("Logs", records, count)
    }

    fn config_with(recurrence_threshold: u32) -> AnalysisConfiguration {
        AnalysisConfiguration {
            recurrence_threshold,
            ..default_configuration("Generic")
        }
    }

    #[test]
    fn error_counts_partition_exception_records() {
        let config = default_configuration("AppSalud");
        let tables = vec![ok_table(vec![
            exception_record("OutOfMemoryException: heap exhausted"),
            exception_record("ValidationFailure: bad field"),
            exception_record("ConnectionTimeout: backend gone"),
        ])];

        let results = RuleClassifier::classify(&tables, &config);
        assert_eq!(results.error_summary.critical_errors, 2);
        assert_eq!(results.error_summary.non_critical_errors, 1);
        assert_eq!(
            results.error_summary.critical_errors + results.error_summary.non_critical_errors,
            3
        );
    }

    #[test]
    fn failed_tables_are_skipped() {
        let config = config_with(1);
        let tables = vec![
            NormalizedTable::failed("Broken", "table not found"),
            ok_table(vec![exception_record("X: y")]),
        ];

        let results = RuleClassifier::classify(&tables, &config);
        assert_eq!(
            results.error_summary.critical_errors + results.error_summary.non_critical_errors,
            1
        );
    }

    #[test]
    fn recurrence_threshold_is_inclusive() {
        let config = config_with(3);

        let at_threshold = vec![ok_table(vec![
            exception_record("TimeoutException: a"),
            exception_record("TimeoutException: b"),
            exception_record("TimeoutException: c"),
        ])];
        let results = RuleClassifier::classify(&at_threshold, &config);
        assert_eq!(results.detected_issues.len(), 1);
        assert_eq!(results.error_summary.recurrent_patterns, 1);

        let below_threshold = vec![ok_table(vec![
            exception_record("TimeoutException: a"),
            exception_record("TimeoutException: b"),
        ])];
        let results = RuleClassifier::classify(&below_threshold, &config);
        assert!(results.detected_issues.is_empty());
        assert_eq!(results.error_summary.recurrent_patterns, 0);
    }

    #[test]
    fn recurrence_counts_span_tables() {
        let config = config_with(3);
        let tables = vec![
            ok_table(vec![
                exception_record("TimeoutException: a"),
                exception_record("TimeoutException: b"),
            ]),
            ok_table(vec![exception_record("TimeoutException: c")]),
        ];

        let results = RuleClassifier::classify(&tables, &config);
        assert_eq!(results.error_summary.recurrent_patterns, 1);
        assert_eq!(results.detected_issues[0].occurrences, 3);
    }

    #[test]
    fn concrete_recurrence_scenario() {
        // Five exception records: TimeoutException x4, ValidationException x1.
        let config = config_with(3);
        let tables = vec![ok_table(vec![
            exception_record("TimeoutException: call failed"),
            exception_record("TimeoutException: call failed"),
            exception_record("TimeoutException: call failed"),
            exception_record("TimeoutException: call failed"),
            exception_record("ValidationException: bad field"),
        ])];

        let results = RuleClassifier::classify(&tables, &config);
        assert_eq!(results.detected_issues.len(), 1);
        let issue = &results.detected_issues[0];
        assert_eq!(issue.pattern, "TimeoutException");
        assert_eq!(issue.occurrences, 4);
        assert_eq!(issue.issue_type, "RecurrentError");
        assert_eq!(issue.severity, Severity::Medium);
        assert!(!issue.escalation_required);
        assert!(issue.escalation_reason.is_empty());
        assert_eq!(results.error_summary.recurrent_patterns, 1);
    }

    #[test]
    fn escalation_requires_strictly_more_than_cutoff() {
        let config = config_with(1);

        let at_cutoff: Vec<NormalizedRecord> = (0..HIGH_VOLUME_ESCALATION_CUTOFF)
            .map(|_| exception_record("E: x"))
            .collect();
        let results = RuleClassifier::classify(&[ok_table(at_cutoff)], &config);
        assert!(!results.detected_issues[0].escalation_required);
        assert!(results.detected_issues[0].escalation_reason.is_empty());

        let over_cutoff: Vec<NormalizedRecord> = (0..=HIGH_VOLUME_ESCALATION_CUTOFF)
            .map(|_| exception_record("E: x"))
            .collect();
        let results = RuleClassifier::classify(&[ok_table(over_cutoff)], &config);
        assert!(results.detected_issues[0].escalation_required);
        assert!(!results.detected_issues[0].escalation_reason.is_empty());
    }

    #[test]
    fn performance_threshold_uses_method_name() {
        let mut config = config_with(3);
        config
            .response_time_thresholds
            .insert("SlowMethod".to_string(), 3000);

        let tables = vec![ok_table(vec![
            timing_record("00:00:04.500", Some("SlowMethod")),
            timing_record("00:00:02.000", Some("SlowMethod")),
        ])];

        let results = RuleClassifier::classify(&tables, &config);
        assert_eq!(results.error_summary.performance_issues, 1);
        assert_eq!(results.recommendations.short_term.len(), 1);
    }

    #[test]
    fn unparsable_elapsed_time_is_not_a_performance_issue() {
        let config = config_with(3);
        let tables = vec![ok_table(vec![timing_record("not-a-duration", None)])];

        let results = RuleClassifier::classify(&tables, &config);
        assert_eq!(results.error_summary.performance_issues, 0);
    }

    #[test]
    fn recommendations_follow_summary_triggers() {
        let config = config_with(10);
        let results = RuleClassifier::classify(&[ok_table(Vec::new())], &config);
        assert!(results.recommendations.immediate.is_empty());
        assert!(results.recommendations.short_term.is_empty());
        assert!(results.recommendations.long_term.is_empty());
    }

    #[test]
    fn classification_is_idempotent() {
        let config = default_configuration("AppSalud");
        let tables = vec![ok_table(vec![
            exception_record("ConnectionTimeout: x"),
            exception_record("ValidationException: y"),
            timing_record("00:00:30.000", Some("ConsultarAfiliado")),
        ])];

        let first = RuleClassifier::classify(&tables, &config);
        let second = RuleClassifier::classify(&tables, &config);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn pattern_extraction_edge_cases() {
        assert_eq!(RuleClassifier::extract_error_pattern(""), "Unknown");
        assert_eq!(RuleClassifier::extract_error_pattern("\n\n"), "UnknownError");
        assert_eq!(
            RuleClassifier::extract_error_pattern("TimeoutException: call failed"),
            "TimeoutException"
        );
        assert_eq!(
            RuleClassifier::extract_error_pattern("no colon here\nsecond line"),
            "no colon here"
        );
        // Leading colon: fall back to the trimmed first line.
        assert_eq!(RuleClassifier::extract_error_pattern(":odd"), ":odd");
    }
}
