//! Per-application analysis configuration.
//!
//! Loaded once from a backing source and cached process-wide; applications
//! without a source-provided entry fall back to built-in defaults.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Threshold applied when neither the method nor the `"default"` entry
/// resolves, in milliseconds.
pub const FALLBACK_RESPONSE_TIME_MS: i64 = 3000;

/// Error substrings grouped by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorPatterns {
    /// Substrings marking an error as critical.
    pub critical: Vec<String>,
    /// Substrings marking an error as a warning.
    pub warning: Vec<String>,
}

/// Analysis configuration for one application. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfiguration {
    /// Response-time thresholds per service name, in milliseconds. A
    /// `"default"` entry covers methods without their own threshold.
    pub response_time_thresholds: HashMap<String, i64>,
    /// Error substrings grouped by severity.
    pub error_patterns: ErrorPatterns,
    /// Minimum occurrence count (>= 1) for a pattern to count as recurrent.
    pub recurrence_threshold: u32,
}

impl Default for AnalysisConfiguration {
    fn default() -> Self {
        generic_default()
    }
}

impl AnalysisConfiguration {
    /// Resolves the response-time threshold for a method name, falling back
    /// to the `"default"` entry and then to [`FALLBACK_RESPONSE_TIME_MS`].
    pub fn threshold_for(&self, method_name: Option<&str>) -> i64 {
        method_name
            .and_then(|name| self.response_time_thresholds.get(name))
            .or_else(|| self.response_time_thresholds.get("default"))
            .copied()
            .unwrap_or(FALLBACK_RESPONSE_TIME_MS)
    }

    /// Returns true when the exception text matches any critical pattern,
    /// case-insensitively.
    pub fn is_critical(&self, exception_text: &str) -> bool {
        let lowered = exception_text.to_lowercase();
        self.error_patterns
            .critical
            .iter()
            .any(|pattern| lowered.contains(&pattern.to_lowercase()))
    }
}

/// Configuration for every application, as loaded from the backing source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalAnalysisConfiguration {
    /// Per-application configuration entries.
    pub applications: HashMap<String, AnalysisConfiguration>,
}

impl GlobalAnalysisConfiguration {
    /// Resolves the configuration for an application, substituting the
    /// built-in default when no entry exists. Absence is not an error.
    pub fn configuration_for(&self, application_name: &str) -> AnalysisConfiguration {
        self.applications
            .get(application_name)
            .cloned()
            .unwrap_or_else(|| default_configuration(application_name))
    }
}

fn thresholds(entries: &[(&str, i64)]) -> HashMap<String, i64> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

fn patterns(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

static APP_SALUD_DEFAULT: Lazy<AnalysisConfiguration> = Lazy::new(|| AnalysisConfiguration {
    response_time_thresholds: thresholds(&[
        ("ConsultarAfiliado", 20_000),
        ("AuthenticationService", 20_000),
        ("default", 20_000),
    ]),
    error_patterns: ErrorPatterns {
        critical: patterns(&[
            "JsonReaderException",
            "ConnectionTimeout",
            "OutOfMemoryException",
            "StackOverflowException",
        ]),
        warning: patterns(&["ValidationError", "SlowResponse", "RetryableError"]),
    },
    recurrence_threshold: 3,
});

static LINA_CHATBOT_DEFAULT: Lazy<AnalysisConfiguration> = Lazy::new(|| AnalysisConfiguration {
    response_time_thresholds: thresholds(&[("MessageProcessing", 1000), ("default", 2000)]),
    error_patterns: ErrorPatterns {
        critical: patterns(&["MessageDeliveryFailure", "AuthenticationFailure"]),
        warning: patterns(&["SlowProcessing", "RetryableError"]),
    },
    recurrence_threshold: 2,
});

fn generic_default() -> AnalysisConfiguration {
    AnalysisConfiguration {
        response_time_thresholds: thresholds(&[("default", FALLBACK_RESPONSE_TIME_MS)]),
        error_patterns: ErrorPatterns {
            critical: patterns(&["Exception", "Error", "Failed"]),
            warning: patterns(&["Warning", "Slow"]),
        },
        recurrence_threshold: 3,
    }
}

/// Built-in default configuration for an application name.
pub fn default_configuration(application_name: &str) -> AnalysisConfiguration {
    match application_name {
        "AppSalud" => APP_SALUD_DEFAULT.clone(),
        "LinaChatbot" => LINA_CHATBOT_DEFAULT.clone(),
        _ => generic_default(),
    }
}

/// Built-in global configuration used when no backing source entry exists.
pub fn default_global_configuration() -> GlobalAnalysisConfiguration {
    GlobalAnalysisConfiguration {
        applications: ["AppSalud", "LinaChatbot"]
            .into_iter()
            .map(|name| (name.to_string(), default_configuration(name)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_resolution_prefers_method_then_default_then_fallback() {
        let config = default_configuration("LinaChatbot");
        assert_eq!(config.threshold_for(Some("MessageProcessing")), 1000);
        assert_eq!(config.threshold_for(Some("SomethingElse")), 2000);
        assert_eq!(config.threshold_for(None), 2000);

        let empty = AnalysisConfiguration {
            response_time_thresholds: HashMap::new(),
            ..AnalysisConfiguration::default()
        };
        assert_eq!(empty.threshold_for(Some("X")), FALLBACK_RESPONSE_TIME_MS);
    }

    #[test]
    fn critical_matching_is_case_insensitive() {
        let config = default_configuration("AppSalud");
        assert!(config.is_critical("outofmemoryexception: heap exhausted"));
        assert!(config.is_critical("Nested ConnectionTimeout while calling backend"));
        assert!(!config.is_critical("ValidationError: bad field"));
    }

    #[test]
    fn unknown_application_resolves_to_generic_default() {
        let global = default_global_configuration();
        let config = global.configuration_for("UnknownApp");
        assert_eq!(config.recurrence_threshold, 3);
        assert_eq!(config.threshold_for(None), FALLBACK_RESPONSE_TIME_MS);
    }

    #[test]
    fn source_entries_win_over_defaults() {
        let mut global = GlobalAnalysisConfiguration::default();
        global.applications.insert(
            "AppSalud".to_string(),
            AnalysisConfiguration {
                recurrence_threshold: 7,
                ..AnalysisConfiguration::default()
            },
        );
        assert_eq!(global.configuration_for("AppSalud").recurrence_threshold, 7);
    }

    #[test]
    fn configuration_deserializes_camel_case() {
        let json = r#"{
            "responseTimeThresholds": {"default": 5000},
            "errorPatterns": {"critical": ["Timeout"], "warning": []},
            "recurrenceThreshold": 4
        }"#;
        let config: AnalysisConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(config.threshold_for(None), 5000);
        assert_eq!(config.recurrence_threshold, 4);
        assert!(config.is_critical("Timeout while connecting"));
    }
}
