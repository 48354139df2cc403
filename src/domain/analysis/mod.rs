//! Log analysis domain - records, profiles, configuration, and the
//! deterministic classification engine.
//!
//! Everything here is pure in-memory work: no I/O, no clocks, no randomness.

pub mod configuration;
pub mod normalizer;
pub mod profile;
pub mod record;
pub mod results;
pub mod rule_classifier;
pub mod tables;

pub use configuration::{
    default_configuration, default_global_configuration, AnalysisConfiguration, ErrorPatterns,
    GlobalAnalysisConfiguration, FALLBACK_RESPONSE_TIME_MS,
};
pub use normalizer::RecordNormalizer;
pub use record::{
    canonical_timestamp, parse_elapsed_ms, FieldValue, NormalizedRecord, RawRecord,
    EXCEPTION_FIELD, NAME_METHOD_FIELD, ROW_KEY_FIELD, TIMESTAMP_FIELD, TIME_SERVICE_FIELD,
    TYPE_FIELD,
};
pub use profile::ApplicationProfile;
pub use results::{
    AnalysisResults, DetectedIssue, ErrorSummary, PerformanceAnalysis, Recommendations, Severity,
    SlowService, MAX_SUGGESTED_ACTIONS,
};
pub use rule_classifier::{RuleClassifier, HIGH_VOLUME_ESCALATION_CUTOFF};
pub use tables::{NormalizedTable, QueryStatus};
