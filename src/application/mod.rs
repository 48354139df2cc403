//! Application services orchestrating the domain over the ports.

pub mod llm_classifier;
pub mod orchestrator;

pub use llm_classifier::{ClassificationOutcome, LlmClassifier};
pub use orchestrator::{
    AnalysisError, AnalysisMode, AnalysisOrchestrator, AnalysisRequest, AnalysisResponse,
    AuditRecord, DEFAULT_MAX_RECORDS,
};
