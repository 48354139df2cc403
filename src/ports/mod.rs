//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `LogStore` - time-windowed raw record queries against the table store
//! - `ChatModel` - one-shot chat completions against the LLM provider
//! - `ConfigurationSource` - backing source for analysis configuration
//! - `AuditSink` - fire-and-forget analysis audit notifications

mod audit_sink;
mod chat_model;
mod configuration_source;
mod log_store;

pub use audit_sink::{AnalysisCompleted, AnalysisFailed, AnalysisStarted, AuditSink};
pub use chat_model::{ChatModel, ChatModelError};
pub use configuration_source::{ConfigurationSource, ConfigurationSourceError};
pub use log_store::{LogQuery, LogQueryResponse, LogStore, LogStoreError, TableRecords};
