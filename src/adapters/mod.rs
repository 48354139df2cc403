//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `llm` - chat-completion transport (Azure OpenAI-compatible)
//! - `store` - log record stores (in-memory)
//! - `config` - analysis configuration sources (file, cached)
//! - `audit` - audit sinks (tracing)
//! - `http` - REST API surface

pub mod audit;
pub mod config;
pub mod http;
pub mod llm;
pub mod store;

pub use audit::TracingAuditSink;
pub use config::{CachedConfigurationSource, FileConfigurationSource};
pub use http::{analysis_routes, AnalysisAppState};
pub use llm::{OpenAiChatConfig, OpenAiChatModel};
pub use store::InMemoryLogStore;
