//! Configuration source adapters - ConfigurationSource implementations.

pub mod cached;
pub mod file_source;

pub use cached::CachedConfigurationSource;
pub use file_source::FileConfigurationSource;
