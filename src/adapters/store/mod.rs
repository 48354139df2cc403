//! Log store adapters - LogStore implementations.

pub mod in_memory;

pub use in_memory::InMemoryLogStore;
