//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `analysis` - Records, application profiles, configuration, and the
//!   deterministic rule classification engine

pub mod analysis;
