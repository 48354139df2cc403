//! Log Triage - Log Analysis Pipeline
//!
//! This crate ingests time-windowed log records from a per-application table
//! store, normalizes and filters them, and produces a structured diagnostic
//! report through either a deterministic rule engine or an LLM-backed
//! classifier with automatic rule fallback.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
