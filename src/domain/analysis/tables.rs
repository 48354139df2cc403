//! Per-table groupings flowing through the pipeline.

use serde::{Deserialize, Serialize};

use super::record::NormalizedRecord;

/// Outcome of querying one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryStatus {
    #[default]
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ERROR")]
    Error,
}

impl QueryStatus {
    /// Returns true for a successful query.
    pub fn is_ok(&self) -> bool {
        matches!(self, QueryStatus::Ok)
    }
}

/// Normalized records for one queried table.
///
/// A failed table is a soft error: it keeps its status and message and is
/// skipped by classification without aborting sibling tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizedTable {
    pub table_name: String,
    pub status: QueryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Raw rows returned by the store before normalization/dedup.
    pub records_returned: u32,
    pub records: Vec<NormalizedRecord>,
}

impl NormalizedTable {
    /// Creates a successful table result.
    pub fn ok(table_name: impl Into<String>, records: Vec<NormalizedRecord>, records_returned: u32) -> Self {
        Self {
            table_name: table_name.into(),
            status: QueryStatus::Ok,
            error_message: None,
            records_returned,
            records,
        }
    }

    /// Creates a failed table result.
    pub fn failed(table_name: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            status: QueryStatus::Error,
            error_message: Some(error_message.into()),
            records_returned: 0,
            records: Vec::new(),
        }
    }
}
