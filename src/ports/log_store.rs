//! Log Store Port - query collaborator for the per-application table store.
//!
//! The store applies the time-range filter server-side where possible and
//! reports each table independently: a failed table is a soft error carried
//! in its status, not a failure of the whole query.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::analysis::{QueryStatus, RawRecord};

/// Port for querying time-windowed log records.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Queries the requested tables over the given UTC window, returning up
    /// to `max_records_per_table` raw rows per table.
    async fn query(&self, query: &LogQuery) -> Result<LogQueryResponse, LogStoreError>;
}

/// Parameters for one store query.
#[derive(Debug, Clone)]
pub struct LogQuery {
    /// Logical application name; resolves the backing store.
    pub application_name: String,
    /// Tables to query.
    pub table_names: Vec<String>,
    /// Inclusive window start, UTC.
    pub start_utc: DateTime<Utc>,
    /// Inclusive window end, UTC.
    pub end_utc: DateTime<Utc>,
    /// Row ceiling per table.
    pub max_records_per_table: usize,
}

/// Raw rows for one queried table.
#[derive(Debug, Clone)]
pub struct TableRecords {
    pub table_name: String,
    pub status: QueryStatus,
    pub error_message: Option<String>,
    /// Rows returned, truncated to the requested ceiling.
    pub records: Vec<RawRecord>,
}

impl TableRecords {
    /// Creates a successful per-table result.
    pub fn ok(table_name: impl Into<String>, records: Vec<RawRecord>) -> Self {
        Self {
            table_name: table_name.into(),
            status: QueryStatus::Ok,
            error_message: None,
            records,
        }
    }

    /// Creates a failed per-table result (soft error).
    pub fn failed(table_name: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            status: QueryStatus::Error,
            error_message: Some(error_message.into()),
            records: Vec::new(),
        }
    }

    /// Number of rows returned.
    pub fn records_returned(&self) -> u32 {
        self.records.len() as u32
    }
}

/// Per-table results for one query.
#[derive(Debug, Clone)]
pub struct LogQueryResponse {
    pub application_name: String,
    pub tables: Vec<TableRecords>,
}

impl LogQueryResponse {
    /// Total rows returned across all tables.
    pub fn total_records(&self) -> u32 {
        self.tables.iter().map(TableRecords::records_returned).sum()
    }
}

/// Log store errors.
#[derive(Debug, thiserror::Error)]
pub enum LogStoreError {
    /// No backing store is configured for the application.
    #[error("no store configured for application '{application_name}'")]
    UnknownApplication { application_name: String },

    /// The store could not be reached at all.
    #[error("store connection failed: {0}")]
    Connection(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::FieldValue;

    #[test]
    fn total_records_sums_across_tables() {
        let response = LogQueryResponse {
            application_name: "App".to_string(),
            tables: vec![
                TableRecords::ok(
                    "A",
                    vec![RawRecord::new().with_field("F", FieldValue::text("x"))],
                ),
                TableRecords::failed("B", "table not found"),
            ],
        };
        assert_eq!(response.total_records(), 1);
    }
}
