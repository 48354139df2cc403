//! In-Memory Log Store - LogStore backed by per-application tables in
//! process memory.
//!
//! Applies the time-range filter and row ceiling server-side, the way a
//! remote table store would. An unknown application is a hard error; an
//! unknown table is a soft per-table error so one bad table name never
//! sinks the whole query.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::analysis::{FieldValue, RawRecord, TIMESTAMP_FIELD};
use crate::ports::{LogQuery, LogQueryResponse, LogStore, LogStoreError, TableRecords};

/// Tables for one application, keyed by table name.
type ApplicationTables = HashMap<String, Vec<RawRecord>>;

/// In-memory LogStore.
#[derive(Default)]
pub struct InMemoryLogStore {
    applications: RwLock<HashMap<String, ApplicationTables>>,
}

impl InMemoryLogStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an application so it resolves, even with no tables yet.
    pub async fn register_application(&self, application_name: impl Into<String>) {
        self.applications
            .write()
            .await
            .entry(application_name.into())
            .or_default();
    }

    /// Appends records to a table, creating application and table as needed.
    pub async fn insert_records(
        &self,
        application_name: &str,
        table_name: &str,
        records: Vec<RawRecord>,
    ) {
        let mut applications = self.applications.write().await;
        applications
            .entry(application_name.to_string())
            .or_default()
            .entry(table_name.to_string())
            .or_default()
            .extend(records);
    }

    /// Record timestamp for window filtering; records without a parseable
    /// Timestamp are kept, matching stores that filter only on the indexed
    /// column when present.
    fn in_window(record: &RawRecord, query: &LogQuery) -> bool {
        match record.get(TIMESTAMP_FIELD) {
            Some(FieldValue::Timestamp(ts)) => *ts >= query.start_utc && *ts <= query.end_utc,
            Some(FieldValue::Text(text)) => {
                match chrono::DateTime::parse_from_rfc3339(text) {
                    Ok(ts) => {
                        let ts = ts.with_timezone(&chrono::Utc);
                        ts >= query.start_utc && ts <= query.end_utc
                    }
                    Err(_) => true,
                }
            }
            _ => true,
        }
    }
}

#[async_trait]
impl LogStore for InMemoryLogStore {
    async fn query(&self, query: &LogQuery) -> Result<LogQueryResponse, LogStoreError> {
        let applications = self.applications.read().await;
        let tables = applications.get(&query.application_name).ok_or_else(|| {
            LogStoreError::UnknownApplication {
                application_name: query.application_name.clone(),
            }
        })?;

        let results = query
            .table_names
            .iter()
            .map(|table_name| match tables.get(table_name) {
                Some(records) => {
                    let rows: Vec<RawRecord> = records
                        .iter()
                        .filter(|record| Self::in_window(record, query))
                        .take(query.max_records_per_table)
                        .cloned()
                        .collect();
                    TableRecords::ok(table_name.clone(), rows)
                }
                None => TableRecords::failed(
                    table_name.clone(),
                    format!("table '{}' not found", table_name),
                ),
            })
            .collect();

        Ok(LogQueryResponse {
            application_name: query.application_name.clone(),
            tables: results,
        })
    }
}
