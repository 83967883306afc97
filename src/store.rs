//! Result Aggregator: accumulates per-name record lists and produces the
//! serializable snapshot. No I/O happens here.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One case's extracted fields, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseRecord(IndexMap<String, String>);

impl CaseRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a field. A repeated field name keeps the new value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// Look up a field value.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fields in commit order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// All records extracted in one run, keyed by the submitted query name.
///
/// Keys are exactly the queries committed so far, in submission order; a
/// failed or empty query keeps its key with an empty list.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    entries: IndexMap<String, Vec<CaseRecord>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit one query's results. Re-recording a name overwrites its
    /// previous results rather than appending.
    pub fn record(&mut self, name: impl Into<String>, results: Vec<CaseRecord>) {
        self.entries.insert(name.into(), results);
    }

    /// Records committed for one query, if it was submitted.
    pub fn get(&self, name: &str) -> Option<&[CaseRecord]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Number of queries committed.
    pub fn queries(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all per-query record counts.
    pub fn total_records(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Build the serializable view of the store.
    pub fn snapshot(&self, source_url: &str) -> Snapshot {
        Snapshot {
            metadata: Metadata {
                extraction_timestamp: Utc::now(),
                total_record_count: self.total_records(),
                queried_names: self.entries.keys().cloned().collect(),
                source_url: source_url.to_string(),
            },
            records: self.entries.clone(),
        }
    }
}

/// Serializable view of a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: Metadata,
    pub records: IndexMap<String, Vec<CaseRecord>>,
}

/// Run metadata attached to a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub extraction_timestamp: DateTime<Utc>,
    pub total_record_count: usize,
    pub queried_names: Vec<String>,
    pub source_url: String,
}
