//! Persistence port
//!
//! Consumers of verification output implement [`ResultStore`]. The engine only
//! writes; reading back is for consumers and tests.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::{const_mutex, Mutex};
use serde::{Deserialize, Serialize};
use speccheck_model::{CounterExample, VerificationGraphResult, VerificationResult};
use std::path::{Path, PathBuf};
use ulid::{Generator, Ulid};

/// What a stored record contains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record_type", content = "payload", rename_all = "snake_case")]
pub enum StoredPayload {
    /// Derivation graph analysis
    GraphResult(VerificationGraphResult),
    /// One law verification
    Verification(VerificationResult),
    /// A standalone counter-example
    CounterExample(CounterExample),
}

/// A payload plus storage bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Record id (sortable by creation time)
    pub id: Ulid,
    /// When the record was written
    pub stored_at: DateTime<Utc>,
    /// Content
    pub payload: StoredPayload,
}

/// Process-wide id source; ids increase even within one millisecond
static IDS: Mutex<Option<Generator>> = const_mutex(None);

fn next_id() -> Ulid {
    let mut ids = IDS.lock();
    match ids.get_or_insert_with(Generator::new).generate() {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("record id generator overflowed: {}", e);
            Ulid::new()
        }
    }
}

impl StoredRecord {
    fn new(payload: StoredPayload) -> Self {
        Self {
            id: next_id(),
            stored_at: Utc::now(),
            payload,
        }
    }
}

/// Sink for verification output
pub trait ResultStore: Send + Sync {
    /// Persist a payload, returning its record id
    ///
    /// # Errors
    /// Backend-specific write failures.
    fn put(&self, payload: StoredPayload) -> Result<Ulid, StoreError>;

    /// All stored records, oldest first
    ///
    /// # Errors
    /// Backend-specific read failures.
    fn records(&self) -> Result<Vec<StoredRecord>, StoreError>;

    /// Persist a graph result
    ///
    /// # Errors
    /// See [`ResultStore::put`].
    fn store_graph_result(&self, result: &VerificationGraphResult) -> Result<Ulid, StoreError> {
        self.put(StoredPayload::GraphResult(result.clone()))
    }

    /// Persist a law verification
    ///
    /// # Errors
    /// See [`ResultStore::put`].
    fn store_verification(&self, result: &VerificationResult) -> Result<Ulid, StoreError> {
        self.put(StoredPayload::Verification(result.clone()))
    }

    /// Persist a counter-example
    ///
    /// # Errors
    /// See [`ResultStore::put`].
    fn store_counter_example(&self, example: &CounterExample) -> Result<Ulid, StoreError> {
        self.put(StoredPayload::CounterExample(example.clone()))
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: DashMap<Ulid, StoredRecord>,
}

impl InMemoryStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ResultStore for InMemoryStore {
    fn put(&self, payload: StoredPayload) -> Result<Ulid, StoreError> {
        let record = StoredRecord::new(payload);
        let id = record.id;
        self.records.insert(id, record);
        Ok(id)
    }

    fn records(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let mut out: Vec<StoredRecord> = self.records.iter().map(|r| r.value().clone()).collect();
        out.sort_by_key(|r| r.id);
        Ok(out)
    }
}

/// One pretty-printed JSON file per record under a directory
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    /// Open (creating if needed) a store directory
    ///
    /// # Errors
    /// `StoreError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        Ok(Self { dir })
    }

    /// Store directory
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ResultStore for JsonDirStore {
    fn put(&self, payload: StoredPayload) -> Result<Ulid, StoreError> {
        let record = StoredRecord::new(payload);
        let path = self.dir.join(format!("{}.json", record.id));
        let bytes = serde_json::to_vec_pretty(&record)?;
        std::fs::write(&path, bytes).map_err(|e| StoreError::io(&path, e))?;
        tracing::debug!("stored record {} at {}", record.id, path.display());
        Ok(record.id)
    }

    fn records(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let mut out = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::io(&self.dir, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = std::fs::read(&path).map_err(|e| StoreError::io(&path, e))?;
            out.push(serde_json::from_slice(&bytes)?);
        }

        out.sort_by_key(|r: &StoredRecord| r.id);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use speccheck_model::{Law, TestInput};

    fn sample_verification() -> VerificationResult {
        VerificationResult::passed(Law::IdentityLaws, vec![TestInput::new(json!("x"))])
    }

    #[test]
    fn in_memory_roundtrip() {
        let store = InMemoryStore::new();
        let id = store.store_verification(&sample_verification()).unwrap();

        let records = store.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(
            records[0].payload,
            StoredPayload::Verification(sample_verification())
        );
    }

    #[test]
    fn records_come_back_in_write_order() {
        let store = InMemoryStore::new();
        let written: Vec<Ulid> = (0..200)
            .map(|i| {
                let result =
                    VerificationResult::passed(Law::IdentityLaws, vec![TestInput::new(json!(i))]);
                store.store_verification(&result).unwrap()
            })
            .collect();

        let read: Vec<Ulid> = store.records().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(read, written);
        for (i, record) in store.records().unwrap().iter().enumerate() {
            match &record.payload {
                StoredPayload::Verification(v) => {
                    assert_eq!(v.test_results()[0].value, json!(i));
                }
                other => panic!("unexpected payload {other:?}"),
            }
        }
    }

    #[test]
    fn json_dir_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(dir.path().join("records")).unwrap();

        let example = speccheck_model::CounterExample::new(
            TestInput::new(json!(1)),
            json!(2),
            json!(3),
            vec![],
        );
        store.store_verification(&sample_verification()).unwrap();
        store.store_counter_example(&example).unwrap();

        let records = store.records().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .any(|r| r.payload == StoredPayload::CounterExample(example.clone())));
    }

    #[test]
    fn payload_document_is_tagged() {
        let doc = serde_json::to_value(StoredPayload::Verification(sample_verification())).unwrap();
        assert_eq!(doc["record_type"], json!("verification"));
        assert_eq!(doc["payload"]["law_name"], json!("identity_laws"));
    }
}
