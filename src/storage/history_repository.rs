// src/storage/history_repository.rs

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::{error::AppError, models::history::HistoryRecord};

/// Storage port for the append-only exam history.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// All records in insertion order.
    async fn load(&self) -> Result<Vec<HistoryRecord>, AppError>;

    /// Appends `record` and returns it as stored. A record whose id is
    /// already taken is stored under the id suffixed `-1`, `-2`, ...
    async fn append(&self, record: HistoryRecord) -> Result<HistoryRecord, AppError>;

    async fn replace_all(&self, records: Vec<HistoryRecord>) -> Result<(), AppError>;

    async fn find(&self, id: &str) -> Result<Option<HistoryRecord>, AppError> {
        Ok(self.load().await?.into_iter().find(|r| r.id == id))
    }

    /// Records ordered most recent first. Equal timestamps keep the later append first.
    async fn recent(&self) -> Result<Vec<HistoryRecord>, AppError> {
        let mut records = self.load().await?;
        records.reverse();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    async fn latest(&self) -> Result<Option<HistoryRecord>, AppError> {
        Ok(self.recent().await?.into_iter().next())
    }
}

/// Suffixes the record id until it differs from every id in `existing`.
fn with_unique_id(mut record: HistoryRecord, existing: &[HistoryRecord]) -> HistoryRecord {
    let base = record.id.clone();
    let mut suffix = 1;
    while existing.iter().any(|r| r.id == record.id) {
        record.id = format!("{}-{}", base, suffix);
        suffix += 1;
    }
    record
}

/// On-disk layout of the history document: `{ "history": [...] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryDocument {
    #[serde(default)]
    history: Vec<HistoryRecord>,
}

/// JSON-file backed history store.
///
/// Every write rewrites the whole document through a temporary file and an
/// atomic rename. The mutex serializes read-modify-write cycles for this instance.
pub struct JsonFileHistoryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<HistoryDocument, AppError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(HistoryDocument::default());
            }
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(HistoryDocument::default());
        }

        serde_json::from_str(&raw).map_err(|e| {
            AppError::InternalServerError(format!(
                "Corrupt history document {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn write_document(&self, doc: &HistoryDocument) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(doc)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl HistoryRepository for JsonFileHistoryStore {
    async fn load(&self) -> Result<Vec<HistoryRecord>, AppError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_document().await?.history)
    }

    async fn append(&self, record: HistoryRecord) -> Result<HistoryRecord, AppError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read_document().await?;
        let record = with_unique_id(record, &doc.history);
        doc.history.push(record.clone());
        self.write_document(&doc).await?;
        Ok(record)
    }

    async fn replace_all(&self, records: Vec<HistoryRecord>) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        self.write_document(&HistoryDocument { history: records }).await
    }
}

/// In-memory history store, used by tests and as a throwaway backend.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    records: RwLock<Vec<HistoryRecord>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<HistoryRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryStore {
    async fn load(&self) -> Result<Vec<HistoryRecord>, AppError> {
        Ok(self.records.read().await.clone())
    }

    async fn append(&self, record: HistoryRecord) -> Result<HistoryRecord, AppError> {
        let mut records = self.records.write().await;
        let record = with_unique_id(record, &records);
        records.push(record.clone());
        Ok(record)
    }

    async fn replace_all(&self, records: Vec<HistoryRecord>) -> Result<(), AppError> {
        *self.records.write().await = records;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::collections::BTreeMap;

    fn record(id: &str, minutes_ago: i64) -> HistoryRecord {
        HistoryRecord {
            id: id.to_string(),
            timestamp: Utc::now() - Duration::minutes(minutes_ago),
            score: 50.0,
            correct_count: 0,
            total_questions: 0,
            results: Vec::new(),
            question_map: BTreeMap::new(),
            elapsed_seconds: 0,
            time_limit_seconds: 0,
        }
    }

    #[tokio::test]
    async fn json_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileHistoryStore::new(dir.path().join("nested").join("db.json"));

        assert!(store.load().await.unwrap().is_empty());

        store.append(record("a", 10)).await.unwrap();
        store.append(record("b", 5)).await.unwrap();

        let reopened = JsonFileHistoryStore::new(store.path());
        let ids: Vec<String> = reopened.load().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(reopened.latest().await.unwrap().unwrap().id, "b");
        assert!(reopened.find("a").await.unwrap().is_some());
        assert!(reopened.find("zzz").await.unwrap().is_none());

        reopened.replace_all(Vec::new()).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_appends_keep_ids_unique() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileHistoryStore::new(dir.path().join("db.json"));

        let (first, second, third) = tokio::join!(
            store.append(record("1700000000000", 0)),
            store.append(record("1700000000000", 0)),
            store.append(record("1700000000000", 0)),
        );
        let mut returned = vec![first.unwrap().id, second.unwrap().id, third.unwrap().id];
        returned.sort();
        assert_eq!(
            returned,
            vec!["1700000000000", "1700000000000-1", "1700000000000-2"]
        );

        let mut stored: Vec<String> = store.load().await.unwrap().into_iter().map(|r| r.id).collect();
        stored.sort();
        assert_eq!(stored, returned);
    }

    #[tokio::test]
    async fn in_memory_store_suffixes_taken_ids() {
        let store = InMemoryHistoryStore::with_records(vec![record("42", 5)]);
        let stored = store.append(record("42", 0)).await.unwrap();
        assert_eq!(stored.id, "42-1");
        assert!(store.find("42-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn json_store_reports_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "{ history: oops").unwrap();

        let store = JsonFileHistoryStore::new(&path);
        assert!(store.load().await.is_err());
        assert!(store.append(record("a", 0)).await.is_err());
        // The corrupt document is left untouched.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ history: oops");
    }

    #[tokio::test]
    async fn recent_orders_newest_first() {
        let store = InMemoryHistoryStore::with_records(vec![
            record("old", 30),
            record("new", 1),
            record("mid", 10),
        ]);

        let ids: Vec<String> = store.recent().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }
}
