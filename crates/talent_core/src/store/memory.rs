//! In-process record store.
//!
//! Holds documents in memory, grouped by collection, in insertion order.
//! The availability switch makes every call fail with
//! [`StoreError::Unavailable`], which is how outages are exercised.

use super::{merge_fields, Document, RecordStore, StoreError, StoreResult, StoredRecord};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Memory-backed [`RecordStore`].
#[derive(Debug)]
pub struct InMemoryRecordStore {
    collections: RwLock<HashMap<String, Vec<StoredRecord>>>,
    available: AtomicBool,
    calls: AtomicU64,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
            calls: AtomicU64::new(0),
        }
    }

    /// Toggles simulated reachability.
    pub fn set_available(&self, available: bool) {
        debug!("event=store_availability module=store status=ok available={available}");
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// Number of store calls received, including rejected ones.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of documents in `collection`.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    fn check(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.is_available() {
            Ok(())
        } else {
            Err(StoreError::Unavailable(
                "in-memory store switched offline".to_string(),
            ))
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list_all(&self, collection: &str) -> StoreResult<Vec<StoredRecord>> {
        self.check()?;
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<StoredRecord>> {
        self.check()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|records| records.iter().find(|record| record.id == id))
            .cloned())
    }

    async fn query_equals(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<StoredRecord>> {
        self.check()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| record.fields.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(
        &self,
        collection: &str,
        id: Option<&str>,
        fields: Document,
    ) -> StoreResult<String> {
        self.check()?;
        let id = id.map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
        let mut collections = self.collections.write().await;
        let records = collections.entry(collection.to_string()).or_default();

        match records.iter_mut().find(|record| record.id == id) {
            Some(existing) => existing.fields = fields,
            None => records.push(StoredRecord {
                id: id.clone(),
                fields,
            }),
        }

        Ok(id)
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        partial: Document,
    ) -> StoreResult<()> {
        self.check()?;
        let mut collections = self.collections.write().await;
        let record = collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|record| record.id == id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        merge_fields(&mut record.fields, partial);
        Ok(())
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.check()?;
        let mut collections = self.collections.write().await;
        if let Some(records) = collections.get_mut(collection) {
            records.retain(|record| record.id != id);
        }
        Ok(())
    }
}
