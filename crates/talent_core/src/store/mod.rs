//! Record store contract and implementations.
//!
//! # Responsibility
//! - Define the document-store capability the repository depends on.
//! - Provide SQLite-backed and in-process implementations.
//!
//! # Invariants
//! - Lookup misses are `Ok(None)` / empty lists, never errors.
//! - `update_fields` merges top-level keys and fails with `NotFound` for a
//!   missing document.
//! - `delete_by_id` on a missing document succeeds.
//! - Listing and equality queries return records in insertion order.

use crate::db::DbError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod memory;
mod sqlite;

pub use memory::InMemoryRecordStore;
pub use sqlite::SqliteRecordStore;

/// Field map of one stored document.
pub type Document = Map<String, Value>;

pub type StoreResult<T> = Result<T, StoreError>;

/// One document as returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: String,
    pub fields: Document,
}

/// Failure reported by a record store call.
#[derive(Debug)]
pub enum StoreError {
    /// Backend unreachable or refusing work (network, auth, quota).
    Unavailable(String),
    /// Write targeted a document that does not exist.
    NotFound { collection: String, id: String },
    Db(DbError),
    Serialization(serde_json::Error),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "record store unavailable: {message}"),
            Self::NotFound { collection, id } => {
                write!(f, "document not found: {collection}/{id}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "document serialization failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid stored document: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Unavailable(_) | Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Per-collection document CRUD with equality queries.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Lists every document in `collection`.
    async fn list_all(&self, collection: &str) -> StoreResult<Vec<StoredRecord>>;

    /// Gets one document by id.
    async fn get_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<StoredRecord>>;

    /// Lists documents whose top-level `field` equals `value`.
    async fn query_equals(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<StoredRecord>>;

    /// Inserts a document and returns its id.
    ///
    /// The store assigns an id when `id` is `None`.
    async fn insert(
        &self,
        collection: &str,
        id: Option<&str>,
        fields: Document,
    ) -> StoreResult<String>;

    /// Merges `partial` into the top-level fields of an existing document.
    async fn update_fields(&self, collection: &str, id: &str, partial: Document)
        -> StoreResult<()>;

    /// Deletes one document by id.
    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<()>;
}

#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    async fn list_all(&self, collection: &str) -> StoreResult<Vec<StoredRecord>> {
        (**self).list_all(collection).await
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<StoredRecord>> {
        (**self).get_by_id(collection, id).await
    }

    async fn query_equals(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<StoredRecord>> {
        (**self).query_equals(collection, field, value).await
    }

    async fn insert(
        &self,
        collection: &str,
        id: Option<&str>,
        fields: Document,
    ) -> StoreResult<String> {
        (**self).insert(collection, id, fields).await
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        partial: Document,
    ) -> StoreResult<()> {
        (**self).update_fields(collection, id, partial).await
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<()> {
        (**self).delete_by_id(collection, id).await
    }
}

/// Shallow merge: every top-level key in `partial` replaces the one in `target`.
pub(crate) fn merge_fields(target: &mut Document, partial: Document) {
    for (key, value) in partial {
        target.insert(key, value);
    }
}
