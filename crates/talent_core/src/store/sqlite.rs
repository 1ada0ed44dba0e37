//! SQLite-backed record store.
//!
//! # Responsibility
//! - Persist documents as JSON text in the `documents` table.
//! - Keep SQL details inside the store boundary.
//!
//! # Invariants
//! - `(collection, id)` is unique; inserting an existing id replaces its fields.
//! - Reads return records ordered by insertion sequence.
//! - Persisted `fields` must decode to a JSON object.

use super::{merge_fields, Document, RecordStore, StoreError, StoreResult, StoredRecord};
use crate::db::{open_db, open_db_in_memory};
use async_trait::async_trait;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const DOCUMENT_SELECT_SQL: &str = "SELECT id, fields FROM documents";

/// [`RecordStore`] over a single SQLite connection.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".to_string()))
    }

    fn list_all_blocking(&self, collection: &str) -> StoreResult<Vec<StoredRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{DOCUMENT_SELECT_SQL} WHERE collection = ?1 ORDER BY seq ASC;"
        ))?;
        let mut rows = stmt.query([collection])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_document_row(row)?);
        }
        Ok(records)
    }

    fn get_by_id_blocking(&self, collection: &str, id: &str) -> StoreResult<Option<StoredRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{DOCUMENT_SELECT_SQL} WHERE collection = ?1 AND id = ?2;"
        ))?;
        let mut rows = stmt.query(params![collection, id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_document_row(row)?)),
            None => Ok(None),
        }
    }

    fn query_equals_blocking(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<StoredRecord>> {
        let path = json_path(field)?;
        let encoded = serde_json::to_string(value)?;

        // The path is inlined so expression indexes on it can be used.
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{DOCUMENT_SELECT_SQL}
             WHERE collection = ?1
               AND json_extract(fields, '{path}') = json_extract(?2, '$')
             ORDER BY seq ASC;"
        ))?;
        let mut rows = stmt.query(params![collection, encoded])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_document_row(row)?);
        }
        Ok(records)
    }

    fn insert_blocking(
        &self,
        collection: &str,
        id: Option<&str>,
        fields: &Document,
    ) -> StoreResult<String> {
        let id = id.map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
        let encoded = serde_json::to_string(fields)?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO documents (collection, id, fields)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (collection, id) DO UPDATE SET
                fields = excluded.fields,
                updated_at = (CAST(strftime('%s', 'now') AS INTEGER) * 1000);",
            params![collection, id, encoded],
        )?;

        debug!("event=document_insert module=store status=ok collection={collection} id={id}");
        Ok(id)
    }

    fn update_fields_blocking(
        &self,
        collection: &str,
        id: &str,
        partial: Document,
    ) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let current: Option<String> = tx
            .query_row(
                "SELECT fields FROM documents WHERE collection = ?1 AND id = ?2;",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(current) = current else {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        };

        let mut fields = decode_fields(id, &current)?;
        merge_fields(&mut fields, partial);

        tx.execute(
            "UPDATE documents
             SET
                fields = ?1,
                updated_at = (CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             WHERE collection = ?2 AND id = ?3;",
            params![serde_json::to_string(&fields)?, collection, id],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn delete_by_id_blocking(&self, collection: &str, id: &str) -> StoreResult<()> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2;",
            params![collection, id],
        )?;
        debug!(
            "event=document_delete module=store status=ok collection={collection} id={id} changed={changed}"
        );
        Ok(())
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn list_all(&self, collection: &str) -> StoreResult<Vec<StoredRecord>> {
        self.list_all_blocking(collection)
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<StoredRecord>> {
        self.get_by_id_blocking(collection, id)
    }

    async fn query_equals(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<StoredRecord>> {
        self.query_equals_blocking(collection, field, value)
    }

    async fn insert(
        &self,
        collection: &str,
        id: Option<&str>,
        fields: Document,
    ) -> StoreResult<String> {
        self.insert_blocking(collection, id, &fields)
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        partial: Document,
    ) -> StoreResult<()> {
        self.update_fields_blocking(collection, id, partial)
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.delete_by_id_blocking(collection, id)
    }
}

fn parse_document_row(row: &Row<'_>) -> StoreResult<StoredRecord> {
    let id: String = row.get("id")?;
    let raw: String = row.get("fields")?;
    let fields = decode_fields(&id, &raw)?;
    Ok(StoredRecord { id, fields })
}

fn decode_fields(id: &str, raw: &str) -> StoreResult<Document> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::InvalidData(format!(
            "document `{id}` holds non-object JSON `{other}`"
        ))),
    }
}

fn json_path(field: &str) -> StoreResult<String> {
    if field.is_empty() || field.contains(['"', '\'']) {
        return Err(StoreError::InvalidData(format!(
            "unsupported query field name `{field}`"
        )));
    }
    Ok(format!("$.\"{field}\""))
}
