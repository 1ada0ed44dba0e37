//! Document schema steps.
//!
//! Each step is one SQL script; the highest applied step is kept in
//! `PRAGMA user_version`. All pending steps run in one transaction.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "documents",
        sql: include_str!("0001_documents.sql"),
    },
    SchemaStep {
        version: 2,
        name: "candidate_username_index",
        sql: include_str!("0002_candidate_username_index.sql"),
    },
];

/// Document schema version this build writes.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Document schema version recorded in the database.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings the document schema up to [`latest_version`].
///
/// Returns how many steps were applied; `0` when already current.
pub fn migrate(conn: &mut Connection) -> DbResult<usize> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<&SchemaStep> = STEPS.iter().filter(|step| step.version > found).collect();
    if pending.is_empty() {
        debug!("event=db_migrate module=db status=ok version={found} applied=0");
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::Migration {
                version: step.version,
                name: step.name,
                source,
            })?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from={found} to={supported} applied={}",
        pending.len()
    );
    Ok(pending.len())
}
