//! SQLite backing for the document store.
//!
//! Candidate documents are JSON text queried with SQLite's JSON1 functions,
//! so a connection is only handed out once JSON support has been confirmed
//! and the document schema is current.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The linked SQLite was built without JSON1.
    JsonUnsupported(rusqlite::Error),
    /// The file was written by a newer document schema than this build knows.
    SchemaTooNew { found: u32, supported: u32 },
    /// One schema step failed; earlier steps in the same run are rolled back.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::JsonUnsupported(err) => {
                write!(f, "sqlite JSON functions unavailable for document storage: {err}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "document schema v{found} is newer than this build supports (v{supported})"
            ),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "document schema step v{version} `{name}` failed: {source}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::JsonUnsupported(err) => Some(err),
            Self::Migration { source, .. } => Some(source),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
