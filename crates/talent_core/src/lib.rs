//! Candidate pipeline core.
//!
//! Best-effort candidate persistence over a document record store, a local
//! cache used when the store is unreachable, and pure filter/compare helpers.

pub mod config;
pub mod db;
pub mod id;
pub mod logging;
pub mod matcher;
pub mod model;
pub mod repo;
pub mod store;

pub use config::{ConfigError, ConfigResult, TalentConfig};
pub use id::{IdentifierGenerator, SequentialIdGenerator, UuidGenerator};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use matcher::compare::{
    compare_candidates, CandidateComparison, ComparedMetric, ComparisonMetrics, MetricComparison,
};
pub use matcher::filter::{filter, CandidateFilter, PositionFilter, ScoreBand, StatusFilter};
pub use model::analysis::{AnalysisResult, CandidateProfile};
pub use model::candidate::{
    Candidate, CandidateId, CandidateStatus, CommitMetrics, RecordDecodeError, UnknownStatus,
};
pub use repo::cache::CandidateCache;
pub use repo::candidate_repo::{CandidateRepository, CANDIDATES_COLLECTION};
pub use repo::outcome::WriteOutcome;
pub use store::{
    Document, InMemoryRecordStore, RecordStore, SqliteRecordStore, StoreError, StoreResult,
    StoredRecord,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
