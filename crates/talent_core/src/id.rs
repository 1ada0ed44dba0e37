//! Identifier generation for new candidates.
//!
//! The repository asks one generator for every new id and uses it as both
//! the record primary key and the store document id.

use crate::model::candidate::CandidateId;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of fresh candidate identifiers.
pub trait IdentifierGenerator: Send + Sync {
    fn next_id(&self) -> CandidateId;
}

/// Random UUID v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdentifierGenerator for UuidGenerator {
    fn next_id(&self) -> CandidateId {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `<prefix>-<n>` identifiers, starting at 1.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdentifierGenerator for SequentialIdGenerator {
    fn next_id(&self) -> CandidateId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}
