//! Process-local candidate cache.
//!
//! # Responsibility
//! - Hold the last known candidate list as a degraded-mode fallback.
//! - Apply the same mutations the repository sends to the store.
//!
//! # Invariants
//! - Every mutation happens under one write lock; readers never see a
//!   half-applied change.
//! - A poisoned lock is recovered; the cache never panics its callers.
//! - The cache is never authoritative while the store is reachable.

use crate::model::candidate::{Candidate, CandidateStatus};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cloneable handle to a shared candidate list.
///
/// Clones share the same underlying list, so a cache can be injected into a
/// repository and still be inspected by its owner.
#[derive(Debug, Clone, Default)]
pub struct CandidateCache {
    entries: Arc<RwLock<Vec<Candidate>>>,
}

impl CandidateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache pre-populated with `candidates`.
    pub fn with_entries(candidates: Vec<Candidate>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(candidates)),
        }
    }

    /// Copy of the current list.
    pub fn snapshot(&self) -> Vec<Candidate> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn find_by_id(&self, id: &str) -> Option<Candidate> {
        self.read().iter().find(|c| c.id == id).cloned()
    }

    pub fn find_by_username(&self, github_username: &str) -> Option<Candidate> {
        self.read()
            .iter()
            .find(|c| c.github_username == github_username)
            .cloned()
    }

    /// Replaces the whole list.
    pub fn replace_all(&self, candidates: Vec<Candidate>) {
        *self.write() = candidates;
    }

    /// Inserts at the front of the list.
    pub fn prepend(&self, candidate: Candidate) {
        self.write().insert(0, candidate);
    }

    /// Replaces every entry sharing the candidate's username, or prepends it
    /// when none exists. Returns whether an entry was replaced.
    pub fn upsert_by_username(&self, candidate: Candidate) -> bool {
        let mut entries = self.write();
        let mut replaced = false;
        for entry in entries
            .iter_mut()
            .filter(|entry| entry.github_username == candidate.github_username)
        {
            *entry = candidate.clone();
            replaced = true;
        }
        if !replaced {
            entries.insert(0, candidate);
        }
        replaced
    }

    /// Sets the status of the entry with `id`, returning the updated entry.
    pub fn set_status(&self, id: &str, status: CandidateStatus) -> Option<Candidate> {
        let mut entries = self.write();
        let entry = entries.iter_mut().find(|c| c.id == id)?;
        entry.status = status;
        Some(entry.clone())
    }

    /// Removes every entry with `id`. Returns whether anything was removed.
    pub fn remove(&self, id: &str) -> bool {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|c| c.id != id);
        entries.len() != before
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Candidate>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Candidate>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
