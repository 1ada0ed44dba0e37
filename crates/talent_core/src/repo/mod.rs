//! Candidate repository and its local cache.
//!
//! # Responsibility
//! - Offer use-case level candidate operations over any `RecordStore`.
//! - Keep a local copy of candidates for degraded-mode reads.
//!
//! # Invariants
//! - Store failures never surface as errors from the repository.
//! - Writes report whether the store accepted them via `WriteOutcome`.

pub mod cache;
pub mod candidate_repo;
pub mod outcome;
