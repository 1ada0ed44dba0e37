//! Domain model for the candidate pipeline.
//!
//! # Responsibility
//! - Define canonical data structures used by repository and matcher.
//! - Own the mapping between typed records and store documents.
//!
//! # Invariants
//! - Every candidate is identified by a stable `CandidateId`.
//! - `github_username` is unique per candidate by convention, not enforcement.

pub mod analysis;
pub mod candidate;
