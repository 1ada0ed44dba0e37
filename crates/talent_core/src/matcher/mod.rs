//! Pure candidate matching helpers: list filtering and pairwise comparison.
//!
//! Nothing here performs I/O; comparison reads the candidate cache only.

pub mod compare;
pub mod filter;
