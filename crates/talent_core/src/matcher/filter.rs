//! Candidate list filtering.
//!
//! # Invariants
//! - Filtering is pure: no I/O, input order preserved.
//! - A neutral [`CandidateFilter`] keeps every candidate.
//! - Score bands partition the score line at 70 and 85 without gaps.
//! - Building a filter never fails: an unknown band adds no constraint and an
//!   unknown status matches nothing.

use crate::model::candidate::{Candidate, CandidateStatus};

/// Lower bound (inclusive) of the high band.
pub const HIGH_SCORE_MIN: f64 = 85.0;
/// Lower bound (inclusive) of the medium band.
pub const MEDIUM_SCORE_MIN: f64 = 70.0;

const ALL: &str = "all";

/// Match-score bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScoreBand {
    #[default]
    All,
    /// `score >= 85`
    High,
    /// `70 <= score < 85`
    Medium,
    /// `score < 70`
    Low,
}

impl ScoreBand {
    /// The concrete band a score falls into; never `All`.
    pub fn classify(score: f64) -> Self {
        if score >= HIGH_SCORE_MIN {
            Self::High
        } else if score >= MEDIUM_SCORE_MIN {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn contains(self, score: f64) -> bool {
        match self {
            Self::All => true,
            Self::High => score >= HIGH_SCORE_MIN,
            Self::Medium => (MEDIUM_SCORE_MIN..HIGH_SCORE_MIN).contains(&score),
            Self::Low => score < MEDIUM_SCORE_MIN,
        }
    }
}

/// Unrecognised band names put no constraint on the score.
impl From<&str> for ScoreBand {
    fn from(value: &str) -> Self {
        match value.trim() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::All,
        }
    }
}

/// Status criterion; `All` matches every status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(CandidateStatus),
    /// A status no candidate can have; matches nothing.
    Other(String),
}

impl StatusFilter {
    pub fn matches(&self, status: CandidateStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => *expected == status,
            Self::Other(_) => false,
        }
    }
}

impl From<&str> for StatusFilter {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value == ALL {
            return Self::All;
        }
        match CandidateStatus::parse(value) {
            Some(status) => Self::Only(status),
            None => Self::Other(value.to_string()),
        }
    }
}

/// Position criterion; `All` matches every benchmark label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PositionFilter {
    #[default]
    All,
    Only(String),
}

impl PositionFilter {
    pub fn matches(&self, position: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == position,
        }
    }
}

impl From<&str> for PositionFilter {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value == ALL {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }
}

/// Conjunction of the four list criteria.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateFilter {
    /// Case-insensitive substring of name or GitHub username; empty matches all.
    pub search_term: String,
    pub status: StatusFilter,
    pub position: PositionFilter,
    pub score: ScoreBand,
}

impl CandidateFilter {
    /// Builds a filter from raw UI values, where `all` means "no constraint".
    pub fn from_params(search_term: &str, status: &str, position: &str, score: &str) -> Self {
        Self {
            search_term: search_term.to_string(),
            status: StatusFilter::from(status),
            position: PositionFilter::from(position),
            score: ScoreBand::from(score),
        }
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        self.matches_with_needle(candidate, &self.search_term.to_lowercase())
    }

    fn matches_with_needle(&self, candidate: &Candidate, needle: &str) -> bool {
        candidate.matches_search(needle)
            && self.status.matches(candidate.status)
            && self.position.matches(&candidate.position)
            && self.score.contains(candidate.match_score)
    }
}

/// Returns the candidates passing every criterion, in input order.
pub fn filter(candidates: &[Candidate], criteria: &CandidateFilter) -> Vec<Candidate> {
    let needle = criteria.search_term.to_lowercase();
    candidates
        .iter()
        .filter(|candidate| criteria.matches_with_needle(candidate, &needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::candidate::CommitMetrics;

    fn candidate(name: &str, username: &str, score: f64) -> Candidate {
        Candidate {
            id: username.to_string(),
            name: name.to_string(),
            email: format!("{username}@example.com"),
            github_username: username.to_string(),
            avatar_url: None,
            match_score: score,
            status: CandidateStatus::Pending,
            commit_metrics: CommitMetrics::default(),
            position: "backend".to_string(),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn neutral_filter_is_identity() {
        let list = vec![candidate("Ann", "ann", 12.0)];
        let criteria = CandidateFilter::from_params("", "all", "all", "all");
        assert_eq!(criteria, CandidateFilter::default());
        assert_eq!(filter(&list, &criteria), list);
    }

    #[test]
    fn score_bands_split_at_seventy_and_eighty_five() {
        let classified: Vec<ScoreBand> = [69.0, 70.0, 84.0, 85.0]
            .into_iter()
            .map(ScoreBand::classify)
            .collect();
        assert_eq!(
            classified,
            vec![
                ScoreBand::Low,
                ScoreBand::Medium,
                ScoreBand::Medium,
                ScoreBand::High
            ]
        );

        assert!(ScoreBand::Medium.contains(84.999));
        assert!(!ScoreBand::Medium.contains(85.0));
        assert!(ScoreBand::Low.contains(69.999));
        assert!(!ScoreBand::Low.contains(70.0));
    }

    #[test]
    fn every_criterion_must_hold() {
        let mut hired = candidate("Grace Hopper", "ghopper", 91.0);
        hired.status = CandidateStatus::Hired;
        let mut frontend = candidate("Grace Kelly", "gkelly", 91.0);
        frontend.position = "frontend".to_string();
        let low = candidate("Grace Low", "glow", 40.0);
        let list = vec![hired.clone(), frontend, low];

        let criteria = CandidateFilter::from_params("GRACE", "hired", "backend", "high");
        assert_eq!(filter(&list, &criteria), vec![hired]);

        let by_username = CandidateFilter {
            search_term: "KELLY".to_string(),
            ..CandidateFilter::default()
        };
        assert_eq!(filter(&list, &by_username).len(), 1);
    }

    #[test]
    fn unknown_score_band_keeps_every_score() {
        let list = vec![
            candidate("Ann", "ann", 95.0),
            candidate("Bob", "bob", 40.0),
        ];
        let criteria = CandidateFilter::from_params("", "all", "all", "excellent");
        assert_eq!(criteria.score, ScoreBand::All);
        assert_eq!(filter(&list, &criteria), list);
    }

    #[test]
    fn unknown_status_matches_no_candidate() {
        let list = vec![candidate("Ann", "ann", 95.0)];
        let criteria = CandidateFilter::from_params("", "archived", "all", "all");
        assert_eq!(criteria.status, StatusFilter::Other("archived".to_string()));
        assert!(filter(&list, &criteria).is_empty());
    }

    #[test]
    fn filter_values_are_trimmed() {
        let criteria = CandidateFilter::from_params("", " hired ", " all ", " high ");
        assert_eq!(criteria.status, StatusFilter::Only(CandidateStatus::Hired));
        assert_eq!(criteria.position, PositionFilter::All);
        assert_eq!(criteria.score, ScoreBand::High);
        assert_eq!(
            PositionFilter::from(" backend "),
            PositionFilter::Only("backend".to_string())
        );
    }
}
