//! Pairwise candidate comparison.
//!
//! # Invariants
//! - Differences are `first - second`, so swapping the pair negates them.
//! - A metric goes to the first candidate only when strictly greater; ties
//!   go to the second. The overall winner follows the same rule on win counts.
//! - Lookups read the cache only, never the store.

use crate::model::candidate::{Candidate, CandidateId};
use crate::repo::cache::CandidateCache;
use serde::Serialize;

/// One of the seven compared metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparedMetric {
    MatchScore,
    CodeQuality,
    Consistency,
    Collaboration,
    TechnicalDiversity,
    OverallScore,
    TotalCommits,
}

impl ComparedMetric {
    pub const ALL: [ComparedMetric; 7] = [
        ComparedMetric::MatchScore,
        ComparedMetric::CodeQuality,
        ComparedMetric::Consistency,
        ComparedMetric::Collaboration,
        ComparedMetric::TechnicalDiversity,
        ComparedMetric::OverallScore,
        ComparedMetric::TotalCommits,
    ];

    /// Reads this metric off a candidate.
    pub fn value(self, candidate: &Candidate) -> f64 {
        let metrics = &candidate.commit_metrics;
        match self {
            Self::MatchScore => candidate.match_score,
            Self::CodeQuality => metrics.code_quality_score,
            Self::Consistency => metrics.consistency_score,
            Self::Collaboration => metrics.collaboration_score,
            Self::TechnicalDiversity => metrics.technical_diversity_score,
            Self::OverallScore => metrics.overall_score,
            Self::TotalCommits => metrics.total_commits,
        }
    }
}

/// Outcome for a single metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    /// First candidate's value minus the second's.
    pub difference: f64,
    pub winner: CandidateId,
}

/// Per-metric breakdown of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonMetrics {
    pub match_score: MetricComparison,
    pub code_quality: MetricComparison,
    pub consistency: MetricComparison,
    pub collaboration: MetricComparison,
    pub technical_diversity: MetricComparison,
    pub overall_score: MetricComparison,
    pub total_commits: MetricComparison,
}

impl ComparisonMetrics {
    pub fn get(&self, metric: ComparedMetric) -> &MetricComparison {
        match metric {
            ComparedMetric::MatchScore => &self.match_score,
            ComparedMetric::CodeQuality => &self.code_quality,
            ComparedMetric::Consistency => &self.consistency,
            ComparedMetric::Collaboration => &self.collaboration,
            ComparedMetric::TechnicalDiversity => &self.technical_diversity,
            ComparedMetric::OverallScore => &self.overall_score,
            ComparedMetric::TotalCommits => &self.total_commits,
        }
    }

    /// Metrics paired with their outcome, in [`ComparedMetric::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (ComparedMetric, &MetricComparison)> {
        ComparedMetric::ALL
            .into_iter()
            .map(move |metric| (metric, self.get(metric)))
    }
}

/// Full result of comparing two candidates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateComparison {
    pub candidate1: Candidate,
    pub candidate2: Candidate,
    pub metrics: ComparisonMetrics,
    pub candidate1_wins: u32,
    pub candidate2_wins: u32,
    pub overall_winner: Candidate,
}

/// Compares two cached candidates; `None` when either id is not cached.
pub fn compare(cache: &CandidateCache, id1: &str, id2: &str) -> Option<CandidateComparison> {
    let first = cache.find_by_id(id1)?;
    let second = cache.find_by_id(id2)?;
    Some(compare_candidates(first, second))
}

/// Compares two candidate records metric by metric.
pub fn compare_candidates(first: Candidate, second: Candidate) -> CandidateComparison {
    let versus = |metric: ComparedMetric| {
        let a = metric.value(&first);
        let b = metric.value(&second);
        // TODO: decide whether ties should be reported as draws instead of
        // going to the second candidate.
        let winner = if a > b { &first.id } else { &second.id };
        MetricComparison {
            difference: a - b,
            winner: winner.clone(),
        }
    };

    let metrics = ComparisonMetrics {
        match_score: versus(ComparedMetric::MatchScore),
        code_quality: versus(ComparedMetric::CodeQuality),
        consistency: versus(ComparedMetric::Consistency),
        collaboration: versus(ComparedMetric::Collaboration),
        technical_diversity: versus(ComparedMetric::TechnicalDiversity),
        overall_score: versus(ComparedMetric::OverallScore),
        total_commits: versus(ComparedMetric::TotalCommits),
    };

    let mut candidate1_wins = 0;
    let mut candidate2_wins = 0;
    for (_, outcome) in metrics.iter() {
        if outcome.winner == first.id {
            candidate1_wins += 1;
        } else if outcome.winner == second.id {
            candidate2_wins += 1;
        }
    }

    let overall_winner = if candidate1_wins > candidate2_wins {
        first.clone()
    } else {
        second.clone()
    };

    CandidateComparison {
        candidate1: first,
        candidate2: second,
        metrics,
        candidate1_wins,
        candidate2_wins,
        overall_winner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::candidate::{CandidateStatus, CommitMetrics};

    fn candidate(id: &str, match_score: f64, metrics: CommitMetrics) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: id.to_string(),
            email: format!("{id}@example.com"),
            github_username: id.to_string(),
            avatar_url: None,
            match_score,
            status: CandidateStatus::Pending,
            commit_metrics: metrics,
            position: "backend".to_string(),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn majority_of_metrics_decides_overall_winner() {
        let a = candidate(
            "a",
            90.0,
            CommitMetrics {
                code_quality_score: 70.0,
                consistency_score: 80.0,
                collaboration_score: 80.0,
                technical_diversity_score: 80.0,
                overall_score: 80.0,
                total_commits: 500.0,
            },
        );
        let b = candidate(
            "b",
            60.0,
            CommitMetrics {
                code_quality_score: 70.0,
                consistency_score: 60.0,
                collaboration_score: 60.0,
                technical_diversity_score: 60.0,
                overall_score: 95.0,
                total_commits: 100.0,
            },
        );

        let result = compare_candidates(a, b);
        assert_eq!(result.metrics.match_score.winner, "a");
        assert_eq!(result.metrics.code_quality.winner, "b");
        assert_eq!(result.metrics.overall_score.winner, "b");
        assert_eq!(result.metrics.total_commits.difference, 400.0);
        assert_eq!(result.candidate1_wins, 5);
        assert_eq!(result.candidate2_wins, 2);
        assert_eq!(result.overall_winner.id, "a");
    }

    #[test]
    fn even_split_goes_to_second_candidate() {
        let metrics = CommitMetrics::default();
        let result = compare_candidates(
            candidate("a", 80.0, metrics),
            candidate("b", 80.0, metrics),
        );
        assert_eq!(result.metrics.match_score.winner, "b");
        assert_eq!(result.candidate1_wins, 0);
        assert_eq!(result.candidate2_wins, 7);
        assert_eq!(result.overall_winner.id, "b");
    }

    #[test]
    fn compare_reads_cache_only() {
        let metrics = CommitMetrics::default();
        let cache = CandidateCache::with_entries(vec![candidate("a", 10.0, metrics)]);
        assert!(compare(&cache, "a", "missing").is_none());
        assert!(compare(&cache, "missing", "a").is_none());

        cache.prepend(candidate("b", 20.0, metrics));
        let result = compare(&cache, "a", "b").unwrap();
        assert_eq!(result.metrics.match_score.difference, -10.0);
    }

    #[test]
    fn iter_follows_metric_order() {
        let metrics = CommitMetrics::default();
        let result = compare_candidates(
            candidate("a", 1.0, metrics),
            candidate("b", 2.0, metrics),
        );
        let order: Vec<ComparedMetric> = result.metrics.iter().map(|(m, _)| m).collect();
        assert_eq!(order, ComparedMetric::ALL.to_vec());
    }
}
