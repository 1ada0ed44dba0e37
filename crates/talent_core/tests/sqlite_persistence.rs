use talent_core::{
    filter, AnalysisResult, CandidateFilter, CandidateProfile, CandidateRepository,
    CandidateStatus, CommitMetrics, SqliteRecordStore, CANDIDATES_COLLECTION,
};
use talent_core::{RecordStore, ScoreBand};

fn analysis(username: &str, match_score: f64, benchmark: &str) -> AnalysisResult {
    AnalysisResult {
        profile: CandidateProfile::new(username),
        metrics: CommitMetrics {
            code_quality_score: match_score,
            consistency_score: match_score,
            collaboration_score: match_score,
            technical_diversity_score: match_score,
            overall_score: match_score,
            total_commits: 42.0,
        },
        match_score,
        benchmark: benchmark.to_string(),
    }
}

#[tokio::test]
async fn candidates_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("talent.sqlite3");

    let created = {
        let repo = CandidateRepository::new(SqliteRecordStore::open(&path).unwrap());
        let created = repo.upsert_from_analysis(analysis("ann", 88.0, "backend")).await;
        assert!(!created.is_degraded());
        let created = created.into_value();
        repo.update_status(&created.id, CandidateStatus::Reviewed).await;
        created
    };

    let repo = CandidateRepository::new(SqliteRecordStore::open(&path).unwrap());
    assert!(repo.cached().is_empty());

    let listed = repo.list().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    assert_eq!(listed[0].status, CandidateStatus::Reviewed);
    assert_eq!(listed[0].commit_metrics.total_commits, 42.0);
    assert_eq!(repo.cached(), listed);

    let by_username = repo.get_by_username("ann").await.unwrap();
    assert_eq!(by_username.id, created.id);
}

#[tokio::test]
async fn ingesting_same_username_twice_keeps_one_document() {
    let repo = CandidateRepository::new(SqliteRecordStore::open_in_memory().unwrap());

    let first = repo
        .upsert_from_analysis(analysis("ann", 60.0, "backend"))
        .await
        .into_value();
    let second = repo
        .upsert_from_analysis(analysis("ann", 90.0, "platform"))
        .await
        .into_value();

    assert_eq!(first.id, second.id);
    let records = repo.store().list_all(CANDIDATES_COLLECTION).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].fields["matchScore"], serde_json::json!(90.0));
    assert_eq!(records[0].fields["position"], "platform");
    assert!(records[0].fields.get("id").is_none());
}

#[tokio::test]
async fn deleted_candidates_are_gone_from_store_and_cache() {
    let repo = CandidateRepository::new(SqliteRecordStore::open_in_memory().unwrap());
    let created = repo
        .upsert_from_analysis(analysis("ann", 60.0, "backend"))
        .await
        .into_value();

    let deleted = repo.delete(&created.id).await;
    assert!(!deleted.is_degraded());
    assert!(repo.list().await.is_empty());
    assert_eq!(repo.get_by_id(&created.id).await, None);
}

#[tokio::test]
async fn listed_candidates_feed_filter_and_compare() {
    let repo = CandidateRepository::new(SqliteRecordStore::open_in_memory().unwrap());
    for (name, score) in [("ann", 91.0), ("bob", 74.0), ("cy", 40.0)] {
        repo.upsert_from_analysis(analysis(name, score, "backend")).await;
    }
    let listed = repo.list().await;

    let high = CandidateFilter {
        score: ScoreBand::High,
        ..CandidateFilter::default()
    };
    let picked = filter(&listed, &high);
    assert_eq!(picked.len(), 1);
    assert_eq!(picked[0].github_username, "ann");

    let searched = filter(
        &listed,
        &CandidateFilter::from_params("B", "pending", "backend", "medium"),
    );
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].github_username, "bob");

    let comparison = repo.compare(&listed[0].id, &listed[1].id).unwrap();
    assert_eq!(comparison.overall_winner.github_username, "ann");
    assert_eq!(comparison.metrics.match_score.difference, 17.0);
    // Equal commit counts go to the second candidate.
    assert_eq!(comparison.candidate1_wins, 6);
    assert_eq!(comparison.candidate2_wins, 1);
}
