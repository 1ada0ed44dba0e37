//! Candidate repository over a record store with cache fallback.
//!
//! # Responsibility
//! - Translate candidate use cases into record store calls.
//! - Keep the injected [`CandidateCache`] in step with every write.
//! - Absorb store failures and answer from the cache instead.
//!
//! # Invariants
//! - No store error escapes as `Err`; reads fall back to the cache and writes
//!   report [`WriteOutcome::Degraded`].
//! - The cache is mutated on every write regardless of the store outcome.
//! - `github_username` is the merge key for analysis ingestion.
//! - New candidate ids come from the injected [`IdentifierGenerator`] and are
//!   used as the store document id.

use super::cache::CandidateCache;
use super::outcome::WriteOutcome;
use crate::id::{IdentifierGenerator, UuidGenerator};
use crate::matcher::compare::{self, CandidateComparison};
use crate::model::analysis::{AnalysisResult, CandidateProfile};
use crate::model::candidate::{Candidate, CandidateStatus, CommitMetrics};
use crate::store::{Document, RecordStore, StoreError, StoreResult, StoredRecord};
use chrono::{SecondsFormat, Utc};
use log::{debug, info, warn};
use serde_json::Value;

/// Store collection holding candidate documents.
pub const CANDIDATES_COLLECTION: &str = "candidates";

const USERNAME_FIELD: &str = "githubUsername";
const STATUS_FIELD: &str = "status";

/// Best-effort candidate persistence.
pub struct CandidateRepository<S, G = UuidGenerator> {
    store: S,
    cache: CandidateCache,
    ids: G,
}

impl<S: RecordStore> CandidateRepository<S, UuidGenerator> {
    /// Creates a repository with an empty private cache and UUID ids.
    pub fn new(store: S) -> Self {
        Self::with_parts(store, CandidateCache::new(), UuidGenerator)
    }
}

impl<S: RecordStore, G: IdentifierGenerator> CandidateRepository<S, G> {
    pub fn with_parts(store: S, cache: CandidateCache, ids: G) -> Self {
        Self { store, cache, ids }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &CandidateCache {
        &self.cache
    }

    /// Current cache contents, without touching the store.
    pub fn cached(&self) -> Vec<Candidate> {
        self.cache.snapshot()
    }

    /// Lists all candidates.
    ///
    /// A non-empty store result replaces the cache. An empty result or a
    /// store failure returns the cache unchanged.
    pub async fn list(&self) -> Vec<Candidate> {
        match self.store.list_all(CANDIDATES_COLLECTION).await {
            Ok(records) => {
                let candidates: Vec<Candidate> =
                    records.into_iter().filter_map(decode_or_skip).collect();
                if candidates.is_empty() {
                    debug!("event=candidate_list module=repo status=ok source=cache reason=empty");
                    return self.cache.snapshot();
                }
                info!(
                    "event=candidate_list module=repo status=ok source=store count={}",
                    candidates.len()
                );
                self.cache.replace_all(candidates.clone());
                candidates
            }
            Err(err) => {
                warn!("event=candidate_list module=repo status=degraded error={err}");
                self.cache.snapshot()
            }
        }
    }

    /// Gets one candidate by id, falling back to the cache on miss or failure.
    pub async fn get_by_id(&self, id: &str) -> Option<Candidate> {
        match self.store.get_by_id(CANDIDATES_COLLECTION, id).await {
            Ok(Some(record)) => {
                if let Some(candidate) = decode_or_skip(record) {
                    return Some(candidate);
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!("event=candidate_get module=repo status=degraded id={id} error={err}");
            }
        }
        self.cache.find_by_id(id)
    }

    /// Gets the first candidate with an exact GitHub username match.
    pub async fn get_by_username(&self, github_username: &str) -> Option<Candidate> {
        match self.fetch_by_username(github_username).await {
            Ok(found) => found,
            Err(err) => {
                warn!(
                    "event=candidate_get_by_username module=repo status=degraded username={github_username} error={err}"
                );
                self.cache.find_by_username(github_username)
            }
        }
    }

    /// Creates or updates the candidate for an analysed GitHub profile.
    ///
    /// An existing candidate (cache first, then store) keeps its identity,
    /// status and profile fields; score, metrics and position are replaced.
    /// Otherwise a new `pending` candidate is created. The cache always holds
    /// the result; a store failure yields [`WriteOutcome::Degraded`].
    pub async fn upsert_from_analysis(&self, analysis: AnalysisResult) -> WriteOutcome<Candidate> {
        let AnalysisResult {
            profile,
            metrics,
            match_score,
            benchmark,
        } = analysis;

        let existing = match self.cache.find_by_username(&profile.github_username) {
            Some(cached) => UsernameMatch::Decoded(cached),
            None => match self.lookup_username(&profile.github_username).await {
                Ok(found) => found,
                Err(err) => {
                    warn!(
                        "event=candidate_lookup module=repo status=degraded username={} error={err}",
                        profile.github_username
                    );
                    UsernameMatch::Missing
                }
            },
        };

        let existing = match existing {
            UsernameMatch::Decoded(candidate) => Some(candidate),
            UsernameMatch::Undecodable(record) => {
                warn!(
                    "event=candidate_lookup module=repo status=salvage id={} username={}",
                    record.id, profile.github_username
                );
                Some(salvage(record, &profile))
            }
            UsernameMatch::Missing => None,
        };

        match existing {
            Some(existing) => {
                let merged = Candidate {
                    match_score,
                    commit_metrics: metrics,
                    position: benchmark,
                    ..existing
                };
                let id = merged.id.clone();
                let written = self.write_existing(&merged).await;
                self.cache.upsert_by_username(merged.clone());
                settle("candidate_update", &id, written, merged)
            }
            None => {
                let candidate = Candidate {
                    id: self.ids.next_id(),
                    name: profile.display_name(),
                    email: profile.contact_email(),
                    github_username: profile.github_username,
                    avatar_url: profile.avatar_url,
                    match_score,
                    status: CandidateStatus::Pending,
                    commit_metrics: metrics,
                    position: benchmark,
                    created_at: now_timestamp(),
                };
                let id = candidate.id.clone();
                let written = self.write_new(&candidate).await;
                self.cache.prepend(candidate.clone());
                settle("candidate_create", &id, written, candidate)
            }
        }
    }

    /// Sets a candidate's workflow status.
    ///
    /// The cache entry is updated even when the store write fails. Returns the
    /// store's view of the record when it can be re-read, else the cache's.
    pub async fn update_status(
        &self,
        id: &str,
        status: CandidateStatus,
    ) -> WriteOutcome<Option<Candidate>> {
        let mut partial = Document::new();
        partial.insert(
            STATUS_FIELD.to_string(),
            Value::String(status.as_str().to_string()),
        );

        let written = self
            .store
            .update_fields(CANDIDATES_COLLECTION, id, partial)
            .await;
        let cached = self.cache.set_status(id, status);

        match written {
            Ok(()) => {
                info!("event=candidate_status module=repo status=ok id={id} value={status}");
                let stored = match self.store.get_by_id(CANDIDATES_COLLECTION, id).await {
                    Ok(record) => record.and_then(decode_or_skip),
                    Err(err) => {
                        warn!(
                            "event=candidate_status_reload module=repo status=degraded id={id} error={err}"
                        );
                        None
                    }
                };
                WriteOutcome::Persisted(stored.or(cached))
            }
            Err(cause) => {
                warn!("event=candidate_status module=repo status=degraded id={id} error={cause}");
                WriteOutcome::Degraded {
                    value: cached,
                    cause,
                }
            }
        }
    }

    /// Deletes a candidate from the store and, unconditionally, the cache.
    ///
    /// The value is always `true`: the cache removal happened either way.
    pub async fn delete(&self, id: &str) -> WriteOutcome<bool> {
        let written = self.store.delete_by_id(CANDIDATES_COLLECTION, id).await;
        let removed = self.cache.remove(id);
        debug!("event=candidate_delete module=repo status=cache id={id} removed={removed}");
        settle("candidate_delete", id, written, true)
    }

    /// Compares two cached candidates; see [`compare::compare`].
    pub fn compare(&self, id1: &str, id2: &str) -> Option<CandidateComparison> {
        compare::compare(&self.cache, id1, id2)
    }

    async fn fetch_by_username(&self, github_username: &str) -> StoreResult<Option<Candidate>> {
        let records = self.query_username(github_username).await?;
        Ok(records.into_iter().find_map(decode_or_skip))
    }

    /// Like [`Self::fetch_by_username`], but keeps an undecodable match so the
    /// caller can merge into it instead of creating a duplicate.
    async fn lookup_username(&self, github_username: &str) -> StoreResult<UsernameMatch> {
        let mut records = self.query_username(github_username).await?.into_iter();
        let Some(first) = records.next() else {
            return Ok(UsernameMatch::Missing);
        };
        let undecodable = match Candidate::from_record(first.clone()) {
            Ok(candidate) => return Ok(UsernameMatch::Decoded(candidate)),
            Err(err) => {
                warn!(
                    "event=candidate_decode module=repo status=error id={} error={err}",
                    first.id
                );
                first
            }
        };
        Ok(match records.find_map(decode_or_skip) {
            Some(candidate) => UsernameMatch::Decoded(candidate),
            None => UsernameMatch::Undecodable(undecodable),
        })
    }

    async fn query_username(&self, github_username: &str) -> StoreResult<Vec<StoredRecord>> {
        self.store
            .query_equals(
                CANDIDATES_COLLECTION,
                USERNAME_FIELD,
                &Value::String(github_username.to_string()),
            )
            .await
    }

    async fn write_new(&self, candidate: &Candidate) -> StoreResult<()> {
        let fields = candidate.to_document()?;
        self.store
            .insert(CANDIDATES_COLLECTION, Some(candidate.id.as_str()), fields)
            .await?;
        Ok(())
    }

    /// Writes a merged record; a document missing from the store (for example
    /// one created while the store was down) is inserted under the same id.
    async fn write_existing(&self, candidate: &Candidate) -> StoreResult<()> {
        let fields = candidate.to_document()?;
        match self
            .store
            .update_fields(CANDIDATES_COLLECTION, &candidate.id, fields.clone())
            .await
        {
            Err(StoreError::NotFound { .. }) => {
                info!(
                    "event=candidate_update module=repo status=reinsert id={}",
                    candidate.id
                );
                self.store
                    .insert(CANDIDATES_COLLECTION, Some(candidate.id.as_str()), fields)
                    .await?;
                Ok(())
            }
            other => other,
        }
    }
}

/// Result of looking a username up in the store.
enum UsernameMatch {
    Decoded(Candidate),
    Undecodable(StoredRecord),
    Missing,
}

/// Rebuilds a candidate from a stored document that no longer decodes.
///
/// Keeps the document id and whatever readable profile and workflow fields it
/// still has; everything else comes from the incoming profile.
fn salvage(record: StoredRecord, profile: &CandidateProfile) -> Candidate {
    let text = |key: &str| {
        record
            .fields
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
            .map(str::to_string)
    };

    Candidate {
        name: text("name").unwrap_or_else(|| profile.display_name()),
        email: text("email").unwrap_or_else(|| profile.contact_email()),
        github_username: profile.github_username.clone(),
        avatar_url: text("avatarUrl").or_else(|| profile.avatar_url.clone()),
        match_score: 0.0,
        status: text(STATUS_FIELD)
            .and_then(|status| CandidateStatus::parse(&status))
            .unwrap_or_default(),
        commit_metrics: CommitMetrics::default(),
        position: String::new(),
        created_at: text("createdAt").unwrap_or_else(now_timestamp),
        id: record.id,
    }
}

fn settle<T>(event: &str, id: &str, written: StoreResult<()>, value: T) -> WriteOutcome<T> {
    match written {
        Ok(()) => {
            info!("event={event} module=repo status=ok id={id}");
            WriteOutcome::Persisted(value)
        }
        Err(cause) => {
            warn!("event={event} module=repo status=degraded id={id} error={cause}");
            WriteOutcome::Degraded { value, cause }
        }
    }
}

fn decode_or_skip(record: StoredRecord) -> Option<Candidate> {
    let id = record.id.clone();
    match Candidate::from_record(record) {
        Ok(candidate) => Some(candidate),
        Err(err) => {
            warn!("event=candidate_decode module=repo status=error id={id} error={err}");
            None
        }
    }
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
