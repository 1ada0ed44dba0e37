//! Candidate domain model.
//!
//! # Responsibility
//! - Define the hiring-pipeline record shared by repository and matcher.
//! - Map records to and from store documents.
//!
//! # Invariants
//! - `github_username` is the natural merge key; `id` is the primary key.
//! - The store record id is authoritative over any `id` field in a document.
//! - Document field names are camelCase.

use crate::store::{Document, StoreError, StoredRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Primary key of a candidate record, shared with the store document id.
pub type CandidateId = String;

/// Workflow state of a candidate in the hiring pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    /// Ingested, not yet looked at.
    #[default]
    Pending,
    Reviewed,
    Hired,
    Rejected,
}

impl CandidateStatus {
    pub const ALL: [CandidateStatus; 4] = [
        CandidateStatus::Pending,
        CandidateStatus::Reviewed,
        CandidateStatus::Hired,
        CandidateStatus::Rejected,
    ];

    /// Returns the stored string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Hired => "hired",
            Self::Rejected => "rejected",
        }
    }

    /// Parses the stored string form; `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "reviewed" => Some(Self::Reviewed),
            "hired" => Some(Self::Hired),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl Display for CandidateStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not one of the known states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl Display for UnknownStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown candidate status `{}`; expected pending|reviewed|hired|rejected",
            self.0
        )
    }
}

impl Error for UnknownStatus {}

impl FromStr for CandidateStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.trim()).ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Commit-history metrics computed by the analysis pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitMetrics {
    pub code_quality_score: f64,
    pub consistency_score: f64,
    pub collaboration_score: f64,
    pub technical_diversity_score: f64,
    pub overall_score: f64,
    pub total_commits: f64,
}

/// Hiring-pipeline record merging profile info, metrics and workflow status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub email: String,
    pub github_username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub match_score: f64,
    #[serde(default)]
    pub status: CandidateStatus,
    pub commit_metrics: CommitMetrics,
    /// Benchmark label the candidate was scored against.
    #[serde(default)]
    pub position: String,
    /// RFC 3339 timestamp, UTC.
    pub created_at: String,
}

/// Failure to map a store record onto a [`Candidate`].
#[derive(Debug)]
pub enum RecordDecodeError {
    Json(serde_json::Error),
    NotAnObject,
}

impl Display for RecordDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid candidate document: {err}"),
            Self::NotAnObject => write!(f, "candidate must serialize to a JSON object"),
        }
    }
}

impl Error for RecordDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::NotAnObject => None,
        }
    }
}

impl From<serde_json::Error> for RecordDecodeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<RecordDecodeError> for StoreError {
    fn from(value: RecordDecodeError) -> Self {
        match value {
            RecordDecodeError::Json(err) => StoreError::Serialization(err),
            RecordDecodeError::NotAnObject => {
                StoreError::InvalidData("candidate is not a JSON object".to_string())
            }
        }
    }
}

impl Candidate {
    /// Decodes a store record, taking the identity from the record id.
    pub fn from_record(record: StoredRecord) -> Result<Self, RecordDecodeError> {
        let StoredRecord { id, mut fields } = record;
        fields.insert("id".to_string(), Value::String(id));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    /// Encodes this candidate as store fields; the id travels separately.
    pub fn to_document(&self) -> Result<Document, RecordDecodeError> {
        match serde_json::to_value(self)? {
            Value::Object(mut fields) => {
                fields.remove("id");
                Ok(fields)
            }
            _ => Err(RecordDecodeError::NotAnObject),
        }
    }

    /// Case-insensitive substring match on name or GitHub username.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.github_username.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Candidate {
        Candidate {
            id: "c-1".to_string(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            github_username: "ada".to_string(),
            avatar_url: None,
            match_score: 88.5,
            status: CandidateStatus::Reviewed,
            commit_metrics: CommitMetrics {
                total_commits: 120.0,
                ..CommitMetrics::default()
            },
            position: "backend".to_string(),
            created_at: "2024-01-02T03:04:05.000Z".to_string(),
        }
    }

    #[test]
    fn document_uses_camel_case_and_omits_id() {
        let fields = sample().to_document().unwrap();
        assert!(!fields.contains_key("id"));
        assert_eq!(fields["githubUsername"], json!("ada"));
        assert_eq!(fields["status"], json!("reviewed"));
        assert_eq!(fields["commitMetrics"]["totalCommits"], json!(120.0));
        assert!(!fields.contains_key("avatarUrl"));
    }

    #[test]
    fn record_id_wins_over_embedded_id() {
        let mut fields = sample().to_document().unwrap();
        fields.insert("id".to_string(), json!("stale-id"));

        let decoded = Candidate::from_record(StoredRecord {
            id: "doc-7".to_string(),
            fields,
        })
        .unwrap();
        assert_eq!(decoded.id, "doc-7");
        assert_eq!(decoded.github_username, "ada");
    }

    #[test]
    fn decode_rejects_missing_required_fields() {
        let mut fields = Document::new();
        fields.insert("name".to_string(), json!("only a name"));

        let err = Candidate::from_record(StoredRecord {
            id: "x".to_string(),
            fields,
        })
        .unwrap_err();
        assert!(matches!(err, RecordDecodeError::Json(_)));
    }

    #[test]
    fn status_parses_known_values_only() {
        for status in CandidateStatus::ALL {
            assert_eq!(status.as_str().parse::<CandidateStatus>(), Ok(status));
        }
        assert!("archived".parse::<CandidateStatus>().is_err());
    }

    #[test]
    fn search_matches_name_or_username_ignoring_case() {
        let candidate = sample();
        assert!(candidate.matches_search(""));
        assert!(candidate.matches_search("lovelace"));
        assert!(candidate.matches_search("ad"));
        assert!(!candidate.matches_search("grace"));
    }
}
